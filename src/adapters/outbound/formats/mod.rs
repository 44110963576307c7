mod bomtrace_json;
mod table;

pub use bomtrace_json::BomtraceJsonFormat;
pub use table::TableFormat;
