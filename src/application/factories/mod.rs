mod format_factory;
mod presenter_factory;

pub use format_factory::FormatFactory;
pub use presenter_factory::{PresenterFactory, PresenterType};
