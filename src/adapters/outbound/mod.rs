/// Outbound adapters - Infrastructure implementations of outbound ports
pub mod console;
pub mod filesystem;
pub mod formats;
pub mod resolvers;
pub mod workers;
