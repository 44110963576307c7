/// Adapters layer - Infrastructure implementations
///
/// This layer contains concrete implementations of the ports: content
/// resolvers, workers, document formats and console output.
pub mod outbound;
