/// Use cases module containing application business logic orchestration
mod catalog_packages;
mod convert_inventory;

pub(crate) use catalog_packages::workers_failed;
pub use catalog_packages::{
    CatalogPackagesUseCase, OrchestratorOutput, TaskOrchestrator, WorkerError,
};
pub use convert_inventory::ConvertInventoryUseCase;
