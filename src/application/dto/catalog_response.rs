use crate::application::use_cases::WorkerError;
use crate::cataloging::domain::Inventory;
use crate::cataloging::policies::OwnershipConflict;
use crate::shared::error::CatalogError;

/// CatalogResponse - Output of the catalog use case
///
/// The inventory is complete even when some workers failed; `failures`
/// lists those workers so the caller can decide on an exit status.
#[derive(Debug)]
pub struct CatalogResponse {
    pub inventory: Inventory,
    pub failures: Vec<WorkerError>,
    /// Files claimed with equal specificity by more than one package
    pub ownership_conflicts: Vec<OwnershipConflict>,
    /// Number of relationships removed because an endpoint did not resolve
    pub dropped_relationships: usize,
    pub workers: usize,
}

impl CatalogResponse {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// "N of M workers failed: ..." when any worker failed.
    pub fn error(&self) -> Option<CatalogError> {
        crate::application::use_cases::workers_failed(&self.failures, self.workers)
    }
}
