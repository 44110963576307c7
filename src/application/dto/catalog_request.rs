use crate::cataloging::policies::CatalogerConfig;
use crate::ports::outbound::ContentResolver;
use std::path::PathBuf;
use std::sync::Arc;

/// CatalogRequest - Input of the catalog use case
///
/// Pairs the content to scan with the path it was read from, which names
/// the source in the resulting inventory.
#[derive(Clone)]
pub struct CatalogRequest {
    /// Path of the scanned directory, as given by the user
    pub source_path: PathBuf,
    /// Read-only view of the content at `source_path`
    pub resolver: Arc<dyn ContentResolver>,
    pub config: CatalogerConfig,
}

impl CatalogRequest {
    pub fn new(
        source_path: impl Into<PathBuf>,
        resolver: Arc<dyn ContentResolver>,
        config: CatalogerConfig,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            resolver,
            config,
        }
    }
}
