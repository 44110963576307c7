mod orchestrator;

pub(crate) use orchestrator::workers_failed;
pub use orchestrator::{OrchestratorOutput, TaskOrchestrator, WorkerError};

use crate::application::dto::{CatalogRequest, CatalogResponse};
use crate::cataloging::domain::{Descriptor, Inventory, LinuxRelease, SourceDescription};
use crate::cataloging::policies::CatalogerConfig;
use crate::cataloging::services::{ReleaseIdentifier, RelationshipBuilder, WorkerSelector};
use crate::ports::outbound::{ContentResolver, Environment, TaskObserver, Worker};
use crate::shared::error::CatalogError;
use crate::shared::Result;
use std::io::Read;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// CatalogPackagesUseCase - Catalogs the packages of one source
///
/// Selects the workers named by the request, identifies the Linux release
/// of the content, runs the workers through a [`TaskOrchestrator`] and
/// derives the relationship graph of what they found.
pub struct CatalogPackagesUseCase {
    workers: Vec<Arc<dyn Worker>>,
    observer: Arc<dyn TaskObserver>,
}

impl CatalogPackagesUseCase {
    /// Creates a new use case over the registered `workers`
    pub fn new(workers: Vec<Arc<dyn Worker>>, observer: Arc<dyn TaskObserver>) -> Self {
        Self { workers, observer }
    }

    /// Executes the catalog use case
    ///
    /// # Arguments
    /// * `request` - Content to scan and run settings
    /// * `cancel` - Aborts the run when triggered
    ///
    /// # Returns
    /// The inventory, plus the workers that failed. Worker failures do not
    /// make this method fail.
    ///
    /// # Errors
    /// - `Config` if no worker matches the requested names
    /// - `Cancelled` if `cancel` fires before every worker completed
    pub async fn execute(
        &self,
        request: CatalogRequest,
        cancel: CancellationToken,
    ) -> Result<CatalogResponse> {
        let CatalogRequest {
            source_path,
            resolver,
            config,
        } = request;

        // Step 1: Pick workers
        let workers = self.select_workers(&config)?;

        // Step 2: Identify the release shared with every parser
        let release = Self::identify_release(resolver.as_ref());
        let env = Environment {
            linux_release: release.clone(),
        };

        // Step 3: Run workers
        let OrchestratorOutput {
            packages,
            relationships,
            failures,
            workers,
        } = TaskOrchestrator::new(workers, Arc::clone(&self.observer))
            .with_parallelism(config.parallelism)
            .run(resolver, env, cancel)
            .await?;

        // Step 4: Derive and validate relationships
        let source = SourceDescription::directory(source_path.to_string_lossy());
        let graph = RelationshipBuilder::new(config.ownership_ties).build(
            &packages,
            relationships,
            Some(&source),
        );
        if graph.dropped > 0 {
            tracing::info!(
                dropped = graph.dropped,
                "relationships with unresolved endpoints removed"
            );
        }

        // Step 5: Assemble the inventory
        let descriptor = Descriptor {
            configuration: config.to_value(),
            ..Default::default()
        };
        let inventory = Inventory::new(packages, graph.relationships)
            .with_source(source)
            .with_distro(release)
            .with_descriptor(descriptor);

        Ok(CatalogResponse {
            inventory,
            failures,
            ownership_conflicts: graph.conflicts,
            dropped_relationships: graph.dropped,
            workers,
        })
    }

    fn select_workers(&self, config: &CatalogerConfig) -> Result<Vec<Arc<dyn Worker>>> {
        let selector = WorkerSelector::new(config.catalogers.clone())?;
        let selection = selector.select(self.workers.clone(), |w| w.name());

        for pattern in &selection.unmatched_patterns {
            tracing::warn!(pattern = %pattern, "cataloger pattern did not match any worker");
        }
        if selection.selected.is_empty() {
            return Err(CatalogError::Config {
                field: "catalogers".to_string(),
                reason: format!("no cataloger matches '{}'", config.catalogers.join(", ")),
            }
            .into());
        }

        tracing::debug!(
            workers = ?selection.selected.iter().map(|w| w.name()).collect::<Vec<_>>(),
            "selected workers"
        );
        Ok(selection.selected)
    }

    /// Reads the first os-release file the content provides.
    fn identify_release(resolver: &dyn ContentResolver) -> Option<LinuxRelease> {
        for location in resolver.files_by_path(&ReleaseIdentifier::OS_RELEASE_PATHS) {
            let mut content = String::new();
            let read = resolver
                .file_contents(&location)
                .and_then(|mut reader| Ok(reader.read_to_string(&mut content)?));
            if let Err(e) = read {
                tracing::warn!(
                    path = %location.real_path(),
                    error = %e,
                    "unable to read os-release"
                );
                continue;
            }
            if let Some(release) = ReleaseIdentifier::parse(&content) {
                tracing::info!(
                    id = %release.id,
                    version = %release.version_id,
                    "identified linux release"
                );
                return Some(release);
            }
        }
        None
    }
}
