//! bomtrace - package cataloging engine
//!
//! This library discovers the software installed in a filesystem tree,
//! assigns every package a content-derived identity and links packages to
//! the files that evidence them, following hexagonal architecture and
//! Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`cataloging`): Package model, collection, relationship graph
//!   and reconciliation
//! - **Application Layer** (`application`): Use cases, the task orchestrator and factories
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Content resolvers, workers, document formats and presenters
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use bomtrace::prelude::*;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<()> {
//! // Create adapters
//! let resolver = Arc::new(DirectoryResolver::new("/srv/rootfs")?);
//! let observer = Arc::new(NoopTaskObserver);
//!
//! // Create use case
//! let use_case = CatalogPackagesUseCase::new(all_workers(), observer);
//!
//! // Execute
//! let request = CatalogRequest::new("/srv/rootfs", resolver, CatalogerConfig::default());
//! let response = use_case.execute(request, CancellationToken::new()).await?;
//!
//! // Encode the inventory
//! let output = BomtraceJsonFormat::new().encode(&response.inventory)?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cataloging;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrTaskObserver;
    pub use crate::adapters::outbound::filesystem::{FileSystemWriter, StdoutPresenter};
    pub use crate::adapters::outbound::formats::{BomtraceJsonFormat, TableFormat};
    pub use crate::adapters::outbound::resolvers::{DirectoryResolver, InMemoryResolver};
    pub use crate::adapters::outbound::workers::{all_workers, GenericWorker};
    pub use crate::application::dto::{CatalogRequest, CatalogResponse, OutputFormat};
    pub use crate::application::use_cases::{
        CatalogPackagesUseCase, ConvertInventoryUseCase, TaskOrchestrator,
    };
    pub use crate::cataloging::domain::{
        ArtifactId, Collection, Coordinates, Inventory, LinuxRelease, Location, Package,
        PackageType, Relationship, RelationshipType,
    };
    pub use crate::cataloging::policies::{CatalogerConfig, OwnershipTiePolicy};
    pub use crate::cataloging::services::{IdentityReconciler, RelationshipBuilder};
    pub use crate::ports::outbound::{
        ContentResolver, InventoryFormat, NoopTaskObserver, OutputPresenter, TaskObserver, Worker,
    };
    pub use crate::shared::Result;
}
