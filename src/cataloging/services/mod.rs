mod identity_reconciler;
mod relationship_builder;
mod release_identifier;
mod worker_selector;

pub use identity_reconciler::IdentityReconciler;
pub use relationship_builder::{RelationshipBuilder, RelationshipGraph};
pub use release_identifier::ReleaseIdentifier;
pub use worker_selector::{WorkerSelection, WorkerSelector};
