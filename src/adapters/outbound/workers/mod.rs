//! Concrete workers, one per ecosystem, built on [`GenericWorker`].

mod apk;
mod elixir;
mod generic;
mod ruby;
mod rust;
mod sbom;

pub use apk::apk_db_worker;
pub use elixir::mix_lock_worker;
pub use generic::{GenericWorker, LocationReader, Parser};
pub use ruby::gemfile_lock_worker;
pub use rust::cargo_lock_worker;
pub use sbom::sbom_worker;

use crate::ports::outbound::Worker;
use std::sync::Arc;

/// Every built-in worker, in registration order.
pub fn all_workers() -> Vec<Arc<dyn Worker>> {
    vec![
        Arc::new(apk_db_worker()),
        Arc::new(mix_lock_worker()),
        Arc::new(gemfile_lock_worker()),
        Arc::new(cargo_lock_worker()),
        Arc::new(sbom_worker()),
    ]
}
