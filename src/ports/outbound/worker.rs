use super::content_resolver::ContentResolver;
use crate::cataloging::domain::{LinuxRelease, Package, Relationship};

/// Values shared by every parser of a run.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub linux_release: Option<LinuxRelease>,
}

/// What a worker (or one of its parsers) found.
#[derive(Debug, Default)]
pub struct Discovery {
    pub packages: Vec<Package>,
    pub relationships: Vec<Relationship>,
}

impl Discovery {
    pub fn new(packages: Vec<Package>, relationships: Vec<Relationship>) -> Self {
        Self {
            packages,
            relationships,
        }
    }

    pub fn extend(&mut self, other: Discovery) {
        self.packages.extend(other.packages);
        self.relationships.extend(other.relationships);
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.relationships.is_empty()
    }
}

/// A failed worker run, with whatever it found before failing.
#[derive(Debug)]
pub struct WorkerFailure {
    pub partial: Discovery,
    pub error: anyhow::Error,
}

impl WorkerFailure {
    /// A failure with no partial output.
    pub fn fatal(error: impl Into<anyhow::Error>) -> Self {
        Self {
            partial: Discovery::default(),
            error: error.into(),
        }
    }
}

/// Worker port: one pluggable discovery routine
///
/// Workers are stateless and may run concurrently with each other against
/// the same resolver.
pub trait Worker: Send + Sync {
    /// Registered name, used for selection and reporting
    fn name(&self) -> &str;

    /// Discovers packages and relationships
    ///
    /// # Arguments
    /// * `resolver` - Read-only view of the scanned content
    /// * `env` - Values shared by all workers of the run
    ///
    /// # Errors
    /// Returns a [`WorkerFailure`] carrying any partial output when the
    /// worker could not complete
    fn catalog(
        &self,
        resolver: &dyn ContentResolver,
        env: &Environment,
    ) -> Result<Discovery, WorkerFailure>;
}
