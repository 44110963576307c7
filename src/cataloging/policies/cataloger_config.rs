use super::ownership_tie::OwnershipTiePolicy;
use serde::Serialize;

/// Settings for one catalog run, after CLI and config file are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogerConfig {
    /// Worker name patterns; empty selects every worker.
    pub catalogers: Vec<String>,
    /// Maximum number of workers running at once; `None` is unbounded.
    pub parallelism: Option<usize>,
    pub ownership_ties: OwnershipTiePolicy,
}

impl CatalogerConfig {
    pub fn with_catalogers(mut self, catalogers: Vec<String>) -> Self {
        self.catalogers = catalogers;
        self
    }

    pub fn with_parallelism(mut self, parallelism: Option<usize>) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn with_ownership_ties(mut self, policy: OwnershipTiePolicy) -> Self {
        self.ownership_ties = policy;
        self
    }

    /// Value recorded in the inventory descriptor.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
