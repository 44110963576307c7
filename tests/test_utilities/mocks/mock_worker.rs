use bomtrace::ports::outbound::{ContentResolver, Discovery, Environment, Worker, WorkerFailure};
use bomtrace::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock Worker for testing that returns a fixed discovery
pub struct MockWorker {
    pub name: String,
    pub packages: Vec<Package>,
    pub relationships: Vec<Relationship>,
    pub should_fail: bool,
    pub calls: Arc<AtomicUsize>,
}

impl MockWorker {
    pub fn new(name: &str, packages: Vec<Package>) -> Self {
        Self {
            name: name.to_string(),
            packages,
            relationships: Vec::new(),
            should_fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_relationships(mut self, relationships: Vec<Relationship>) -> Self {
        self.relationships = relationships;
        self
    }

    pub fn with_failure(name: &str) -> Self {
        Self {
            should_fail: true,
            ..Self::new(name, Vec::new())
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Worker for MockWorker {
    fn name(&self) -> &str {
        &self.name
    }

    fn catalog(
        &self,
        _resolver: &dyn ContentResolver,
        _env: &Environment,
    ) -> std::result::Result<Discovery, WorkerFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(WorkerFailure::fatal(anyhow::anyhow!("Mock worker failure")));
        }
        Ok(Discovery::new(
            self.packages.clone(),
            self.relationships.clone(),
        ))
    }
}
