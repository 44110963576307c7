use std::time::Duration;

/// Outcome of one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSummary {
    pub worker: String,
    pub packages: usize,
    pub relationships: usize,
    pub failed: bool,
    pub elapsed: Duration,
}

/// Outcome of a whole orchestrator run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub workers: usize,
    pub failed: usize,
    pub packages: usize,
    pub relationships: usize,
    pub cancelled: bool,
}

/// TaskObserver port for lifecycle events of a catalog run
///
/// Passed to the orchestrator at construction. Methods may be called from
/// several threads at once; every method defaults to doing nothing.
pub trait TaskObserver: Send + Sync {
    /// Called once per worker, before the worker is invoked
    fn task_started(&self, _worker: &str) {}

    /// Called once per worker that completed (successfully or not)
    fn task_finished(&self, _summary: &TaskSummary) {}

    /// Called once when the run completes or is cancelled
    fn run_finished(&self, _summary: &RunSummary) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTaskObserver;

impl TaskObserver for NoopTaskObserver {}
