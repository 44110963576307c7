use bomtrace::ports::outbound::{RunSummary, TaskObserver, TaskSummary};
use std::sync::Mutex;

/// Mock TaskObserver for testing that captures lifecycle events
#[derive(Default)]
pub struct RecordingObserver {
    pub events: Mutex<Vec<String>>,
    pub summary: Mutex<Option<RunSummary>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn run_summary(&self) -> Option<RunSummary> {
        self.summary.lock().unwrap().clone()
    }
}

impl TaskObserver for RecordingObserver {
    fn task_started(&self, worker: &str) {
        self.events.lock().unwrap().push(format!("started: {}", worker));
    }

    fn task_finished(&self, summary: &TaskSummary) {
        let status = if summary.failed { "failed" } else { "ok" };
        self.events
            .lock()
            .unwrap()
            .push(format!("finished: {} ({})", summary.worker, status));
    }

    fn run_finished(&self, summary: &RunSummary) {
        *self.summary.lock().unwrap() = Some(summary.clone());
    }
}
