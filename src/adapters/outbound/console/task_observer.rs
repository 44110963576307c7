use crate::ports::outbound::{RunSummary, TaskObserver, TaskSummary};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// StderrTaskObserver adapter reporting worker progress to stderr
///
/// Shows a spinner while workers run and one line per finished worker.
/// Everything goes to stderr so stdout stays reserved for the document.
pub struct StderrTaskObserver {
    spinner: Mutex<Option<ProgressBar>>,
    running: Mutex<Vec<String>>,
    finished: AtomicUsize,
}

impl StderrTaskObserver {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
            running: Mutex::new(Vec::new()),
            finished: AtomicUsize::new(0),
        }
    }

    fn spinner(&self) -> Option<ProgressBar> {
        let mut spinner = self.spinner.lock().ok()?;
        if spinner.is_none() {
            let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
            if let Ok(style) = ProgressStyle::with_template("   {spinner:.green} {msg}") {
                pb.set_style(style);
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            *spinner = Some(pb);
        }
        spinner.clone()
    }

    fn update_message(&self, pb: &ProgressBar) {
        if let Ok(running) = self.running.lock() {
            pb.set_message(format!(
                "{} done, cataloging: {}",
                self.finished.load(Ordering::Relaxed),
                running.join(", ")
            ));
        }
    }
}

impl Default for StderrTaskObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskObserver for StderrTaskObserver {
    fn task_started(&self, worker: &str) {
        if let Ok(mut running) = self.running.lock() {
            running.push(worker.to_string());
        }
        if let Some(pb) = self.spinner() {
            self.update_message(&pb);
        }
    }

    fn task_finished(&self, summary: &TaskSummary) {
        if let Ok(mut running) = self.running.lock() {
            running.retain(|w| w != &summary.worker);
        }
        self.finished.fetch_add(1, Ordering::Relaxed);
        let mark = if summary.failed { "✘" } else { "✔" };
        let line = format!(
            "   {} {}: {} packages, {} relationships ({:.2?})",
            mark, summary.worker, summary.packages, summary.relationships, summary.elapsed
        );
        match self.spinner() {
            Some(pb) if !pb.is_hidden() => {
                pb.println(line);
                self.update_message(&pb);
            }
            // not a terminal: plain lines
            _ => eprintln!("{}", line),
        }
    }

    fn run_finished(&self, summary: &RunSummary) {
        if let Ok(mut spinner) = self.spinner.lock() {
            if let Some(pb) = spinner.take() {
                pb.finish_and_clear();
            }
        }
        if summary.cancelled {
            eprintln!("⚠️  Cataloging cancelled");
            return;
        }
        eprintln!(
            "📦 Cataloged {} packages and {} relationships with {} workers ({} failed)",
            summary.packages, summary.relationships, summary.workers, summary.failed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(worker: &str, failed: bool) -> TaskSummary {
        TaskSummary {
            worker: worker.to_string(),
            packages: 3,
            relationships: 1,
            failed,
            elapsed: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_observer_lifecycle() {
        let observer = StderrTaskObserver::new();
        observer.task_started("apkdb-cataloger");
        observer.task_started("sbom-cataloger");
        observer.task_finished(&summary("apkdb-cataloger", false));
        assert_eq!(
            observer.running.lock().unwrap().as_slice(),
            ["sbom-cataloger".to_string()]
        );
        observer.task_finished(&summary("sbom-cataloger", true));
        assert_eq!(observer.finished.load(Ordering::Relaxed), 2);
        observer.run_finished(&RunSummary::default());
        assert!(observer.spinner.lock().unwrap().is_none());
    }

    #[test]
    fn test_run_finished_without_tasks() {
        let observer = StderrTaskObserver::default();
        observer.run_finished(&RunSummary {
            cancelled: true,
            ..Default::default()
        });
    }
}
