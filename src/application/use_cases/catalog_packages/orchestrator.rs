use crate::cataloging::domain::{Collection, Relationship};
use crate::ports::outbound::{
    ContentResolver, Discovery, Environment, RunSummary, TaskObserver, TaskSummary, Worker,
    WorkerFailure,
};
use crate::shared::error::CatalogError;
use crate::shared::Result;
use futures::stream::{self, StreamExt};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;

/// Capacity of each worker's relationship queue
const RELATIONSHIP_QUEUE_CAPACITY: usize = 256;

/// A worker that failed, by name.
#[derive(Debug)]
pub struct WorkerError {
    pub worker: String,
    pub error: anyhow::Error,
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:#}", self.worker, self.error)
    }
}

/// Merged output of every worker of a run.
#[derive(Debug)]
pub struct OrchestratorOutput {
    pub packages: Collection,
    /// Worker relationships in arrival order.
    pub relationships: Vec<Relationship>,
    pub failures: Vec<WorkerError>,
    pub workers: usize,
}

impl OrchestratorOutput {
    /// `WorkersFailed` summarizing every failure, if there were any.
    pub fn error(&self) -> Option<CatalogError> {
        workers_failed(&self.failures, self.workers)
    }
}

pub(crate) fn workers_failed(failures: &[WorkerError], total: usize) -> Option<CatalogError> {
    if failures.is_empty() {
        return None;
    }
    Some(CatalogError::WorkersFailed {
        failed: failures.len(),
        total,
        details: failures
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; "),
    })
}

struct TaskOutcome {
    worker: String,
    error: Option<anyhow::Error>,
}

/// TaskOrchestrator runs workers concurrently against one resolver
///
/// Each worker runs on the blocking pool. Packages go straight into a
/// shared [`Collection`]; relationships travel over one bounded queue per
/// worker and are fanned in while the workers run. A failed worker is
/// reported and never stops its siblings.
pub struct TaskOrchestrator {
    workers: Vec<Arc<dyn Worker>>,
    observer: Arc<dyn TaskObserver>,
    parallelism: Option<usize>,
}

impl TaskOrchestrator {
    pub fn new(workers: Vec<Arc<dyn Worker>>, observer: Arc<dyn TaskObserver>) -> Self {
        Self {
            workers,
            observer,
            parallelism: None,
        }
    }

    /// Limits how many workers run at once. `None` or `Some(0)` is unbounded.
    pub fn with_parallelism(mut self, parallelism: Option<usize>) -> Self {
        self.parallelism = parallelism.filter(|n| *n > 0);
        self
    }

    /// Runs every worker to completion or until `cancel` fires
    ///
    /// # Arguments
    /// * `resolver` - Content shared read-only by all workers
    /// * `env` - Values shared by every parser
    /// * `cancel` - Stops waiting for outstanding workers when triggered
    ///
    /// # Returns
    /// The merged packages and relationships plus one entry per failed worker
    ///
    /// # Errors
    /// `Cancelled` if `cancel` fires first. Workers still running keep going
    /// in the background and their output is discarded.
    pub async fn run(
        &self,
        resolver: Arc<dyn ContentResolver>,
        env: Environment,
        cancel: CancellationToken,
    ) -> Result<OrchestratorOutput> {
        let collection = Arc::new(Collection::new());
        let semaphore = self.parallelism.map(|n| Arc::new(Semaphore::new(n)));

        let mut names = Vec::with_capacity(self.workers.len());
        let mut handles = Vec::with_capacity(self.workers.len());
        let mut queues = Vec::with_capacity(self.workers.len());

        for worker in &self.workers {
            let (tx, rx) = mpsc::channel::<Relationship>(RELATIONSHIP_QUEUE_CAPACITY);
            queues.push(rx);
            names.push(worker.name().to_string());

            let task = WorkerTask {
                worker: Arc::clone(worker),
                resolver: Arc::clone(&resolver),
                env: env.clone(),
                collection: Arc::clone(&collection),
                observer: Arc::clone(&self.observer),
                queue: tx,
            };
            let semaphore = semaphore.clone();
            handles.push(tokio::spawn(async move {
                let _permit = match semaphore {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                let name = task.worker.name().to_string();
                let observer = Arc::clone(&task.observer);
                match tokio::task::spawn_blocking(move || task.run()).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        observer.task_finished(&TaskSummary {
                            worker: name.clone(),
                            packages: 0,
                            relationships: 0,
                            failed: true,
                            elapsed: Default::default(),
                        });
                        TaskOutcome {
                            worker: name,
                            error: Some(anyhow::anyhow!("worker aborted: {}", e)),
                        }
                    }
                }
            }));
        }

        let fan_in = stream::select_all(queues.into_iter().map(|rx| {
            Box::pin(stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|relationship| (relationship, rx))
            }))
        }))
        .collect::<Vec<Relationship>>();
        let joined = futures::future::join_all(handles);

        let (relationships, results) = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::warn!("cataloging cancelled, abandoning outstanding workers");
                self.observer.run_finished(&RunSummary {
                    workers: self.workers.len(),
                    cancelled: true,
                    ..Default::default()
                });
                return Err(CatalogError::Cancelled.into());
            }
            done = async move { futures::join!(fan_in, joined) } => done,
        };

        let failures: Vec<WorkerError> = results
            .into_iter()
            .zip(names)
            .filter_map(|(result, name)| match result {
                Ok(TaskOutcome { worker, error }) => {
                    error.map(|error| WorkerError { worker, error })
                }
                Err(e) => Some(WorkerError {
                    worker: name,
                    error: anyhow::anyhow!("worker task failed: {}", e),
                }),
            })
            .collect();

        let packages = Arc::try_unwrap(collection)
            .unwrap_or_else(|shared| shared.sorted().into_iter().collect());

        self.observer.run_finished(&RunSummary {
            workers: self.workers.len(),
            failed: failures.len(),
            packages: packages.len(),
            relationships: relationships.len(),
            cancelled: false,
        });

        Ok(OrchestratorOutput {
            packages,
            relationships,
            failures,
            workers: self.workers.len(),
        })
    }
}

/// Everything one worker needs on the blocking pool.
struct WorkerTask {
    worker: Arc<dyn Worker>,
    resolver: Arc<dyn ContentResolver>,
    env: Environment,
    collection: Arc<Collection>,
    observer: Arc<dyn TaskObserver>,
    queue: mpsc::Sender<Relationship>,
}

impl WorkerTask {
    fn run(self) -> TaskOutcome {
        let name = self.worker.name().to_string();
        self.observer.task_started(&name);
        tracing::debug!(worker = %name, "worker started");
        let started = Instant::now();

        let (discovery, mut error) = match self.worker.catalog(self.resolver.as_ref(), &self.env) {
            Ok(discovery) => (discovery, None),
            Err(WorkerFailure { partial, error }) => {
                let message = format!("{:#}", error);
                tracing::warn!(worker = %name, error = %message, "worker failed");
                (partial, Some(error))
            }
        };
        let Discovery {
            packages,
            relationships,
        } = discovery;
        let package_count = packages.len();
        let relationship_count = relationships.len();

        let mut violations = Vec::new();
        for package in packages {
            if let Err(e) = self.collection.add(package) {
                tracing::warn!(worker = %name, error = %e, "package rejected");
                violations.push(e.to_string());
            }
        }
        if !violations.is_empty() {
            let violation = anyhow::anyhow!(violations.join("; "));
            error = Some(match error {
                Some(e) => e.context(violation.to_string()),
                None => violation,
            });
        }

        for relationship in relationships {
            if self.queue.blocking_send(relationship).is_err() {
                tracing::debug!(worker = %name, "relationship queue closed, discarding output");
                break;
            }
        }

        let summary = TaskSummary {
            worker: name.clone(),
            packages: package_count,
            relationships: relationship_count,
            failed: error.is_some(),
            elapsed: started.elapsed(),
        };
        tracing::debug!(
            worker = %name,
            packages = package_count,
            relationships = relationship_count,
            "worker finished"
        );
        self.observer.task_finished(&summary);

        TaskOutcome {
            worker: name,
            error,
        }
    }
}
