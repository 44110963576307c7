/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to reach scanned content, discovery routines, document formats and
/// output destinations.
pub mod content_resolver;
pub mod inventory_format;
pub mod output_presenter;
pub mod task_observer;
pub mod worker;

pub use content_resolver::{ContentResolver, FileKind, FileMetadata};
pub use inventory_format::InventoryFormat;
pub use output_presenter::OutputPresenter;
pub use task_observer::{NoopTaskObserver, RunSummary, TaskObserver, TaskSummary};
pub use worker::{Discovery, Environment, Worker, WorkerFailure};
