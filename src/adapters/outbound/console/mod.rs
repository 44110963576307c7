/// Console adapters for reporting run progress
mod task_observer;

pub use task_observer::StderrTaskObserver;
