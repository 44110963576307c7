/// Mock implementations for testing
mod mock_worker;
mod recording_observer;

pub use mock_worker::MockWorker;
pub use recording_observer::RecordingObserver;
