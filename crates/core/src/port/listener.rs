// Listener Ports - observers of client actions and job status changes

use crate::domain::{ActionEvent, StatusChangeEvent};

/// Notified after a client operation fully succeeded
pub trait ActionListener: Send + Sync {
    fn on_action(&self, event: &ActionEvent);
}

/// Notified when the job monitor observes a new job status
pub trait StatusListener: Send + Sync {
    fn on_status_change(&self, event: &StatusChangeEvent);
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::{ActionEventKind, FaxJobStatus};
    use parking_lot::Mutex;

    /// Records every action event it receives
    #[derive(Default)]
    pub struct RecordingActionListener {
        events: Mutex<Vec<ActionEvent>>,
    }

    impl RecordingActionListener {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn kinds(&self) -> Vec<ActionEventKind> {
            self.events.lock().iter().map(|e| e.kind).collect()
        }

        pub fn events(&self) -> Vec<ActionEvent> {
            self.events.lock().clone()
        }
    }

    impl ActionListener for RecordingActionListener {
        fn on_action(&self, event: &ActionEvent) {
            self.events.lock().push(event.clone());
        }
    }

    /// Records every status change it receives
    #[derive(Default)]
    pub struct RecordingStatusListener {
        events: Mutex<Vec<StatusChangeEvent>>,
    }

    impl RecordingStatusListener {
        pub fn new() -> Self {
            Self::default()
        }

        /// (job id, status) pairs in delivery order
        pub fn observed(&self) -> Vec<(String, FaxJobStatus)> {
            self.events
                .lock()
                .iter()
                .map(|e| (e.job.id.clone(), e.status))
                .collect()
        }

        pub fn count(&self) -> usize {
            self.events.lock().len()
        }
    }

    impl StatusListener for RecordingStatusListener {
        fn on_status_change(&self, event: &StatusChangeEvent) {
            self.events.lock().push(event.clone());
        }
    }
}
