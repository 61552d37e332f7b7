// Job Monitor Port
// Turns one-shot submits into observable jobs

use super::plugin::Plugin;
use crate::domain::{FaxJob, FaxJobStatus};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// What the monitor needs from a transport instance
#[async_trait]
pub trait MonitoredTransport: Send + Sync {
    /// Monitor key, unique per client instance
    fn instance_id(&self) -> &str;

    async fn job_status(&self, job: &FaxJob) -> Result<FaxJobStatus>;

    /// `None` when the transport cannot poll or `jobs` is empty
    async fn poll_statuses(&self, jobs: &[FaxJob]) -> Option<Vec<Option<FaxJobStatus>>>;

    /// Deliver a status change to the instance's status listeners
    fn fire_status_change(&self, job: &FaxJob, status: FaxJobStatus);
}

/// Job Monitor (Plugin)
///
/// One monitor is shared by every client a factory creates.
#[async_trait]
pub trait JobMonitor: Plugin {
    /// Start tracking a submitted job; seeds its status synchronously
    async fn monitor(&self, transport: Arc<dyn MonitoredTransport>, job: &FaxJob) -> Result<()>;

    /// Forget every job of one transport instance
    fn stop_all(&self, instance_id: &str);

    fn is_polling(&self) -> bool;

    fn tracked_jobs(&self, instance_id: &str) -> usize;

    /// Run one status sweep now
    async fn run_polling_cycle(&self);

    /// Stop tracking everything and wait for the background worker to exit
    async fn shutdown(&self);
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::FaxError;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    type FireHook = Box<dyn Fn(&FaxJob, FaxJobStatus) + Send + Sync>;

    /// Monitored transport answering from a scripted status table
    pub struct MockMonitoredTransport {
        instance_id: String,
        statuses: Mutex<HashMap<String, FaxJobStatus>>,
        batch_override: Mutex<Option<Vec<Option<FaxJobStatus>>>>,
        failing_status: Mutex<bool>,
        poll_count: Mutex<usize>,
        fired: Mutex<Vec<(String, FaxJobStatus)>>,
        on_fire: Mutex<Option<FireHook>>,
    }

    impl MockMonitoredTransport {
        pub fn new(instance_id: impl Into<String>) -> Self {
            Self {
                instance_id: instance_id.into(),
                statuses: Mutex::new(HashMap::new()),
                batch_override: Mutex::new(None),
                failing_status: Mutex::new(false),
                poll_count: Mutex::new(0),
                fired: Mutex::new(Vec::new()),
                on_fire: Mutex::new(None),
            }
        }

        pub fn set_status(&self, job_id: &str, status: FaxJobStatus) {
            self.statuses.lock().insert(job_id.to_string(), status);
        }

        /// Answer every batch poll with exactly this vector
        pub fn set_batch(&self, batch: Vec<Option<FaxJobStatus>>) {
            *self.batch_override.lock() = Some(batch);
        }

        pub fn fail_status(&self, failing: bool) {
            *self.failing_status.lock() = failing;
        }

        /// Callback run (after recording) on every fired status change
        pub fn on_fire(&self, hook: impl Fn(&FaxJob, FaxJobStatus) + Send + Sync + 'static) {
            *self.on_fire.lock() = Some(Box::new(hook));
        }

        pub fn poll_count(&self) -> usize {
            *self.poll_count.lock()
        }

        pub fn fired(&self) -> Vec<(String, FaxJobStatus)> {
            self.fired.lock().clone()
        }
    }

    #[async_trait]
    impl MonitoredTransport for MockMonitoredTransport {
        fn instance_id(&self) -> &str {
            &self.instance_id
        }

        async fn job_status(&self, job: &FaxJob) -> Result<FaxJobStatus> {
            if *self.failing_status.lock() {
                return Err(FaxError::transport("status query failed"));
            }
            Ok(self
                .statuses
                .lock()
                .get(&job.id)
                .copied()
                .unwrap_or(FaxJobStatus::Pending))
        }

        async fn poll_statuses(&self, jobs: &[FaxJob]) -> Option<Vec<Option<FaxJobStatus>>> {
            *self.poll_count.lock() += 1;
            if jobs.is_empty() {
                return None;
            }
            if let Some(batch) = self.batch_override.lock().clone() {
                return Some(batch);
            }
            let statuses = self.statuses.lock();
            Some(
                jobs.iter()
                    .map(|job| Some(statuses.get(&job.id).copied().unwrap_or(FaxJobStatus::Pending)))
                    .collect(),
            )
        }

        fn fire_status_change(&self, job: &FaxJob, status: FaxJobStatus) {
            self.fired.lock().push((job.id.clone(), status));
            if let Some(hook) = self.on_fire.lock().as_ref() {
                hook(job, status);
            }
        }
    }

    /// Monitor that only records what the client asks of it
    #[derive(Default)]
    pub struct RecordingJobMonitor {
        monitored: Mutex<Vec<(String, String)>>,
        stopped: Mutex<Vec<String>>,
        fail_monitor: Mutex<bool>,
    }

    impl RecordingJobMonitor {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail_monitor(&self, failing: bool) {
            *self.fail_monitor.lock() = failing;
        }

        /// (instance id, job id) pairs handed to `monitor`
        pub fn monitored(&self) -> Vec<(String, String)> {
            self.monitored.lock().clone()
        }

        pub fn stopped(&self) -> Vec<String> {
            self.stopped.lock().clone()
        }
    }

    impl Plugin for RecordingJobMonitor {}

    #[async_trait]
    impl JobMonitor for RecordingJobMonitor {
        async fn monitor(&self, transport: Arc<dyn MonitoredTransport>, job: &FaxJob) -> Result<()> {
            if *self.fail_monitor.lock() {
                return Err(FaxError::transport("monitor seed failed"));
            }
            self.monitored
                .lock()
                .push((transport.instance_id().to_string(), job.id.clone()));
            Ok(())
        }

        fn stop_all(&self, instance_id: &str) {
            self.stopped.lock().push(instance_id.to_string());
        }

        fn is_polling(&self) -> bool {
            false
        }

        fn tracked_jobs(&self, instance_id: &str) -> usize {
            self.monitored
                .lock()
                .iter()
                .filter(|(id, _)| id == instance_id)
                .count()
        }

        async fn run_polling_cycle(&self) {}

        async fn shutdown(&self) {}
    }
}
