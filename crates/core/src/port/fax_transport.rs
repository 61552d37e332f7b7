// Fax Transport Port
// Implemented once per vendor (HTTP gateway, email, modem, ...)

use super::plugin::Plugin;
use crate::domain::{FaxJob, FaxJobStatus, Provider};
use crate::error::{FaxError, Result};
use async_trait::async_trait;
use tracing::debug;

/// Leaf transport
///
/// Only `provider` is mandatory. Operations a vendor cannot perform keep the
/// defaults, which report `Unsupported` (status reports `Unknown`).
/// Implementations never mutate the job; `submit` returns the assigned ID and
/// the client writes it back.
#[async_trait]
pub trait FaxTransport: Plugin {
    fn provider(&self) -> Provider;

    /// Distinguishes several instances of the same transport type in `{0}` keys
    fn property_part(&self) -> Option<String> {
        None
    }

    fn supports_monitoring(&self) -> bool {
        false
    }

    fn create_job(&self) -> FaxJob {
        FaxJob::new()
    }

    /// Send the job, returning the transport assigned job ID
    async fn submit(&self, _job: &FaxJob) -> Result<String> {
        Err(FaxError::unsupported("submit"))
    }

    async fn suspend(&self, _job: &FaxJob) -> Result<()> {
        Err(FaxError::unsupported("suspend"))
    }

    async fn resume(&self, _job: &FaxJob) -> Result<()> {
        Err(FaxError::unsupported("resume"))
    }

    async fn cancel(&self, _job: &FaxJob) -> Result<()> {
        Err(FaxError::unsupported("cancel"))
    }

    async fn status(&self, _job: &FaxJob) -> Result<FaxJobStatus> {
        Ok(FaxJobStatus::Unknown)
    }

    /// Batch status query, one entry per job in request order
    ///
    /// Default queries jobs one by one; a failing query reports `Unknown`.
    async fn poll_statuses(&self, jobs: &[FaxJob]) -> Vec<Option<FaxJobStatus>> {
        let mut statuses = Vec::with_capacity(jobs.len());
        for job in jobs {
            let status = match self.status(job).await {
                Ok(status) => status,
                Err(e) => {
                    debug!(job_id = %job.id, error = %e, "Status query failed, reporting UNKNOWN");
                    FaxJobStatus::Unknown
                }
            };
            statuses.push(Some(status));
        }
        statuses
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::config::ConfigurationHolder;
    use crate::domain::FaxJobPriority;
    use parking_lot::Mutex;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct SpyState {
        calls: Mutex<Vec<String>>,
        next_id: AtomicU64,
        statuses: Mutex<HashMap<String, FaxJobStatus>>,
        failing: Mutex<HashSet<String>>,
        failing_jobs: Mutex<HashSet<String>>,
        config: Mutex<Option<ConfigurationHolder>>,
    }

    /// Transport that records calls and answers from scripted state
    ///
    /// Clones share state, so a test can keep one handle while the client owns
    /// the other. Submitted jobs get IDs `spy-1`, `spy-2`, ... and report
    /// `Pending` until scripted otherwise.
    #[derive(Clone)]
    pub struct SpyTransport {
        provider_name: String,
        monitoring: bool,
        full_capabilities: bool,
        property_part: Option<String>,
        empty_id: bool,
        job_priority: Option<FaxJobPriority>,
        state: Arc<SpyState>,
    }

    impl SpyTransport {
        pub fn new() -> Self {
            Self {
                provider_name: "spy".to_string(),
                monitoring: false,
                full_capabilities: true,
                property_part: None,
                empty_id: false,
                job_priority: None,
                state: Arc::new(SpyState::default()),
            }
        }

        pub fn with_monitoring(mut self) -> Self {
            self.monitoring = true;
            self
        }

        /// Keep the trait defaults for suspend/resume/cancel/status
        pub fn submit_only(mut self) -> Self {
            self.full_capabilities = false;
            self
        }

        pub fn with_provider_name(mut self, name: impl Into<String>) -> Self {
            self.provider_name = name.into();
            self
        }

        pub fn with_property_part(mut self, part: impl Into<String>) -> Self {
            self.property_part = Some(part.into());
            self
        }

        /// Submit succeeds but assigns no ID
        pub fn returning_empty_id(mut self) -> Self {
            self.empty_id = true;
            self
        }

        /// `create_job` hands out jobs with this priority
        pub fn with_job_priority(mut self, priority: FaxJobPriority) -> Self {
            self.job_priority = Some(priority);
            self
        }

        /// Make `status` fail for this job only
        pub fn fail_status_for(&self, job_id: &str) {
            self.state.failing_jobs.lock().insert(job_id.to_string());
        }

        /// Make the named operation (`initialize`, `submit`, `status`, ...) fail
        pub fn fail_on(&self, operation: &str) {
            self.state.failing.lock().insert(operation.to_string());
        }

        pub fn recover(&self, operation: &str) {
            self.state.failing.lock().remove(operation);
        }

        pub fn set_status(&self, job_id: &str, status: FaxJobStatus) {
            self.state.statuses.lock().insert(job_id.to_string(), status);
        }

        pub fn calls(&self) -> Vec<String> {
            self.state.calls.lock().clone()
        }

        pub fn call_count(&self, operation: &str) -> usize {
            self.state.calls.lock().iter().filter(|c| *c == operation).count()
        }

        /// Configuration received on initialize
        pub fn received_config(&self) -> Option<ConfigurationHolder> {
            self.state.config.lock().clone()
        }

        fn enter(&self, operation: &str) -> Result<()> {
            self.state.calls.lock().push(operation.to_string());
            if self.state.failing.lock().contains(operation) {
                return Err(FaxError::transport(format!("spy {operation} failed")));
            }
            Ok(())
        }
    }

    impl Default for SpyTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Plugin for SpyTransport {
        fn initialize(&mut self, config: &ConfigurationHolder) -> Result<()> {
            self.enter("initialize")?;
            *self.state.config.lock() = Some(config.clone());
            Ok(())
        }
    }

    #[async_trait]
    impl FaxTransport for SpyTransport {
        fn provider(&self) -> Provider {
            Provider::new(self.provider_name.clone(), "Recording test transport")
        }

        fn property_part(&self) -> Option<String> {
            self.property_part.clone()
        }

        fn supports_monitoring(&self) -> bool {
            self.monitoring
        }

        fn create_job(&self) -> FaxJob {
            let mut job = FaxJob::new();
            if let Some(priority) = self.job_priority {
                job.priority = priority;
            }
            job
        }

        async fn submit(&self, _job: &FaxJob) -> Result<String> {
            self.enter("submit")?;
            if self.empty_id {
                return Ok(String::new());
            }
            let n = self.state.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("spy-{n}"))
        }

        async fn suspend(&self, _job: &FaxJob) -> Result<()> {
            if !self.full_capabilities {
                return Err(FaxError::unsupported("suspend"));
            }
            self.enter("suspend")
        }

        async fn resume(&self, _job: &FaxJob) -> Result<()> {
            if !self.full_capabilities {
                return Err(FaxError::unsupported("resume"));
            }
            self.enter("resume")
        }

        async fn cancel(&self, _job: &FaxJob) -> Result<()> {
            if !self.full_capabilities {
                return Err(FaxError::unsupported("cancel"));
            }
            self.enter("cancel")
        }

        async fn status(&self, job: &FaxJob) -> Result<FaxJobStatus> {
            if !self.full_capabilities {
                return Ok(FaxJobStatus::Unknown);
            }
            self.enter("status")?;
            if self.state.failing_jobs.lock().contains(&job.id) {
                return Err(FaxError::transport(format!("spy status failed for {}", job.id)));
            }
            Ok(self
                .state
                .statuses
                .lock()
                .get(&job.id)
                .copied()
                .unwrap_or(FaxJobStatus::Pending))
        }
    }
}
