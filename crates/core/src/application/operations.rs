// Caller-facing fax operations
// Implemented by the transport client and by the interception wrapper

use crate::domain::{FaxJob, FaxJobStatus, Provider};
use crate::error::Result;
use crate::port::{ActionListener, StatusListener};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait FaxOperations: Send + Sync {
    fn provider(&self) -> Result<Provider>;

    fn supports_monitoring(&self) -> Result<bool>;

    /// New job with transport defaults (priority MEDIUM)
    fn create_job(&self) -> Result<FaxJob>;

    /// Validate and send the job; the returned job carries its assigned ID
    async fn submit(&self, job: FaxJob) -> Result<FaxJob>;

    async fn suspend(&self, job: &FaxJob) -> Result<()>;

    async fn resume(&self, job: &FaxJob) -> Result<()>;

    async fn cancel(&self, job: &FaxJob) -> Result<()>;

    async fn status(&self, job: &FaxJob) -> Result<FaxJobStatus>;

    fn add_action_listener(&self, listener: Arc<dyn ActionListener>) -> Result<()>;

    fn remove_action_listener(&self, listener: &Arc<dyn ActionListener>) -> Result<()>;

    fn remove_all_action_listeners(&self) -> Result<()>;

    /// Fails with `Unsupported` when the transport cannot be monitored
    fn add_status_listener(&self, listener: Arc<dyn StatusListener>) -> Result<()>;

    fn remove_status_listener(&self, listener: &Arc<dyn StatusListener>) -> Result<()>;

    fn remove_all_status_listeners(&self) -> Result<()>;
}
