// Transport Client - lifecycle state machine around a leaf transport
//
// Uninitialized -> Initialized is the only transition. Every operation
// validates its job, delegates to the leaf and publishes an action event
// after success. Submitted jobs are handed to the shared job monitor while
// status listeners are registered.

mod listeners;
mod validation;

pub use listeners::ListenerSet;
pub use validation::{validate_job_id, validate_submit};

use crate::application::dispatch::{execute_guarded, PanicGuardResult};
use crate::application::operations::FaxOperations;
use crate::config::ConfigurationHolder;
use crate::domain::{
    ActionEvent, ActionEventKind, FaxJob, FaxJobStatus, Provider, StatusChangeEvent,
};
use crate::error::{FaxError, Result};
use crate::port::{
    ActionListener, FaxTransport, JobMonitor, MonitoredTransport, Plugin, StatusListener,
};
use async_trait::async_trait;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};
use uuid::Uuid;

enum Lifecycle {
    Uninitialized(Box<dyn FaxTransport>),
    Initialized(Arc<ClientRuntime>),
    /// Leaf initialize failed; the client is unusable
    Broken,
}

/// Client over one leaf transport instance
pub struct TransportClient {
    state: Lifecycle,
}

struct ClientRuntime {
    instance_id: String,
    transport: Arc<dyn FaxTransport>,
    config: ConfigurationHolder,
    monitor: Arc<dyn JobMonitor>,
    binding: Arc<MonitorBinding>,
    action_listeners: ListenerSet<dyn ActionListener>,
    status_listeners: ListenerSet<dyn StatusListener>,
}

/// The client as seen by the job monitor
///
/// Holds the runtime weakly so tracked jobs never keep a dropped client alive.
struct MonitorBinding {
    instance_id: String,
    runtime: Weak<ClientRuntime>,
}

impl TransportClient {
    pub fn new(transport: Box<dyn FaxTransport>) -> Self {
        Self {
            state: Lifecycle::Uninitialized(transport),
        }
    }

    /// Initialize the leaf with the merged configuration and bind the monitor
    ///
    /// # Errors
    /// - IllegalState when already initialized (or a previous attempt failed)
    /// - whatever the leaf's initialize reports; the client stays unusable
    pub fn initialize(
        &mut self,
        config: ConfigurationHolder,
        monitor: Arc<dyn JobMonitor>,
    ) -> Result<()> {
        let mut transport = match std::mem::replace(&mut self.state, Lifecycle::Broken) {
            Lifecycle::Uninitialized(transport) => transport,
            other => {
                self.state = other;
                return Err(FaxError::IllegalState(
                    "Transport client already initialized.".to_string(),
                ));
            }
        };

        let property_part = transport
            .property_part()
            .or_else(|| config.property_part().map(str::to_string));
        let config = config.with_property_part(property_part);

        if let Err(e) = transport.initialize(&config) {
            warn!(error = %e, "Transport initialization failed");
            return Err(e);
        }

        let provider = transport.provider();
        let instance_id = Uuid::new_v4().to_string();
        info!(
            provider = %provider.name,
            instance_id = %instance_id,
            property_part = ?config.property_part(),
            monitoring = transport.supports_monitoring(),
            "Transport client initialized"
        );

        let transport: Arc<dyn FaxTransport> = Arc::from(transport);
        let runtime = Arc::new_cyclic(|weak| ClientRuntime {
            binding: Arc::new(MonitorBinding {
                instance_id: instance_id.clone(),
                runtime: weak.clone(),
            }),
            instance_id,
            transport,
            config,
            monitor,
            action_listeners: ListenerSet::new(),
            status_listeners: ListenerSet::new(),
        });

        self.state = Lifecycle::Initialized(runtime);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, Lifecycle::Initialized(_))
    }

    /// Monitor key of this client
    pub fn instance_id(&self) -> Result<String> {
        Ok(self.runtime()?.instance_id.clone())
    }

    pub fn configuration(&self) -> Result<ConfigurationHolder> {
        Ok(self.runtime()?.config.clone())
    }

    /// Batch status query; `None` when monitoring is unsupported or `jobs` is empty
    pub async fn poll_statuses(&self, jobs: &[FaxJob]) -> Result<Option<Vec<Option<FaxJobStatus>>>> {
        Ok(self.runtime()?.poll_statuses(jobs).await)
    }

    fn runtime(&self) -> Result<&Arc<ClientRuntime>> {
        match &self.state {
            Lifecycle::Initialized(runtime) => Ok(runtime),
            Lifecycle::Uninitialized(_) => Err(FaxError::IllegalState(
                "Transport client not initialized.".to_string(),
            )),
            Lifecycle::Broken => Err(FaxError::IllegalState(
                "Transport client initialization failed.".to_string(),
            )),
        }
    }
}

impl ClientRuntime {
    fn fire_action(&self, kind: ActionEventKind, job: &FaxJob) {
        if self.action_listeners.is_empty() {
            return;
        }
        let event = ActionEvent::new(kind, job.clone());
        self.action_listeners.notify(|listener| {
            let delivered = execute_guarded(AssertUnwindSafe(|| listener.on_action(&event)));
            if let PanicGuardResult::Panicked(panic_msg) = delivered {
                warn!(job_id = %job.id, event = ?kind, panic_msg = %panic_msg, "Action listener panicked");
            }
        });
    }

    fn fire_status_change(&self, job: &FaxJob, status: FaxJobStatus) {
        let event = StatusChangeEvent::new(job.clone(), status);
        self.status_listeners.notify(|listener| {
            let delivered =
                execute_guarded(AssertUnwindSafe(|| listener.on_status_change(&event)));
            if let PanicGuardResult::Panicked(panic_msg) = delivered {
                warn!(job_id = %job.id, status = %status, panic_msg = %panic_msg, "Status listener panicked");
            }
        });
    }

    async fn poll_statuses(&self, jobs: &[FaxJob]) -> Option<Vec<Option<FaxJobStatus>>> {
        if !self.transport.supports_monitoring() || jobs.is_empty() {
            return None;
        }
        Some(self.transport.poll_statuses(jobs).await)
    }
}

impl Drop for ClientRuntime {
    fn drop(&mut self) {
        self.monitor.stop_all(&self.instance_id);
    }
}

#[async_trait]
impl MonitoredTransport for MonitorBinding {
    fn instance_id(&self) -> &str {
        &self.instance_id
    }

    async fn job_status(&self, job: &FaxJob) -> Result<FaxJobStatus> {
        let runtime = self
            .runtime
            .upgrade()
            .ok_or_else(|| FaxError::IllegalState("Transport client dropped.".to_string()))?;
        runtime.transport.status(job).await
    }

    async fn poll_statuses(&self, jobs: &[FaxJob]) -> Option<Vec<Option<FaxJobStatus>>> {
        let runtime = self.runtime.upgrade()?;
        runtime.poll_statuses(jobs).await
    }

    fn fire_status_change(&self, job: &FaxJob, status: FaxJobStatus) {
        if let Some(runtime) = self.runtime.upgrade() {
            runtime.fire_status_change(job, status);
        }
    }
}

#[async_trait]
impl FaxOperations for TransportClient {
    fn provider(&self) -> Result<Provider> {
        Ok(self.runtime()?.transport.provider())
    }

    fn supports_monitoring(&self) -> Result<bool> {
        Ok(self.runtime()?.transport.supports_monitoring())
    }

    fn create_job(&self) -> Result<FaxJob> {
        let runtime = self.runtime()?;
        let job = runtime.transport.create_job();
        runtime.fire_action(ActionEventKind::Created, &job);
        Ok(job)
    }

    async fn submit(&self, mut job: FaxJob) -> Result<FaxJob> {
        let runtime = self.runtime()?;
        validate_submit(&job).await?;

        let id = runtime.transport.submit(&job).await?;
        if id.trim().is_empty() {
            return Err(FaxError::transport(
                "Fax job ID not assigned by the transport.",
            ));
        }
        job.id = id;
        info!(job_id = %job.id, instance_id = %runtime.instance_id, "Fax job submitted");

        runtime.fire_action(ActionEventKind::Submitted, &job);

        if runtime.transport.supports_monitoring() && !runtime.status_listeners.is_empty() {
            let binding: Arc<dyn MonitoredTransport> = runtime.binding.clone();
            if let Err(e) = runtime.monitor.monitor(binding, &job).await {
                warn!(job_id = %job.id, error = %e, "Unable to start monitoring submitted fax job");
                return Err(FaxError::transport_with_source(
                    format!("Fax job {} submitted but monitoring could not start.", job.id),
                    e,
                ));
            }
        }

        Ok(job)
    }

    async fn suspend(&self, job: &FaxJob) -> Result<()> {
        let runtime = self.runtime()?;
        validate_job_id(job)?;
        runtime.transport.suspend(job).await?;
        debug!(job_id = %job.id, "Fax job suspended");
        runtime.fire_action(ActionEventKind::Suspended, job);
        Ok(())
    }

    async fn resume(&self, job: &FaxJob) -> Result<()> {
        let runtime = self.runtime()?;
        validate_job_id(job)?;
        runtime.transport.resume(job).await?;
        debug!(job_id = %job.id, "Fax job resumed");
        runtime.fire_action(ActionEventKind::Resumed, job);
        Ok(())
    }

    async fn cancel(&self, job: &FaxJob) -> Result<()> {
        let runtime = self.runtime()?;
        validate_job_id(job)?;
        runtime.transport.cancel(job).await?;
        debug!(job_id = %job.id, "Fax job cancelled");
        runtime.fire_action(ActionEventKind::Cancelled, job);
        Ok(())
    }

    async fn status(&self, job: &FaxJob) -> Result<FaxJobStatus> {
        let runtime = self.runtime()?;
        validate_job_id(job)?;
        runtime.transport.status(job).await
    }

    fn add_action_listener(&self, listener: Arc<dyn ActionListener>) -> Result<()> {
        self.runtime()?.action_listeners.add(listener);
        Ok(())
    }

    fn remove_action_listener(&self, listener: &Arc<dyn ActionListener>) -> Result<()> {
        self.runtime()?.action_listeners.remove(listener);
        Ok(())
    }

    fn remove_all_action_listeners(&self) -> Result<()> {
        self.runtime()?.action_listeners.clear();
        Ok(())
    }

    fn add_status_listener(&self, listener: Arc<dyn StatusListener>) -> Result<()> {
        let runtime = self.runtime()?;
        if !runtime.transport.supports_monitoring() {
            return Err(FaxError::Unsupported(
                "Fax job monitoring not supported by this transport.".to_string(),
            ));
        }
        runtime.status_listeners.add(listener);
        Ok(())
    }

    fn remove_status_listener(&self, listener: &Arc<dyn StatusListener>) -> Result<()> {
        let runtime = self.runtime()?;
        if runtime.status_listeners.remove(listener) == 0 {
            runtime.monitor.stop_all(&runtime.instance_id);
        }
        Ok(())
    }

    fn remove_all_status_listeners(&self) -> Result<()> {
        let runtime = self.runtime()?;
        runtime.status_listeners.clear();
        runtime.monitor.stop_all(&runtime.instance_id);
        Ok(())
    }
}
