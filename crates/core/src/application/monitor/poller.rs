// Polling Job Monitor
//
// One background task per monitor, alive only while jobs are tracked.
// State lock (parking_lot) is never held across an await; the cycle lock
// (tokio) serializes sweeps so events for a job are delivered in order.

use super::constants::{DEFAULT_POLLING_INTERVAL_FIXED, DEFAULT_POLLING_INTERVAL_MS, MIN_CYCLE_GAP};
use super::shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
use crate::application::dispatch::{execute_guarded, panic_message, PanicGuardResult};
use crate::config::{keys, ConfigurationHolder};
use crate::domain::{FaxJob, FaxJobStatus};
use crate::error::{FaxError, Result};
use crate::port::{JobMonitor, MonitoredTransport, Plugin};
use async_trait::async_trait;
use futures::FutureExt;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Poll cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingSettings {
    pub interval: Duration,
    /// `true`: full interval after each cycle, `false`: fixed wall-clock cadence
    pub fixed: bool,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLLING_INTERVAL_MS),
            fixed: DEFAULT_POLLING_INTERVAL_FIXED,
        }
    }
}

impl PollingSettings {
    pub fn from_config(config: &ConfigurationHolder) -> Result<Self> {
        let interval_ms = config.get_u64(keys::MONITOR_POLLING_INTERVAL, DEFAULT_POLLING_INTERVAL_MS)?;
        if interval_ms == 0 {
            return Err(FaxError::Configuration(format!(
                "Polling interval must be greater than 0 ({}).",
                keys::MONITOR_POLLING_INTERVAL
            )));
        }
        let fixed = config.get_bool(keys::MONITOR_POLLING_INTERVAL_FIXED, DEFAULT_POLLING_INTERVAL_FIXED)?;

        Ok(Self {
            interval: Duration::from_millis(interval_ms),
            fixed,
        })
    }

    /// Wait before the next cycle, given how long the last one took
    pub fn next_wait(&self, elapsed: Duration) -> Duration {
        if self.fixed {
            self.interval
        } else {
            self.interval.saturating_sub(elapsed).max(MIN_CYCLE_GAP)
        }
    }
}

struct TrackedJob {
    job: FaxJob,
    status: FaxJobStatus,
}

struct TrackedTransport {
    transport: Arc<dyn MonitoredTransport>,
    jobs: Vec<TrackedJob>,
}

struct WorkerHandle {
    shutdown: ShutdownSender,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct MonitorState {
    transports: HashMap<String, TrackedTransport>,
    worker: Option<WorkerHandle>,
}

struct StatusNotification {
    transport: Arc<dyn MonitoredTransport>,
    job: FaxJob,
    status: FaxJobStatus,
}

struct MonitorInner {
    state: Mutex<MonitorState>,
    cycle_lock: tokio::sync::Mutex<()>,
}

/// Job monitor polling every tracked transport on a fixed interval
pub struct PollingJobMonitor {
    settings: PollingSettings,
    initialized: bool,
    inner: Arc<MonitorInner>,
}

impl PollingJobMonitor {
    pub fn new() -> Self {
        Self::with_settings(PollingSettings::default())
    }

    pub fn with_settings(settings: PollingSettings) -> Self {
        Self {
            settings,
            initialized: false,
            inner: Arc::new(MonitorInner {
                state: Mutex::new(MonitorState::default()),
                cycle_lock: tokio::sync::Mutex::new(()),
            }),
        }
    }

    pub fn settings(&self) -> PollingSettings {
        self.settings
    }

    fn ensure_worker(&self, state: &mut MonitorState) {
        if state.worker.is_some() {
            return;
        }
        let (shutdown, token) = shutdown_channel();
        let handle = tokio::spawn(
            run_worker(Arc::clone(&self.inner), self.settings, token)
                .instrument(info_span!("faxdispatch-monitor")),
        );
        state.worker = Some(WorkerHandle { shutdown, handle });
    }
}

impl Default for PollingJobMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for PollingJobMonitor {
    fn initialize(&mut self, config: &ConfigurationHolder) -> Result<()> {
        if self.initialized {
            return Err(FaxError::IllegalState(
                "Job monitor already initialized.".to_string(),
            ));
        }
        self.settings = PollingSettings::from_config(config)?;
        self.initialized = true;
        info!(
            interval_ms = self.settings.interval.as_millis() as u64,
            fixed = self.settings.fixed,
            "Polling job monitor initialized"
        );
        Ok(())
    }
}

#[async_trait]
impl JobMonitor for PollingJobMonitor {
    async fn monitor(&self, transport: Arc<dyn MonitoredTransport>, job: &FaxJob) -> Result<()> {
        if job.id.trim().is_empty() {
            return Err(FaxError::Validation("Fax job ID not provided.".to_string()));
        }

        let status = transport.job_status(job).await?;

        let mut state = self.inner.state.lock();
        let instance_id = transport.instance_id().to_string();
        let tracked = state
            .transports
            .entry(instance_id.clone())
            .or_insert_with(|| TrackedTransport {
                transport,
                jobs: Vec::new(),
            });
        match tracked.jobs.iter_mut().find(|t| t.job.id == job.id) {
            Some(existing) => existing.status = status,
            None => tracked.jobs.push(TrackedJob {
                job: job.clone(),
                status,
            }),
        }
        debug!(
            job_id = %job.id,
            instance_id = %instance_id,
            status = %status,
            "Fax job monitoring started"
        );

        self.ensure_worker(&mut state);
        Ok(())
    }

    fn stop_all(&self, instance_id: &str) {
        let removed = self.inner.state.lock().transports.remove(instance_id);
        if let Some(tracked) = removed {
            debug!(
                instance_id = %instance_id,
                jobs = tracked.jobs.len(),
                "Stopped monitoring transport jobs"
            );
        }
        self.inner.stop_worker_if_idle();
    }

    fn is_polling(&self) -> bool {
        self.inner.state.lock().worker.is_some()
    }

    fn tracked_jobs(&self, instance_id: &str) -> usize {
        self.inner
            .state
            .lock()
            .transports
            .get(instance_id)
            .map(|tracked| tracked.jobs.len())
            .unwrap_or(0)
    }

    async fn run_polling_cycle(&self) {
        self.inner.run_cycle().await;
    }

    async fn shutdown(&self) {
        let worker = {
            let mut state = self.inner.state.lock();
            state.transports.clear();
            state.worker.take()
        };

        if let Some(worker) = worker {
            worker.shutdown.shutdown();
            if let Err(e) = worker.handle.await {
                warn!(error = %e, "Job monitor poller ended abnormally");
            }
        }
        info!("Polling job monitor shut down");
    }
}

impl MonitorInner {
    async fn run_cycle(&self) {
        let _cycle = self.cycle_lock.lock().await;

        let batches = self.snapshot();
        let mut notifications = Vec::new();

        for (transport, jobs) in batches {
            let Some(statuses) = transport.poll_statuses(&jobs).await else {
                continue;
            };
            if statuses.len() != jobs.len() {
                warn!(
                    instance_id = %transport.instance_id(),
                    requested = jobs.len(),
                    received = statuses.len(),
                    "Status batch size mismatch, ignoring batch"
                );
                continue;
            }
            self.apply(&transport, &jobs, statuses, &mut notifications);
        }

        self.stop_worker_if_idle();

        // State lock released: listeners may stop monitoring from the callback
        for notification in notifications {
            let StatusNotification {
                transport,
                job,
                status,
            } = notification;
            let fired = execute_guarded(AssertUnwindSafe(|| {
                transport.fire_status_change(&job, status)
            }));
            if let PanicGuardResult::Panicked(panic_msg) = fired {
                warn!(job_id = %job.id, panic_msg = %panic_msg, "Status listener panicked");
            }
        }
    }

    fn snapshot(&self) -> Vec<(Arc<dyn MonitoredTransport>, Vec<FaxJob>)> {
        let state = self.state.lock();
        state
            .transports
            .values()
            .map(|tracked| {
                (
                    Arc::clone(&tracked.transport),
                    tracked.jobs.iter().map(|t| t.job.clone()).collect(),
                )
            })
            .collect()
    }

    fn apply(
        &self,
        transport: &Arc<dyn MonitoredTransport>,
        jobs: &[FaxJob],
        statuses: Vec<Option<FaxJobStatus>>,
        notifications: &mut Vec<StatusNotification>,
    ) {
        let instance_id = transport.instance_id();
        let mut state = self.state.lock();
        let Some(tracked) = state.transports.get_mut(instance_id) else {
            // Stopped while the poll was in flight
            return;
        };

        for (job, status) in jobs.iter().zip(statuses) {
            let Some(status) = status else {
                continue;
            };
            let Some(position) = tracked.jobs.iter().position(|t| t.job.id == job.id) else {
                continue;
            };

            let entry = &mut tracked.jobs[position];
            if entry.status != status {
                debug!(job_id = %job.id, from = %entry.status, to = %status, "Fax job status changed");
                entry.status = status;
                notifications.push(StatusNotification {
                    transport: Arc::clone(transport),
                    job: entry.job.clone(),
                    status,
                });
            }
            if status.is_terminal() {
                tracked.jobs.remove(position);
            }
        }

        if tracked.jobs.is_empty() {
            state.transports.remove(instance_id);
        }
    }

    fn stop_worker_if_idle(&self) {
        let worker = {
            let mut state = self.state.lock();
            if state.transports.is_empty() {
                state.worker.take()
            } else {
                None
            }
        };
        if let Some(worker) = worker {
            worker.shutdown.shutdown();
            debug!("No monitored fax jobs left, stopping poller");
        }
    }
}

async fn run_worker(inner: Arc<MonitorInner>, settings: PollingSettings, mut shutdown: ShutdownToken) {
    info!(
        interval_ms = settings.interval.as_millis() as u64,
        fixed = settings.fixed,
        "Job monitor poller started"
    );

    loop {
        if shutdown.is_shutdown() {
            break;
        }

        let started = Instant::now();
        if let Err(payload) = AssertUnwindSafe(inner.run_cycle()).catch_unwind().await {
            error!(panic_msg = %panic_message(payload.as_ref()), "Polling cycle panicked");
        }

        let wait = settings.next_wait(started.elapsed());
        tokio::select! {
            _ = sleep(wait) => {},
            _ = shutdown.wait() => break,
        }
    }

    info!("Job monitor poller stopped");
}
