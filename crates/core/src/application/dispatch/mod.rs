// Dispatch - interception chain around a fax client
//
// Every caller-facing call runs: before hooks (in order) -> real call ->
// after hooks on success or on_error hooks on failure (in order). Hooks
// observe only; the real result reaches the caller unchanged.

mod guard;
mod log_interceptor;

pub use guard::{execute_guarded, panic_message, PanicGuardResult};
pub use log_interceptor::LogInterceptor;

use crate::application::operations::FaxOperations;
use crate::domain::{FaxJob, FaxJobStatus, Provider};
use crate::error::Result;
use crate::port::{
    ActionListener, FaxInterceptor, HookResult, Invocation, InvocationOutput, StatusListener,
};
use async_trait::async_trait;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::debug;

/// Client wrapped by an immutable list of interceptors
pub struct InterceptedClient {
    inner: Arc<dyn FaxOperations>,
    interceptors: Vec<Arc<dyn FaxInterceptor>>,
}

impl InterceptedClient {
    pub fn new(inner: Arc<dyn FaxOperations>, interceptors: Vec<Arc<dyn FaxInterceptor>>) -> Self {
        Self {
            inner,
            interceptors,
        }
    }

    pub fn interceptor_names(&self) -> Vec<String> {
        self.interceptors
            .iter()
            .map(|interceptor| interceptor.name().to_string())
            .collect()
    }

    /// Run an async call through the hooks
    async fn intercept<T, Fut>(
        &self,
        invocation: Invocation,
        call: Fut,
        output: fn(&T) -> InvocationOutput,
    ) -> Result<T>
    where
        Fut: Future<Output = Result<T>> + Send,
        T: Send,
    {
        self.run_before(&invocation);
        let result = call.await;
        self.run_after(&invocation, &result, output);
        result
    }

    /// Run a synchronous call through the hooks
    fn intercept_sync<T>(
        &self,
        invocation: Invocation,
        call: impl FnOnce() -> Result<T>,
        output: fn(&T) -> InvocationOutput,
    ) -> Result<T> {
        self.run_before(&invocation);
        let result = call();
        self.run_after(&invocation, &result, output);
        result
    }

    fn run_before(&self, invocation: &Invocation) {
        for interceptor in &self.interceptors {
            guarded_hook(interceptor.as_ref(), "before", invocation, || {
                interceptor.before(invocation)
            });
        }
    }

    fn run_after<T>(
        &self,
        invocation: &Invocation,
        result: &Result<T>,
        output: fn(&T) -> InvocationOutput,
    ) {
        match result {
            Ok(value) => {
                let output = output(value);
                for interceptor in &self.interceptors {
                    guarded_hook(interceptor.as_ref(), "after", invocation, || {
                        interceptor.after(invocation, &output)
                    });
                }
            }
            Err(err) => {
                for interceptor in &self.interceptors {
                    guarded_hook(interceptor.as_ref(), "on_error", invocation, || {
                        interceptor.on_error(invocation, err)
                    });
                }
            }
        }
    }
}

/// A failing or panicking hook is logged and dropped
fn guarded_hook(
    interceptor: &dyn FaxInterceptor,
    hook: &'static str,
    invocation: &Invocation,
    f: impl FnOnce() -> HookResult,
) {
    match execute_guarded(AssertUnwindSafe(f)) {
        PanicGuardResult::Success(Ok(())) => {}
        PanicGuardResult::Success(Err(e)) => debug!(
            interceptor = interceptor.name(),
            hook,
            call = invocation.name(),
            error = %e,
            "Interceptor hook failed, ignoring"
        ),
        PanicGuardResult::Panicked(panic_msg) => debug!(
            interceptor = interceptor.name(),
            hook,
            call = invocation.name(),
            panic_msg = %panic_msg,
            "Interceptor hook panicked, ignoring"
        ),
    }
}

fn job_output(job: &FaxJob) -> InvocationOutput {
    InvocationOutput::Job(job.clone())
}

fn status_output(status: &FaxJobStatus) -> InvocationOutput {
    InvocationOutput::Status(*status)
}

fn unit_output(_: &()) -> InvocationOutput {
    InvocationOutput::Unit
}

#[async_trait]
impl FaxOperations for InterceptedClient {
    fn provider(&self) -> Result<Provider> {
        self.inner.provider()
    }

    fn supports_monitoring(&self) -> Result<bool> {
        self.inner.supports_monitoring()
    }

    fn create_job(&self) -> Result<FaxJob> {
        self.intercept_sync(Invocation::CreateJob, || self.inner.create_job(), job_output)
    }

    async fn submit(&self, job: FaxJob) -> Result<FaxJob> {
        let invocation = Invocation::Submit(job.clone());
        self.intercept(invocation, self.inner.submit(job), job_output)
            .await
    }

    async fn suspend(&self, job: &FaxJob) -> Result<()> {
        self.intercept(Invocation::Suspend(job.clone()), self.inner.suspend(job), unit_output)
            .await
    }

    async fn resume(&self, job: &FaxJob) -> Result<()> {
        self.intercept(Invocation::Resume(job.clone()), self.inner.resume(job), unit_output)
            .await
    }

    async fn cancel(&self, job: &FaxJob) -> Result<()> {
        self.intercept(Invocation::Cancel(job.clone()), self.inner.cancel(job), unit_output)
            .await
    }

    async fn status(&self, job: &FaxJob) -> Result<FaxJobStatus> {
        self.intercept(Invocation::Status(job.clone()), self.inner.status(job), status_output)
            .await
    }

    fn add_action_listener(&self, listener: Arc<dyn ActionListener>) -> Result<()> {
        self.intercept_sync(
            Invocation::AddActionListener,
            || self.inner.add_action_listener(listener),
            unit_output,
        )
    }

    fn remove_action_listener(&self, listener: &Arc<dyn ActionListener>) -> Result<()> {
        self.intercept_sync(
            Invocation::RemoveActionListener,
            || self.inner.remove_action_listener(listener),
            unit_output,
        )
    }

    fn remove_all_action_listeners(&self) -> Result<()> {
        self.intercept_sync(
            Invocation::RemoveAllActionListeners,
            || self.inner.remove_all_action_listeners(),
            unit_output,
        )
    }

    fn add_status_listener(&self, listener: Arc<dyn StatusListener>) -> Result<()> {
        self.intercept_sync(
            Invocation::AddStatusListener,
            || self.inner.add_status_listener(listener),
            unit_output,
        )
    }

    fn remove_status_listener(&self, listener: &Arc<dyn StatusListener>) -> Result<()> {
        self.intercept_sync(
            Invocation::RemoveStatusListener,
            || self.inner.remove_status_listener(listener),
            unit_output,
        )
    }

    fn remove_all_status_listeners(&self) -> Result<()> {
        self.intercept_sync(
            Invocation::RemoveAllStatusListeners,
            || self.inner.remove_all_status_listeners(),
            unit_output,
        )
    }
}

impl std::fmt::Debug for InterceptedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptedClient")
            .field("interceptors", &self.interceptor_names())
            .finish()
    }
}
