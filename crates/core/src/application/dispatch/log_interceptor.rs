// Built-in "log" interceptor

use crate::domain::FaxJob;
use crate::error::FaxError;
use crate::port::{FaxInterceptor, HookResult, Invocation, InvocationOutput, Plugin};
use tracing::{debug, error};

/// Logs every client call through `tracing`
///
/// Pre and post hooks log at DEBUG, failures at ERROR.
#[derive(Debug, Default)]
pub struct LogInterceptor;

impl LogInterceptor {
    pub const NAME: &'static str = "log";

    pub fn new() -> Self {
        Self
    }
}

fn render_job(job: &FaxJob) -> String {
    serde_json::to_string(job).unwrap_or_else(|_| job.id.clone())
}

fn render_output(output: &InvocationOutput) -> String {
    match output {
        InvocationOutput::Job(job) => render_job(job),
        InvocationOutput::Status(status) => status.to_string(),
        InvocationOutput::Unit => "-".to_string(),
    }
}

impl Plugin for LogInterceptor {}

impl FaxInterceptor for LogInterceptor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn before(&self, invocation: &Invocation) -> HookResult {
        let job = invocation
            .job()
            .map(render_job)
            .unwrap_or_else(|| "-".to_string());
        debug!(call = invocation.name(), job = %job, "Invoking fax client operation");
        Ok(())
    }

    fn after(&self, invocation: &Invocation, output: &InvocationOutput) -> HookResult {
        debug!(
            call = invocation.name(),
            output = %render_output(output),
            "Fax client operation completed"
        );
        Ok(())
    }

    fn on_error(&self, invocation: &Invocation, err: &FaxError) -> HookResult {
        error!(
            call = invocation.name(),
            job_id = invocation.job().map(|job| job.id.as_str()).unwrap_or("-"),
            kind = err.kind(),
            error = %err,
            "Fax client operation failed"
        );
        Ok(())
    }
}
