// Interceptor Port - hooks around every dispatch call

use super::plugin::Plugin;
use crate::domain::{FaxJob, FaxJobStatus};
use crate::error::{FaxError, Result};

/// One caller-facing client operation, as seen by interceptors
#[derive(Debug, Clone)]
pub enum Invocation {
    CreateJob,
    Submit(FaxJob),
    Suspend(FaxJob),
    Resume(FaxJob),
    Cancel(FaxJob),
    Status(FaxJob),
    AddActionListener,
    RemoveActionListener,
    RemoveAllActionListeners,
    AddStatusListener,
    RemoveStatusListener,
    RemoveAllStatusListeners,
}

impl Invocation {
    pub fn name(&self) -> &'static str {
        match self {
            Invocation::CreateJob => "create_job",
            Invocation::Submit(_) => "submit",
            Invocation::Suspend(_) => "suspend",
            Invocation::Resume(_) => "resume",
            Invocation::Cancel(_) => "cancel",
            Invocation::Status(_) => "status",
            Invocation::AddActionListener => "add_action_listener",
            Invocation::RemoveActionListener => "remove_action_listener",
            Invocation::RemoveAllActionListeners => "remove_all_action_listeners",
            Invocation::AddStatusListener => "add_status_listener",
            Invocation::RemoveStatusListener => "remove_status_listener",
            Invocation::RemoveAllStatusListeners => "remove_all_status_listeners",
        }
    }

    /// Job argument of the call, if it takes one
    pub fn job(&self) -> Option<&FaxJob> {
        match self {
            Invocation::Submit(job)
            | Invocation::Suspend(job)
            | Invocation::Resume(job)
            | Invocation::Cancel(job)
            | Invocation::Status(job) => Some(job),
            _ => None,
        }
    }
}

/// Successful result of an invocation
#[derive(Debug, Clone)]
pub enum InvocationOutput {
    Job(FaxJob),
    Status(FaxJobStatus),
    Unit,
}

/// Hook failures are logged and discarded, they never reach the caller
pub type HookResult = Result<()>;

/// Interceptor (Plugin)
///
/// All hooks default to no-ops. Hooks run in registration order and cannot
/// alter arguments or results.
pub trait FaxInterceptor: Plugin {
    fn name(&self) -> &str;

    fn before(&self, _invocation: &Invocation) -> HookResult {
        Ok(())
    }

    fn after(&self, _invocation: &Invocation, _output: &InvocationOutput) -> HookResult {
        Ok(())
    }

    fn on_error(&self, _invocation: &Invocation, _error: &FaxError) -> HookResult {
        Ok(())
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::config::ConfigurationHolder;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// How a recording interceptor misbehaves
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum HookFailure {
        None,
        Error,
        Panic,
    }

    /// Shared, ordered hook log (`"<label>:<hook>:<call>"`)
    pub type HookLog = Arc<Mutex<Vec<String>>>;

    /// Records every hook call into a log that can be shared across interceptors
    pub struct RecordingInterceptor {
        label: String,
        log: HookLog,
        failure: HookFailure,
        initialized: bool,
    }

    impl RecordingInterceptor {
        pub fn new(label: impl Into<String>, log: HookLog) -> Self {
            Self {
                label: label.into(),
                log,
                failure: HookFailure::None,
                initialized: false,
            }
        }

        pub fn failing(label: impl Into<String>, log: HookLog, failure: HookFailure) -> Self {
            Self {
                failure,
                ..Self::new(label, log)
            }
        }

        pub fn is_initialized(&self) -> bool {
            self.initialized
        }

        fn record(&self, hook: &str, invocation: &Invocation) -> HookResult {
            self.log
                .lock()
                .push(format!("{}:{}:{}", self.label, hook, invocation.name()));

            match self.failure {
                HookFailure::None => Ok(()),
                HookFailure::Error => Err(FaxError::transport(format!("{} hook failed", self.label))),
                HookFailure::Panic => panic!("{} hook panicked", self.label),
            }
        }
    }

    impl Plugin for RecordingInterceptor {
        fn initialize(&mut self, _config: &ConfigurationHolder) -> Result<()> {
            self.initialized = true;
            Ok(())
        }
    }

    impl FaxInterceptor for RecordingInterceptor {
        fn name(&self) -> &str {
            &self.label
        }

        fn before(&self, invocation: &Invocation) -> HookResult {
            self.record("before", invocation)
        }

        fn after(&self, invocation: &Invocation, _output: &InvocationOutput) -> HookResult {
            self.record("after", invocation)
        }

        fn on_error(&self, invocation: &Invocation, _error: &FaxError) -> HookResult {
            self.record("on_error", invocation)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_names_and_job() {
        let mut job = FaxJob::new();
        job.id = "7".to_string();

        let submit = Invocation::Submit(job);
        assert_eq!(submit.name(), "submit");
        assert_eq!(submit.job().map(|j| j.id.as_str()), Some("7"));

        assert_eq!(Invocation::CreateJob.name(), "create_job");
        assert!(Invocation::RemoveAllStatusListeners.job().is_none());
    }
}
