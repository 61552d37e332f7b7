// Panic isolation for hooks and poll cycles
use std::any::Any;
use std::panic::{catch_unwind, UnwindSafe};

/// Result of a panic-guarded execution
#[derive(Debug)]
pub enum PanicGuardResult<T> {
    /// Execution completed
    Success(T),
    /// Execution panicked, with the panic message
    Panicked(String),
}

/// Execute a closure with panic isolation
///
/// The caller decides how loudly to report a panic; nothing is logged here.
pub fn execute_guarded<F, T>(f: F) -> PanicGuardResult<T>
where
    F: FnOnce() -> T + UnwindSafe,
{
    match catch_unwind(f) {
        Ok(result) => PanicGuardResult::Success(result),
        Err(payload) => PanicGuardResult::Panicked(panic_message(payload.as_ref())),
    }
}

/// Best-effort text of a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_passes_value_through() {
        match execute_guarded(|| 21 * 2) {
            PanicGuardResult::Success(v) => assert_eq!(v, 42),
            PanicGuardResult::Panicked(msg) => panic!("unexpected panic: {msg}"),
        }
    }

    #[test]
    fn test_panic_message_is_captured() {
        let result: PanicGuardResult<()> = execute_guarded(|| panic!("hook exploded"));
        match result {
            PanicGuardResult::Panicked(msg) => assert_eq!(msg, "hook exploded"),
            PanicGuardResult::Success(_) => panic!("expected panic"),
        }

        let result: PanicGuardResult<()> = execute_guarded(|| panic!("code {}", 7));
        assert!(matches!(result, PanicGuardResult::Panicked(msg) if msg == "code 7"));
    }
}
