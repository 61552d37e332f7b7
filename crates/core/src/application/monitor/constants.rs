// Monitor constants (ADR: No magic values)
use std::time::Duration;

/// Default polling interval (5s)
pub const DEFAULT_POLLING_INTERVAL_MS: u64 = 5000;

/// Default cadence: interval minus the cycle's elapsed time
pub const DEFAULT_POLLING_INTERVAL_FIXED: bool = false;

/// Registry name of the polling monitor
pub const POLLING_MONITOR_NAME: &str = "polling";

/// Shortest wait between cycles when a cycle overruns the interval
pub const MIN_CYCLE_GAP: Duration = Duration::from_millis(1);
