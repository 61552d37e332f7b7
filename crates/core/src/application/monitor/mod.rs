// Job Monitor - polls submitted jobs and publishes status changes

pub mod constants;
mod poller;
mod shutdown;

pub use poller::{PollingJobMonitor, PollingSettings};
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
