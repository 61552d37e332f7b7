// Port Layer - Interfaces for pluggable components and external dependencies

pub mod configuration_source;
pub mod fax_transport;
pub mod interceptor;
pub mod job_monitor;
pub mod listener;
pub mod plugin;

// Re-exports
pub use configuration_source::ConfigurationSource;
pub use fax_transport::FaxTransport;
pub use interceptor::{FaxInterceptor, HookResult, Invocation, InvocationOutput};
pub use job_monitor::{JobMonitor, MonitoredTransport};
pub use listener::{ActionListener, StatusListener};
pub use plugin::Plugin;
