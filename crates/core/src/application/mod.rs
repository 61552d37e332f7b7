// Application Layer - Use Cases and Dispatch Logic

pub mod client;
pub mod dispatch;
pub mod facade;
pub mod monitor;
pub mod operations;
pub mod plugin;

// Re-exports
pub use client::{ListenerSet, TransportClient};
pub use dispatch::{InterceptedClient, LogInterceptor};
pub use facade::{FaxClient, FaxClientFactory};
pub use monitor::{PollingJobMonitor, PollingSettings};
pub use operations::FaxOperations;
pub use plugin::{PluginRegistry, PluginResolver};
