// faxdispatch Core - Dispatch Engine, Ports & Job Monitor
// NO vendor transports (Hexagonal Architecture)

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{
    FaxClient, FaxClientFactory, FaxOperations, PluginRegistry, PollingJobMonitor, TransportClient,
};
pub use config::ConfigurationHolder;
pub use domain::{ActionEvent, ActionEventKind, FaxJob, FaxJobPriority, FaxJobStatus, Provider, StatusChangeEvent};
pub use error::{FaxError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
