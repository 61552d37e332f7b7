// Domain Layer - Fax jobs, statuses and events

pub mod event;
pub mod job;
pub mod provider;

// Re-exports
pub use event::{ActionEvent, ActionEventKind, StatusChangeEvent};
pub use job::{FaxJob, FaxJobId, FaxJobPriority, FaxJobStatus};
pub use provider::Provider;
