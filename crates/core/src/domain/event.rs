// Fax events published to listeners

use super::job::{FaxJob, FaxJobStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Client action that completed successfully
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionEventKind {
    Created,
    Submitted,
    Suspended,
    Resumed,
    Cancelled,
}

impl fmt::Display for ActionEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionEventKind::Created => write!(f, "CREATED"),
            ActionEventKind::Submitted => write!(f, "SUBMITTED"),
            ActionEventKind::Suspended => write!(f, "SUSPENDED"),
            ActionEventKind::Resumed => write!(f, "RESUMED"),
            ActionEventKind::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Fired to action listeners after an operation fully succeeded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionEvent {
    pub kind: ActionEventKind,
    pub job: FaxJob,
    pub occurred_at: DateTime<Utc>,
}

impl ActionEvent {
    pub fn new(kind: ActionEventKind, job: FaxJob) -> Self {
        Self {
            kind,
            job,
            occurred_at: Utc::now(),
        }
    }
}

impl fmt::Display for ActionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fax Client Action Event:")?;
        writeln!(f, "ID: {}", self.kind)?;
        write!(f, "{}", self.job)
    }
}

/// Fired to status listeners when the job monitor observes a new status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChangeEvent {
    pub job: FaxJob,
    pub status: FaxJobStatus,
    pub occurred_at: DateTime<Utc>,
}

impl StatusChangeEvent {
    pub fn new(job: FaxJob, status: FaxJobStatus) -> Self {
        Self {
            job,
            status,
            occurred_at: Utc::now(),
        }
    }
}

impl fmt::Display for StatusChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fax Monitor Event:")?;
        writeln!(f, "{}", self.job)?;
        write!(f, "Status: {}", self.status)
    }
}
