// Fax Job Domain Model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Fax job ID (assigned by the transport on submit)
pub type FaxJobId = String;

/// Fax job status as reported by a transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FaxJobStatus {
    Unknown,
    Pending,
    InProgress,
    Error,
}

impl FaxJobStatus {
    /// Terminal statuses end monitoring of a job
    pub fn is_terminal(&self) -> bool {
        matches!(self, FaxJobStatus::Error | FaxJobStatus::Unknown)
    }
}

impl fmt::Display for FaxJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaxJobStatus::Unknown => write!(f, "UNKNOWN"),
            FaxJobStatus::Pending => write!(f, "PENDING"),
            FaxJobStatus::InProgress => write!(f, "IN_PROGRESS"),
            FaxJobStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Fax job priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FaxJobPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for FaxJobPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaxJobPriority::Low => write!(f, "LOW"),
            FaxJobPriority::Medium => write!(f, "MEDIUM"),
            FaxJobPriority::High => write!(f, "HIGH"),
        }
    }
}

/// Fax Job Entity
///
/// Owned by the caller. A transport only ever reads it; the ID it assigns on
/// submit is written back by the client, never by the transport itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaxJob {
    pub id: FaxJobId, // empty until submitted
    pub file: Option<PathBuf>,
    pub priority: FaxJobPriority,

    pub target_address: Option<String>,
    pub target_name: Option<String>,

    pub sender_name: Option<String>,
    pub sender_fax_number: Option<String>,
    pub sender_email: Option<String>,

    // Transport specific extensions
    pub properties: BTreeMap<String, String>,
}

impl FaxJob {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn set_file_path(&mut self, path: impl Into<PathBuf>) {
        self.file = Some(path.into());
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Get a property value, falling back to `default` when unset
    pub fn property<'a>(&'a self, key: &str, default: Option<&'a str>) -> Option<&'a str> {
        self.properties.get(key).map(String::as_str).or(default)
    }
}

impl fmt::Display for FaxJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn opt(value: &Option<String>) -> &str {
            value.as_deref().unwrap_or("-")
        }

        writeln!(f, "Fax Job:")?;
        writeln!(f, "ID: {}", if self.id.is_empty() { "-" } else { &self.id })?;
        match &self.file {
            Some(path) => writeln!(f, "File: {}", path.display())?,
            None => writeln!(f, "File: -")?,
        }
        writeln!(f, "Priority: {}", self.priority)?;
        writeln!(f, "Target Address: {}", opt(&self.target_address))?;
        writeln!(f, "Target Name: {}", opt(&self.target_name))?;
        writeln!(f, "Sender Name: {}", opt(&self.sender_name))?;
        writeln!(f, "Sender Fax Number: {}", opt(&self.sender_fax_number))?;
        writeln!(f, "Sender Email: {}", opt(&self.sender_email))?;
        write!(f, "Properties: {:?}", self.properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_job_has_no_id_and_medium_priority() {
        let job = FaxJob::new();
        assert!(!job.has_id());
        assert_eq!(job.priority, FaxJobPriority::Medium);
    }

    #[test]
    fn test_property_default() {
        let mut job = FaxJob::new();
        job.set_property("text.file.encoding", "UTF-8");

        assert_eq!(job.property("text.file.encoding", None), Some("UTF-8"));
        assert_eq!(job.property("missing", Some("fallback")), Some("fallback"));
        assert_eq!(job.property("missing", None), None);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(FaxJobStatus::Error.is_terminal());
        assert!(FaxJobStatus::Unknown.is_terminal());
        assert!(!FaxJobStatus::Pending.is_terminal());
        assert!(!FaxJobStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_display_lists_fields() {
        let mut job = FaxJob::new();
        job.id = "42".to_string();
        job.target_address = Some("+1-555-0100".to_string());
        job.set_file_path("/tmp/cover.pdf");

        let text = job.to_string();
        assert!(text.contains("ID: 42"));
        assert!(text.contains("Target Address: +1-555-0100"));
        assert!(text.contains("File: /tmp/cover.pdf"));
        assert!(text.contains("Sender Email: -"));
    }

    #[test]
    fn test_status_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&FaxJobStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
        assert_eq!(FaxJobStatus::InProgress.to_string(), "IN_PROGRESS");
    }
}
