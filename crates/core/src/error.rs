// Central Error Type for the dispatch engine

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Dispatch error taxonomy
///
/// Every public operation either returns a well-formed result or one of
/// these variants with a message naming the violated precondition.
#[derive(Error, Debug)]
pub enum FaxError {
    /// Missing or invalid implementation name or setting
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Bad job state or arguments at the contract boundary
    #[error("Validation error: {0}")]
    Validation(String),

    /// Lifecycle misuse (double initialize, use before initialize)
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// Capability not implemented by a transport
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Failure of the underlying transport call
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl FaxError {
    pub fn transport(message: impl Into<String>) -> Self {
        FaxError::Transport {
            message: message.into(),
            source: None,
        }
    }

    pub fn transport_with_source(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        FaxError::Transport {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Leaf transport does not implement the named operation
    pub fn unsupported(operation: &str) -> Self {
        FaxError::Unsupported(format!("{operation}: Operation not supported."))
    }

    /// Short kind name, used in structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            FaxError::Configuration(_) => "configuration",
            FaxError::Validation(_) => "validation",
            FaxError::IllegalState(_) => "illegal_state",
            FaxError::Unsupported(_) => "unsupported",
            FaxError::Transport { .. } => "transport",
        }
    }
}

/// Result type alias using FaxError
pub type Result<T> = std::result::Result<T, FaxError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_transport_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "modem timeout");
        let err = FaxError::transport_with_source("dial failed", io);

        assert_eq!(err.to_string(), "Transport error: dial failed");
        assert_eq!(err.kind(), "transport");
        assert!(err.source().unwrap().to_string().contains("modem timeout"));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(FaxError::Validation("x".into()).kind(), "validation");
        assert_eq!(FaxError::IllegalState("x".into()).kind(), "illegal_state");
        assert_eq!(FaxError::Unsupported("x".into()).kind(), "unsupported");
        assert_eq!(FaxError::Configuration("x".into()).kind(), "configuration");
    }

    #[test]
    fn test_unsupported_names_operation() {
        let err = FaxError::unsupported("suspend");
        assert_eq!(err.to_string(), "Unsupported operation: suspend: Operation not supported.");
    }
}
