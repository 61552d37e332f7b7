// Configuration Source Port
// External override layer (file, environment) supplied by infrastructure

use crate::error::Result;
use std::collections::HashMap;

/// Loads the external configuration layer as flat dotted keys
pub trait ConfigurationSource: Send + Sync {
    /// Human readable origin, for logging
    fn name(&self) -> &str;

    fn load(&self) -> Result<HashMap<String, String>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::FaxError;

    /// In-memory source
    pub struct StaticConfigurationSource {
        values: HashMap<String, String>,
        failure: Option<String>,
    }

    impl StaticConfigurationSource {
        pub fn new<I, K, V>(values: I) -> Self
        where
            I: IntoIterator<Item = (K, V)>,
            K: Into<String>,
            V: Into<String>,
        {
            Self {
                values: values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
                failure: None,
            }
        }

        pub fn failing(message: impl Into<String>) -> Self {
            Self {
                values: HashMap::new(),
                failure: Some(message.into()),
            }
        }
    }

    impl ConfigurationSource for StaticConfigurationSource {
        fn name(&self) -> &str {
            "static"
        }

        fn load(&self) -> Result<HashMap<String, String>> {
            match &self.failure {
                Some(message) => Err(FaxError::Configuration(message.clone())),
                None => Ok(self.values.clone()),
            }
        }
    }
}
