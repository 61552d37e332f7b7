// Configuration Holder - read-only view over merged configuration

use super::keys::{LIST_SEPARATOR, PROPERTY_PART_PLACEHOLDER};
use crate::error::{FaxError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Read-only configuration handed to plugins on initialize
///
/// Keys containing `{0}` are resolved against the holder's property part, so
/// two instances of the same transport can read `fax.{0}.host` as
/// `fax.alpha.host` and `fax.beta.host`. Values are trimmed and an empty
/// value reads as absent.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationHolder {
    values: Arc<HashMap<String, String>>,
    property_part: Option<String>,
}

impl ConfigurationHolder {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self {
            values: Arc::new(values),
            property_part: None,
        }
    }

    /// Same values, different property part (values are shared, not copied)
    pub fn with_property_part(&self, property_part: Option<String>) -> Self {
        Self {
            values: Arc::clone(&self.values),
            property_part: property_part.filter(|part| !part.trim().is_empty()),
        }
    }

    pub fn property_part(&self) -> Option<&str> {
        self.property_part.as_deref()
    }

    pub fn values(&self) -> &HashMap<String, String> {
        &self.values
    }

    /// Resolve the `{0}` placeholder of a key template
    pub fn resolve_key(&self, key: &str) -> String {
        match &self.property_part {
            Some(part) if key.contains(PROPERTY_PART_PLACEHOLDER) => {
                key.replace(PROPERTY_PART_PLACEHOLDER, part)
            }
            _ => key.to_string(),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let resolved = self.resolve_key(key);
        let value = self
            .values
            .get(&resolved)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        debug!(key = %resolved, value = ?value, "Configuration lookup");
        value
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(FaxError::Configuration(format!(
                    "Invalid boolean value '{}' for key {}",
                    value,
                    self.resolve_key(key)
                ))),
            },
        }
    }

    pub fn get_u64(&self, key: &str, default: u64) -> Result<u64> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value.parse::<u64>().map_err(|e| {
                FaxError::Configuration(format!(
                    "Invalid numeric value '{}' for key {}: {}",
                    value,
                    self.resolve_key(key),
                    e
                ))
            }),
        }
    }

    /// `;` separated list, blank entries skipped
    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|value| {
                value
                    .split(LIST_SEPARATOR)
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl From<HashMap<String, String>> for ConfigurationHolder {
    fn from(values: HashMap<String, String>) -> Self {
        Self::new(values)
    }
}
