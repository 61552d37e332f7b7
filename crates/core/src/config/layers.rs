// Configuration layers: bundled defaults < external override < caller overrides

use super::keys;
use crate::error::Result;
use crate::port::ConfigurationSource;
use std::collections::HashMap;
use tracing::debug;

/// Defaults shipped with the library
pub const BUNDLED_DEFAULTS: &[(&str, &str)] = &[
    (keys::MONITOR_IMPLEMENTATION, keys::DEFAULT_MONITOR_IMPLEMENTATION),
    (keys::MONITOR_POLLING_INTERVAL, "5000"),
    (keys::MONITOR_POLLING_INTERVAL_FIXED, "false"),
    (keys::INTERCEPTION_ENABLED, "true"),
    ("faxdispatch.interception.type.log", "log"),
];

pub fn bundled_defaults() -> HashMap<String, String> {
    BUNDLED_DEFAULTS
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Merge layers lowest to highest priority; later layers win per key
pub fn merge_layers<I>(layers: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = HashMap<String, String>>,
{
    let mut merged = HashMap::new();
    for layer in layers {
        merged.extend(layer);
    }
    merged
}

/// Bundled defaults overlaid with the external source, if any
pub fn system_configuration(source: Option<&dyn ConfigurationSource>) -> Result<HashMap<String, String>> {
    let external = match source {
        Some(source) => {
            let values = source.load()?;
            debug!(source = source.name(), keys = values.len(), "External configuration loaded");
            values
        }
        None => HashMap::new(),
    };

    Ok(merge_layers([bundled_defaults(), external]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::configuration_source::mocks::StaticConfigurationSource;

    #[test]
    fn test_later_layer_wins() {
        let low = HashMap::from([("a".to_string(), "1".to_string()), ("b".to_string(), "1".to_string())]);
        let high = HashMap::from([("b".to_string(), "2".to_string())]);

        let merged = merge_layers([low, high]);
        assert_eq!(merged["a"], "1");
        assert_eq!(merged["b"], "2");
    }

    #[test]
    fn test_system_configuration_overlays_defaults() {
        let source = StaticConfigurationSource::new([(keys::MONITOR_POLLING_INTERVAL, "100")]);

        let merged = system_configuration(Some(&source)).unwrap();
        assert_eq!(merged[keys::MONITOR_POLLING_INTERVAL], "100");
        assert_eq!(merged[keys::MONITOR_IMPLEMENTATION], "polling");
    }

    #[test]
    fn test_failing_source_aborts() {
        let source = StaticConfigurationSource::failing("unreadable");
        assert!(system_configuration(Some(&source)).is_err());
    }
}
