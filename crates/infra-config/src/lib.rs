// faxdispatch Infrastructure - Configuration Adapter
// Implements: ConfigurationSource (file + environment override layer)

mod file_source;

pub use file_source::{
    FileConfigurationSource, CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE, ENV_PREFIX, KEY_PREFIX,
};

// Note: config::ConfigError conversion is handled by a helper function
// due to Rust's orphan rules (cannot implement From<ConfigError> for FaxError here)
