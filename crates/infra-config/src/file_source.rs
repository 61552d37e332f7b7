// File + environment configuration source

use config::{Config, ConfigError, Environment, File, Source, Value, ValueKind};
use directories::ProjectDirs;
use faxdispatch_core::config::keys::LIST_SEPARATOR;
use faxdispatch_core::error::{FaxError, Result};
use faxdispatch_core::port::ConfigurationSource;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming the configuration file (`~` is expanded)
pub const CONFIG_PATH_ENV: &str = "FAXDISPATCH_CONFIG";

/// File looked up in the platform config directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "faxdispatch.toml";

/// `FAXDISPATCH__TRANSPORT__DEFAULT__TYPE` -> `faxdispatch.transport.default.type`
pub const ENV_PREFIX: &str = "FAXDISPATCH";

/// Prefix added to keys read from the environment
pub const KEY_PREFIX: &str = "faxdispatch";

// Helper to convert ConfigError to FaxError
fn map_config_error(err: ConfigError) -> FaxError {
    match err {
        ConfigError::NotFound(key) => FaxError::Configuration(format!("Key not found: {key}")),
        ConfigError::FileParse { uri, cause } => FaxError::Configuration(format!(
            "Unable to parse configuration file {}: {}",
            uri.unwrap_or_else(|| "-".to_string()),
            cause
        )),
        other => FaxError::Configuration(other.to_string()),
    }
}

/// External override layer
///
/// Reads a TOML/JSON/YAML file (format from the extension) and
/// `FAXDISPATCH__*` environment variables; the environment wins. Nested
/// tables flatten to dotted keys and arrays join with `;`.
#[derive(Debug, Clone)]
pub struct FileConfigurationSource {
    path: Option<PathBuf>,
    required: bool,
    env_prefix: Option<String>,
    name: String,
}

impl FileConfigurationSource {
    /// Explicit file; missing file is an error
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: format!("file:{}", path.display()),
            path: Some(path),
            required: true,
            env_prefix: None,
        }
    }

    /// `$FAXDISPATCH_CONFIG`, else `<config dir>/faxdispatch/faxdispatch.toml`
    /// (optional), plus `FAXDISPATCH__*` environment variables
    pub fn from_env() -> Self {
        let (path, required) = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                (Some(PathBuf::from(shellexpand::tilde(path.trim()).into_owned())), true)
            }
            _ => (default_config_path(), false),
        };

        Self {
            name: match &path {
                Some(path) => format!("file:{}+env", path.display()),
                None => "env".to_string(),
            },
            path,
            required,
            env_prefix: Some(ENV_PREFIX.to_string()),
        }
    }

    /// Also read environment variables starting with `<prefix>__`
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn load_file(&self) -> Result<HashMap<String, String>> {
        let Some(path) = &self.path else {
            return Ok(HashMap::new());
        };
        if !self.required && !path.exists() {
            debug!(path = %path.display(), "No configuration file, skipping");
            return Ok(HashMap::new());
        }

        let table = Config::builder()
            .add_source(File::from(path.as_path()).required(self.required))
            .build()
            .and_then(|config| config.collect())
            .map_err(map_config_error)?;

        let mut values = HashMap::new();
        flatten(None, table, &mut values);
        Ok(values)
    }

    fn load_env(&self) -> Result<HashMap<String, String>> {
        let Some(prefix) = &self.env_prefix else {
            return Ok(HashMap::new());
        };

        let table = Config::builder()
            .add_source(Environment::with_prefix(prefix).separator("__"))
            .build()
            .and_then(|config| config.collect())
            .map_err(map_config_error)?;

        let mut values = HashMap::new();
        flatten(Some(KEY_PREFIX), table, &mut values);
        Ok(values)
    }
}

impl ConfigurationSource for FileConfigurationSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        let mut values = self.load_file()?;
        values.extend(self.load_env()?);
        debug!(source = %self.name, keys = values.len(), "Configuration source loaded");
        Ok(values)
    }
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "faxdispatch").map(|dirs| dirs.config_dir().join(DEFAULT_CONFIG_FILE))
}

fn flatten(prefix: Option<&str>, table: config::Map<String, Value>, out: &mut HashMap<String, String>) {
    for (key, value) in table {
        let key = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key,
        };
        flatten_value(key, value, out);
    }
}

fn flatten_value(key: String, value: Value, out: &mut HashMap<String, String>) {
    match value.kind {
        ValueKind::Nil => {}
        ValueKind::Table(table) => flatten(Some(&key), table, out),
        ValueKind::Array(items) => {
            let joined = items
                .into_iter()
                .filter_map(scalar)
                .collect::<Vec<_>>()
                .join(&LIST_SEPARATOR.to_string());
            out.insert(key, joined);
        }
        kind => {
            if let Some(text) = scalar(Value::from(kind)) {
                out.insert(key, text);
            }
        }
    }
}

fn scalar(value: Value) -> Option<String> {
    match value.kind {
        ValueKind::Nil | ValueKind::Table(_) | ValueKind::Array(_) => None,
        ValueKind::Boolean(b) => Some(b.to_string()),
        ValueKind::I64(n) => Some(n.to_string()),
        ValueKind::I128(n) => Some(n.to_string()),
        ValueKind::U64(n) => Some(n.to_string()),
        ValueKind::U128(n) => Some(n.to_string()),
        ValueKind::Float(n) => Some(n.to_string()),
        ValueKind::String(s) => Some(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::File::create(&path)
            .unwrap()
            .write_all(contents.as_bytes())
            .unwrap();
        path
    }

    #[test]
    fn test_toml_tables_flatten_to_dotted_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "faxdispatch.toml",
            r#"
[faxdispatch.transport.default]
type = "gateway"

[faxdispatch.monitor.polling]
interval = 250

[faxdispatch.interception]
list = ["log", "audit"]
enabled = true
"#,
        );

        let values = FileConfigurationSource::new(&path).load().unwrap();

        assert_eq!(values["faxdispatch.transport.default.type"], "gateway");
        assert_eq!(values["faxdispatch.monitor.polling.interval"], "250");
        assert_eq!(values["faxdispatch.interception.list"], "log;audit");
        assert_eq!(values["faxdispatch.interception.enabled"], "true");
    }

    #[test]
    fn test_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "faxdispatch.json",
            r#"{"fax": {"alpha": {"host": "alpha.example"}}}"#,
        );

        let values = FileConfigurationSource::new(&path).load().unwrap();
        assert_eq!(values["fax.alpha.host"], "alpha.example");
    }

    #[test]
    fn test_missing_required_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileConfigurationSource::new(dir.path().join("absent.toml"));

        assert!(matches!(source.load(), Err(FaxError::Configuration(_))));
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "broken.toml", "[faxdispatch\ntype = ");

        assert!(matches!(
            FileConfigurationSource::new(&path).load(),
            Err(FaxError::Configuration(_))
        ));
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "faxdispatch.toml",
            "[faxdispatch.monitor.polling]\ninterval = 250\n",
        );
        // Unique prefix so parallel tests never see it
        std::env::set_var("FAXTEST_ENVOVERRIDE__MONITOR__POLLING__INTERVAL", "900");

        let values = FileConfigurationSource::new(&path)
            .with_env_prefix("FAXTEST_ENVOVERRIDE")
            .load()
            .unwrap();

        std::env::remove_var("FAXTEST_ENVOVERRIDE__MONITOR__POLLING__INTERVAL");
        assert_eq!(values["faxdispatch.monitor.polling.interval"], "900");
    }

    #[test]
    fn test_map_config_error() {
        let err = map_config_error(ConfigError::NotFound("faxdispatch.x".to_string()));
        assert_eq!(err.kind(), "configuration");
        assert!(err.to_string().contains("faxdispatch.x"));
    }
}
