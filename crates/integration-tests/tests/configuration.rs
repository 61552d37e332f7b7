//! External configuration file driving client composition

mod common;

use std::collections::HashMap;

use common::{init_tracing, registry_with};
use faxdispatch_core::port::fax_transport::mocks::SpyTransport;
use faxdispatch_core::port::ConfigurationSource;
use faxdispatch_core::{FaxClientFactory, FaxError};
use faxdispatch_infra_config::FileConfigurationSource;

fn write_config(dir: &tempfile::TempDir, contents: &str) -> anyhow::Result<std::path::PathBuf> {
    let path = dir.path().join("faxdispatch.toml");
    std::fs::write(&path, contents)?;
    Ok(path)
}

#[tokio::test]
async fn test_file_selects_default_transport_and_settings() -> anyhow::Result<()> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = write_config(
        &dir,
        r#"
[faxdispatch.transport.default]
type = "office"

[faxdispatch.transport.type.map]
office = "spy"

[fax.branch]
host = "branch.example"
"#,
    )?;
    let source = FileConfigurationSource::new(&path);
    let spy = SpyTransport::new().with_property_part("branch");

    let factory = FaxClientFactory::from_source(registry_with(&spy), Some(&source as &dyn ConfigurationSource))?;
    let client = factory.create_client(None, HashMap::new())?;

    assert_eq!(client.transport_type(), "office");
    let config = spy.received_config().expect("transport initialized");
    assert_eq!(config.property_part(), Some("branch"));
    assert_eq!(config.get("fax.{0}.host").as_deref(), Some("branch.example"));
    // Bundled defaults still present underneath
    assert_eq!(
        config.get("faxdispatch.monitor.implementation").as_deref(),
        Some("polling")
    );
    Ok(())
}

#[tokio::test]
async fn test_caller_overrides_beat_file() -> anyhow::Result<()> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = write_config(
        &dir,
        "[faxdispatch.transport.default]\ntype = \"missing\"\n",
    )?;
    let source = FileConfigurationSource::new(&path);
    let spy = SpyTransport::new();
    let factory = FaxClientFactory::from_source(registry_with(&spy), Some(&source as &dyn ConfigurationSource))?;

    let mut overrides = HashMap::new();
    overrides.insert(
        "faxdispatch.transport.default.type".to_string(),
        "spy".to_string(),
    );
    let client = factory.create_client(None, overrides)?;
    assert_eq!(client.transport_type(), "spy");
    Ok(())
}

#[tokio::test]
async fn test_zero_polling_interval_aborts_factory() -> anyhow::Result<()> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = write_config(&dir, "[faxdispatch.monitor.polling]\ninterval = 0\n")?;
    let source = FileConfigurationSource::new(&path);

    let result = FaxClientFactory::from_source(
        registry_with(&SpyTransport::new()),
        Some(&source as &dyn ConfigurationSource),
    );
    assert!(matches!(result, Err(FaxError::Configuration(_))));
    Ok(())
}

#[tokio::test]
async fn test_unknown_monitor_implementation_aborts_factory() -> anyhow::Result<()> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = write_config(&dir, "[faxdispatch.monitor]\nimplementation = \"push\"\n")?;
    let source = FileConfigurationSource::new(&path);

    let result = FaxClientFactory::from_source(
        registry_with(&SpyTransport::new()),
        Some(&source as &dyn ConfigurationSource),
    );
    assert!(matches!(result, Err(FaxError::Configuration(_))));
    Ok(())
}

#[tokio::test]
async fn test_unreadable_file_aborts_factory() -> anyhow::Result<()> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let source = FileConfigurationSource::new(dir.path().join("nope.toml"));

    let result = FaxClientFactory::from_source(
        registry_with(&SpyTransport::new()),
        Some(&source as &dyn ConfigurationSource),
    );
    assert!(matches!(result, Err(FaxError::Configuration(_))));
    Ok(())
}
