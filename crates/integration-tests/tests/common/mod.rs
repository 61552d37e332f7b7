//! Shared fixtures for the integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use faxdispatch_core::config::bundled_defaults;
use faxdispatch_core::port::fax_transport::mocks::SpyTransport;
use faxdispatch_core::{FaxClientFactory, FaxJob, PluginRegistry};
use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber once per test binary (`RUST_LOG` honored)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Non-empty document to fax
pub fn fax_file(dir: &tempfile::TempDir) -> anyhow::Result<PathBuf> {
    let path = dir.path().join("document.txt");
    std::fs::write(&path, b"Quarterly report, page 1").context("write fax document")?;
    Ok(path)
}

pub fn sendable_job(mut job: FaxJob, file: PathBuf) -> FaxJob {
    job.target_address = Some("+1-555-0100".to_string());
    job.target_name = Some("Accounts".to_string());
    job.sender_name = Some("Integration".to_string());
    job.set_file_path(file);
    job
}

pub fn pairs(values: &[(&str, &str)]) -> HashMap<String, String> {
    values
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Registry with the built-ins plus `spy` (sharing state with `spy`)
pub fn registry_with(spy: &SpyTransport) -> PluginRegistry {
    let mut registry = PluginRegistry::with_builtins();
    let spy = spy.clone();
    registry.register_transport("spy", move || Box::new(spy.clone()));
    registry
}

/// Factory over bundled defaults plus `system` settings
pub fn factory_with(
    registry: PluginRegistry,
    system: &[(&str, &str)],
) -> anyhow::Result<FaxClientFactory> {
    let mut values = bundled_defaults();
    values.extend(pairs(system));
    FaxClientFactory::new(registry, values).context("create factory")
}

/// Check `condition` every 10ms until it holds or `timeout` passes
pub async fn eventually(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    tokio::time::timeout(timeout, async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .is_ok()
}
