// Dispatch Facade - composition root for fax clients
//
// Resolves the shared job monitor once, then builds each client:
// merged configuration -> transport type -> leaf -> initialize ->
// optional interception chain.

use crate::application::client::TransportClient;
use crate::application::dispatch::InterceptedClient;
use crate::application::operations::FaxOperations;
use crate::application::plugin::{PluginRegistry, PluginResolver};
use crate::config::{merge_layers, system_configuration, ConfigurationHolder};
use crate::domain::{FaxJob, FaxJobStatus, Provider};
use crate::error::{FaxError, Result};
use crate::port::{ActionListener, ConfigurationSource, FaxTransport, JobMonitor, StatusListener};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Creates fax clients; clones share the registry, configuration and monitor
#[derive(Clone)]
pub struct FaxClientFactory {
    registry: Arc<PluginRegistry>,
    system_configuration: Arc<HashMap<String, String>>,
    monitor: Arc<dyn JobMonitor>,
}

impl FaxClientFactory {
    /// `system_configuration` is the merged bundled defaults + external layer
    ///
    /// # Errors
    /// - Configuration when the job monitor cannot be resolved or initialized
    pub fn new(registry: PluginRegistry, system_configuration: HashMap<String, String>) -> Result<Self> {
        let config = ConfigurationHolder::new(system_configuration.clone());
        let monitor: Arc<dyn JobMonitor> =
            Arc::from(PluginResolver::new(&registry).resolve_monitor(&config)?);

        Ok(Self {
            registry: Arc::new(registry),
            system_configuration: Arc::new(system_configuration),
            monitor,
        })
    }

    /// Bundled defaults overlaid with `source`, then [`FaxClientFactory::new`]
    pub fn from_source(registry: PluginRegistry, source: Option<&dyn ConfigurationSource>) -> Result<Self> {
        Self::new(registry, system_configuration(source)?)
    }

    pub fn monitor(&self) -> Arc<dyn JobMonitor> {
        Arc::clone(&self.monitor)
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Client for `transport_type` (or the configured default type)
    pub fn create_client(
        &self,
        transport_type: Option<&str>,
        overrides: HashMap<String, String>,
    ) -> Result<FaxClient> {
        self.compose(transport_type, overrides, true)
    }

    /// Client for use inside another transport; never intercepted
    pub fn create_child_client(
        &self,
        transport_type: Option<&str>,
        overrides: HashMap<String, String>,
    ) -> Result<FaxClient> {
        self.compose(transport_type, overrides, false)
    }

    /// Stop the shared monitor
    pub async fn shutdown(&self) {
        self.monitor.shutdown().await;
    }

    fn compose(
        &self,
        transport_type: Option<&str>,
        overrides: HashMap<String, String>,
        intercept: bool,
    ) -> Result<FaxClient> {
        let config = ConfigurationHolder::new(merge_layers([
            self.system_configuration.as_ref().clone(),
            overrides,
        ]));
        let resolver = PluginResolver::new(&self.registry);

        let (transport_type, leaf) = resolver.resolve_transport(&config, transport_type)?;
        let provider = leaf.provider();
        if provider.name.trim().is_empty() {
            return Err(FaxError::Configuration(format!(
                "Provider name not provided by transport: {transport_type}"
            )));
        }

        let mut client = TransportClient::new(leaf);
        client.initialize(config.clone(), Arc::clone(&self.monitor))?;
        let client: Arc<dyn FaxOperations> = Arc::new(client);

        let (operations, interceptors) = if intercept {
            let interceptors = resolver.resolve_interceptors(&config)?;
            if interceptors.is_empty() {
                (client, 0)
            } else {
                let count = interceptors.len();
                let wrapped: Arc<dyn FaxOperations> =
                    Arc::new(InterceptedClient::new(client, interceptors));
                (wrapped, count)
            }
        } else {
            (client, 0)
        };

        info!(
            transport_type = %transport_type,
            provider = %provider.name,
            interceptors,
            "Fax client created"
        );

        Ok(FaxClient {
            transport_type,
            provider,
            operations,
        })
    }
}

impl fmt::Debug for FaxClientFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaxClientFactory")
            .field("registry", &self.registry)
            .field("keys", &self.system_configuration.len())
            .finish()
    }
}

/// Caller boundary: one fax client over one transport
#[derive(Clone)]
pub struct FaxClient {
    transport_type: String,
    provider: Provider,
    operations: Arc<dyn FaxOperations>,
}

impl FaxClient {
    pub fn transport_type(&self) -> &str {
        &self.transport_type
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    pub fn supports_monitoring(&self) -> Result<bool> {
        self.operations.supports_monitoring()
    }

    pub fn create_job(&self) -> Result<FaxJob> {
        self.operations.create_job()
    }

    pub async fn submit(&self, job: FaxJob) -> Result<FaxJob> {
        self.operations.submit(job).await
    }

    pub async fn suspend(&self, job: &FaxJob) -> Result<()> {
        self.operations.suspend(job).await
    }

    pub async fn resume(&self, job: &FaxJob) -> Result<()> {
        self.operations.resume(job).await
    }

    pub async fn cancel(&self, job: &FaxJob) -> Result<()> {
        self.operations.cancel(job).await
    }

    pub async fn status(&self, job: &FaxJob) -> Result<FaxJobStatus> {
        self.operations.status(job).await
    }

    pub fn add_action_listener(&self, listener: Arc<dyn ActionListener>) -> Result<()> {
        self.operations.add_action_listener(listener)
    }

    pub fn remove_action_listener(&self, listener: &Arc<dyn ActionListener>) -> Result<()> {
        self.operations.remove_action_listener(listener)
    }

    pub fn remove_all_action_listeners(&self) -> Result<()> {
        self.operations.remove_all_action_listeners()
    }

    pub fn add_status_listener(&self, listener: Arc<dyn StatusListener>) -> Result<()> {
        self.operations.add_status_listener(listener)
    }

    pub fn remove_status_listener(&self, listener: &Arc<dyn StatusListener>) -> Result<()> {
        self.operations.remove_status_listener(listener)
    }

    pub fn remove_all_status_listeners(&self) -> Result<()> {
        self.operations.remove_all_status_listeners()
    }
}

impl fmt::Debug for FaxClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaxClient")
            .field("transport_type", &self.transport_type)
            .field("provider", &self.provider)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::keys;
    use crate::port::fax_transport::mocks::SpyTransport;
    use crate::port::interceptor::mocks::{HookLog, RecordingInterceptor};
    use parking_lot::Mutex;

    fn registry(spy: &SpyTransport, log: &HookLog) -> PluginRegistry {
        let mut registry = PluginRegistry::with_builtins();
        let spy = spy.clone();
        let log = Arc::clone(log);
        registry
            .register_transport("spy", move || Box::new(spy.clone()))
            .register_transport("anonymous", || {
                Box::new(SpyTransport::new().with_provider_name(" "))
            })
            .register_interceptor("recording", move || {
                Box::new(RecordingInterceptor::new("recording", Arc::clone(&log)))
            });
        registry
    }

    fn system(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        let mut values = crate::config::bundled_defaults();
        for (k, v) in pairs {
            values.insert(k.to_string(), v.to_string());
        }
        values
    }

    fn overrides(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_default_transport_type() {
        let spy = SpyTransport::new();
        let log: HookLog = Arc::new(Mutex::new(Vec::new()));
        let factory =
            FaxClientFactory::new(registry(&spy, &log), system(&[(keys::DEFAULT_TRANSPORT_TYPE, "spy")]))
                .unwrap();

        let client = factory.create_client(None, HashMap::new()).unwrap();
        assert_eq!(client.transport_type(), "spy");
        assert_eq!(client.provider().name, "spy");
        assert_eq!(spy.call_count("initialize"), 1);
    }

    #[tokio::test]
    async fn test_missing_type_is_configuration_error() {
        let spy = SpyTransport::new();
        let log: HookLog = Arc::new(Mutex::new(Vec::new()));
        let factory = FaxClientFactory::new(registry(&spy, &log), system(&[])).unwrap();

        assert!(matches!(
            factory.create_client(None, HashMap::new()),
            Err(FaxError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_overrides_win_and_reach_transport() {
        let spy = SpyTransport::new();
        let log: HookLog = Arc::new(Mutex::new(Vec::new()));
        let factory = FaxClientFactory::new(
            registry(&spy, &log),
            system(&[("fax.spy.host", "system.example")]),
        )
        .unwrap();

        factory
            .create_client(
                Some("gateway"),
                overrides(&[
                    ("faxdispatch.transport.type.map.gateway", "spy"),
                    ("fax.spy.host", "override.example"),
                ]),
            )
            .unwrap();

        let config = spy.received_config().unwrap();
        assert_eq!(config.get("fax.spy.host").as_deref(), Some("override.example"));
    }

    #[tokio::test]
    async fn test_empty_provider_name_aborts() {
        let spy = SpyTransport::new();
        let log: HookLog = Arc::new(Mutex::new(Vec::new()));
        let factory = FaxClientFactory::new(registry(&spy, &log), system(&[])).unwrap();

        assert!(matches!(
            factory.create_client(Some("anonymous"), HashMap::new()),
            Err(FaxError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_interceptors_wrap_client_but_not_child() {
        let spy = SpyTransport::new();
        let log: HookLog = Arc::new(Mutex::new(Vec::new()));
        let factory = FaxClientFactory::new(
            registry(&spy, &log),
            system(&[
                (keys::INTERCEPTION_LIST, "recording"),
                ("faxdispatch.interception.type.recording", "recording"),
            ]),
        )
        .unwrap();

        let client = factory.create_client(Some("spy"), HashMap::new()).unwrap();
        client.create_job().unwrap();
        assert_eq!(
            *log.lock(),
            vec!["recording:before:create_job", "recording:after:create_job"]
        );

        log.lock().clear();
        let child = factory.create_child_client(Some("spy"), HashMap::new()).unwrap();
        child.create_job().unwrap();
        assert!(log.lock().is_empty());
    }

    #[tokio::test]
    async fn test_interception_disabled_by_override() {
        let spy = SpyTransport::new();
        let log: HookLog = Arc::new(Mutex::new(Vec::new()));
        let factory = FaxClientFactory::new(
            registry(&spy, &log),
            system(&[
                (keys::INTERCEPTION_LIST, "recording"),
                ("faxdispatch.interception.type.recording", "recording"),
            ]),
        )
        .unwrap();

        let client = factory
            .create_client(Some("spy"), overrides(&[(keys::INTERCEPTION_ENABLED, "false")]))
            .unwrap();
        client.create_job().unwrap();
        assert!(log.lock().is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_monitor() {
        let spy = SpyTransport::new();
        let log: HookLog = Arc::new(Mutex::new(Vec::new()));
        let factory = FaxClientFactory::new(registry(&spy, &log), system(&[])).unwrap();
        let clone = factory.clone();

        assert!(Arc::ptr_eq(&factory.monitor(), &clone.monitor()));
    }

    #[tokio::test]
    async fn test_invalid_monitor_settings_abort_factory() {
        let spy = SpyTransport::new();
        let log: HookLog = Arc::new(Mutex::new(Vec::new()));

        let result = FaxClientFactory::new(
            registry(&spy, &log),
            system(&[(keys::MONITOR_POLLING_INTERVAL, "0")]),
        );
        assert!(matches!(result, Err(FaxError::Configuration(_))));
    }
}
