// Plugin Registry - name -> factory tables

use crate::application::dispatch::LogInterceptor;
use crate::application::monitor::constants::POLLING_MONITOR_NAME;
use crate::application::monitor::PollingJobMonitor;
use crate::error::{FaxError, Result};
use crate::port::{FaxInterceptor, FaxTransport, JobMonitor};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub type TransportFactory = Arc<dyn Fn() -> Box<dyn FaxTransport> + Send + Sync>;
pub type InterceptorFactory = Arc<dyn Fn() -> Box<dyn FaxInterceptor> + Send + Sync>;
pub type MonitorFactory = Arc<dyn Fn() -> Box<dyn JobMonitor> + Send + Sync>;

/// Implementations known to a factory, by registered name
///
/// Vendor crates register their transports here; the configuration then
/// selects them by name.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    transports: HashMap<String, TransportFactory>,
    interceptors: HashMap<String, InterceptorFactory>,
    monitors: HashMap<String, MonitorFactory>,
}

impl PluginRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `log` interceptor and `polling` monitor
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register_interceptor(LogInterceptor::NAME, || Box::new(LogInterceptor::new()))
            .register_monitor(POLLING_MONITOR_NAME, || Box::new(PollingJobMonitor::new()));
        registry
    }

    pub fn register_transport<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn FaxTransport> + Send + Sync + 'static,
    {
        self.transports.insert(name.into(), Arc::new(factory));
        self
    }

    pub fn register_interceptor<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn FaxInterceptor> + Send + Sync + 'static,
    {
        self.interceptors.insert(name.into(), Arc::new(factory));
        self
    }

    pub fn register_monitor<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn JobMonitor> + Send + Sync + 'static,
    {
        self.monitors.insert(name.into(), Arc::new(factory));
        self
    }

    pub fn create_transport(&self, name: &str) -> Result<Box<dyn FaxTransport>> {
        self.transports
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| unknown("transport", name))
    }

    pub fn create_interceptor(&self, name: &str) -> Result<Box<dyn FaxInterceptor>> {
        self.interceptors
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| unknown("interceptor", name))
    }

    pub fn create_monitor(&self, name: &str) -> Result<Box<dyn JobMonitor>> {
        self.monitors
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| unknown("job monitor", name))
    }

    pub fn transport_names(&self) -> Vec<String> {
        sorted_names(&self.transports)
    }

    pub fn interceptor_names(&self) -> Vec<String> {
        sorted_names(&self.interceptors)
    }

    pub fn monitor_names(&self) -> Vec<String> {
        sorted_names(&self.monitors)
    }
}

fn unknown(kind: &str, name: &str) -> FaxError {
    FaxError::Configuration(format!("Unknown {kind} implementation: {name}"))
}

fn sorted_names<V>(table: &HashMap<String, V>) -> Vec<String> {
    let mut names: Vec<String> = table.keys().cloned().collect();
    names.sort();
    names
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("transports", &self.transport_names())
            .field("interceptors", &self.interceptor_names())
            .field("monitors", &self.monitor_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::fax_transport::mocks::SpyTransport;

    #[test]
    fn test_builtins() {
        let registry = PluginRegistry::with_builtins();
        assert_eq!(registry.interceptor_names(), vec!["log"]);
        assert_eq!(registry.monitor_names(), vec!["polling"]);
        assert!(registry.transport_names().is_empty());

        assert_eq!(registry.create_interceptor("log").unwrap().name(), "log");
        assert!(registry.create_monitor("polling").is_ok());
    }

    #[test]
    fn test_unknown_name_is_configuration_error() {
        let registry = PluginRegistry::with_builtins();
        assert!(matches!(
            registry.create_transport("modem"),
            Err(FaxError::Configuration(msg)) if msg.contains("modem")
        ));
        assert!(matches!(
            registry.create_interceptor("audit"),
            Err(FaxError::Configuration(_))
        ));
        assert!(matches!(
            registry.create_monitor("push"),
            Err(FaxError::Configuration(_))
        ));
    }

    #[test]
    fn test_each_create_is_a_new_instance() {
        let mut registry = PluginRegistry::new();
        registry.register_transport("spy", || Box::new(SpyTransport::new()));

        let a = registry.create_transport("spy").unwrap();
        let b = registry.create_transport("spy").unwrap();
        assert_eq!(a.provider().name, "spy");
        assert!(!std::ptr::eq(
            a.as_ref() as *const dyn FaxTransport as *const (),
            b.as_ref() as *const dyn FaxTransport as *const ()
        ));
    }
}
