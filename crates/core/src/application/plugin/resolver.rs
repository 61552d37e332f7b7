// Plugin Resolver - configuration driven plugin selection

use super::registry::PluginRegistry;
use crate::config::{keys, ConfigurationHolder};
use crate::error::{FaxError, Result};
use crate::port::{FaxInterceptor, FaxTransport, JobMonitor, Plugin};
use std::sync::Arc;
use tracing::debug;

/// Resolves implementation names from configuration and instantiates them
pub struct PluginResolver<'a> {
    registry: &'a PluginRegistry,
}

impl<'a> PluginResolver<'a> {
    pub fn new(registry: &'a PluginRegistry) -> Self {
        Self { registry }
    }

    /// Explicit, non-empty configuration value wins over `default`
    ///
    /// # Errors
    /// - Configuration when neither is available
    pub fn resolve_name(
        config: &ConfigurationHolder,
        key: &str,
        default: Option<&str>,
    ) -> Result<String> {
        config
            .get(key)
            .or_else(|| {
                default
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
            })
            .ok_or_else(|| {
                FaxError::Configuration(format!("Implementation not configured: {key}"))
            })
    }

    /// Shared job monitor, initialized
    pub fn resolve_monitor(&self, config: &ConfigurationHolder) -> Result<Box<dyn JobMonitor>> {
        let name = Self::resolve_name(
            config,
            keys::MONITOR_IMPLEMENTATION,
            Some(keys::DEFAULT_MONITOR_IMPLEMENTATION),
        )?;
        let mut monitor = self.registry.create_monitor(&name)?;
        monitor.initialize(config)?;
        debug!(monitor = %name, "Job monitor resolved");
        Ok(monitor)
    }

    /// Transport type (argument or configured default) and its leaf, not yet initialized
    pub fn resolve_transport(
        &self,
        config: &ConfigurationHolder,
        transport_type: Option<&str>,
    ) -> Result<(String, Box<dyn FaxTransport>)> {
        let explicit = transport_type
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        let transport_type = match explicit {
            Some(t) => t,
            None => config.get(keys::DEFAULT_TRANSPORT_TYPE).ok_or_else(|| {
                FaxError::Configuration(format!(
                    "Transport type not provided and {} not configured.",
                    keys::DEFAULT_TRANSPORT_TYPE
                ))
            })?,
        };

        let implementation = Self::resolve_name(
            config,
            &keys::transport_type_map_key(&transport_type),
            Some(&transport_type),
        )?;
        let transport = self.registry.create_transport(&implementation)?;
        debug!(transport_type = %transport_type, implementation = %implementation, "Transport resolved");
        Ok((transport_type, transport))
    }

    /// Configured interceptor chain, initialized, in list order
    ///
    /// Empty when interception is disabled or no interceptor is listed.
    pub fn resolve_interceptors(
        &self,
        config: &ConfigurationHolder,
    ) -> Result<Vec<Arc<dyn FaxInterceptor>>> {
        if !config.get_bool(keys::INTERCEPTION_ENABLED, true)? {
            return Ok(Vec::new());
        }

        let mut interceptors = Vec::new();
        for name in config.get_list(keys::INTERCEPTION_LIST) {
            let implementation =
                Self::resolve_name(config, &keys::interception_type_key(&name), None)?;
            let mut interceptor = self.registry.create_interceptor(&implementation)?;
            interceptor.initialize(config)?;
            debug!(interceptor = %name, implementation = %implementation, "Interceptor resolved");
            interceptors.push(Arc::from(interceptor));
        }
        Ok(interceptors)
    }
}
