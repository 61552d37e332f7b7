// Plugin Port - common lifecycle of every pluggable component

use crate::config::ConfigurationHolder;
use crate::error::Result;

/// Implemented by transports, interceptors and job monitors
///
/// A plugin is instantiated by name from the registry and initialized exactly
/// once with the merged configuration before it is shared.
pub trait Plugin: Send + Sync {
    fn initialize(&mut self, _config: &ConfigurationHolder) -> Result<()> {
        Ok(())
    }
}
