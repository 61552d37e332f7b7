// Plugin resolution - registry of factories selected by configuration

mod registry;
mod resolver;

pub use registry::{InterceptorFactory, MonitorFactory, PluginRegistry, TransportFactory};
pub use resolver::PluginResolver;
