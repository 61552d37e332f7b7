// Configuration - layered flat key/value model

mod holder;
pub mod keys;
mod layers;

pub use holder::ConfigurationHolder;
pub use layers::{bundled_defaults, merge_layers, system_configuration, BUNDLED_DEFAULTS};
