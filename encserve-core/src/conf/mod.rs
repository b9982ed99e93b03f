mod error;
mod loader;
pub mod types;


pub use error::ConfigError;
pub use loader::{DEFAULT_CONFIG_PATH, load_config, parse_config};
pub use types::{EncserveConfig, ServerConfig, StaticConfig, TestHandlersConfig};
