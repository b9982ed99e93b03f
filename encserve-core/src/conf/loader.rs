use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use crate::conf::error::ConfigError;
use crate::conf::types::EncserveConfig;

pub const DEFAULT_CONFIG_PATH: &str = "config/encserve.toml";

/// Read, parse and validate a config file.
///
/// A relative `static.root` is resolved against the directory holding the
/// file, so the config works regardless of the current directory.
pub fn load_config(path: &Path) -> Result<EncserveConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let mut config = parse_config(&contents).map_err(|e| ConfigError::parse(path, e))?;

    if config.static_files.root.is_relative() {
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.static_files.root = base.join(&config.static_files.root);
    }

    validate(&config)?;

    tracing::debug!(
        path = %path.display(),
        root = %config.static_files.root.display(),
        "loaded config"
    );
    Ok(config)
}

/// Parse config TOML without touching the file system.
pub fn parse_config(contents: &str) -> Result<EncserveConfig, toml::de::Error> {
    toml::from_str(contents)
}

fn validate(config: &EncserveConfig) -> Result<(), ConfigError> {
    config
        .server
        .listen
        .parse::<SocketAddr>()
        .map_err(|source| ConfigError::InvalidListen {
            listen: config.server.listen.clone(),
            source,
        })?;

    if config.server.threads == Some(0) {
        return Err(ConfigError::InvalidThreads);
    }

    if !config.static_files.root.is_dir() {
        return Err(ConfigError::MissingRoot {
            path: config.static_files.root.clone(),
        });
    }

    Ok(())
}
