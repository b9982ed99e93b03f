use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EncserveConfig {
    pub server: ServerConfig,

    #[serde(rename = "static")]
    pub static_files: StaticConfig,

    #[serde(default)]
    pub test_handlers: TestHandlersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to listen on, e.g. `127.0.0.1:8080`.
    pub listen: String,

    /// Optional number of worker threads - default is decided by Pingora.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StaticConfig {
    /// Directory to serve. Relative paths are resolved against the directory
    /// holding the config file.
    pub root: PathBuf,

    #[serde(default = "default_directory_listing")]
    pub directory_listing: bool,
}

/// Query-string driven wrappers meant for test servers.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TestHandlersConfig {
    #[serde(default)]
    pub delay: bool,

    #[serde(default)]
    pub add_headers: bool,
}

fn default_directory_listing() -> bool {
    true
}
