use std::path::Path;

use anyhow::Result;

use crate::conf::load_config;

/// Print the resolved configuration (defaults filled in, root made absolute
/// relative to the config file) as TOML.
pub fn dump(path: &Path) -> Result<()> {
    let cfg = load_config(path)?;
    print!("{}", toml::to_string_pretty(&cfg)?);
    Ok(())
}
