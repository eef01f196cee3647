use std::fs;
use std::path::Path;

use anyhow::Context;
use quiver_store::StoreConfig;

/// Read a TOML store configuration, or fall back to defaults when no file
/// is given.
pub fn load_store_config(path: Option<&Path>) -> anyhow::Result<StoreConfig> {
    let Some(path) = path else {
        return Ok(StoreConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}
