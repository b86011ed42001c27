//! Loading `relbump.toml`.

use crate::error::{Error, Result};
use relbump_engine::ReleaseConfig;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Configuration file name, looked up in the repository root.
pub const CONFIG_FILE: &str = "relbump.toml";

/// Load and validate the configuration under `root`.
///
/// A missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid TOML, or
/// contains invalid values.
pub fn load_config(root: &Path) -> Result<ReleaseConfig> {
    let path = root.join(CONFIG_FILE);
    if !path.is_file() {
        debug!(path = %path.display(), "No configuration file, using defaults");
        return Ok(ReleaseConfig::default());
    }

    let text = fs::read_to_string(&path).map_err(|e| Error::io(e, &path, "reading configuration"))?;
    let config: ReleaseConfig = toml::from_str(&text).map_err(|e| Error::Toml {
        source: e,
        path: path.clone(),
    })?;
    config.validate()?;
    debug!(path = %path.display(), "Loaded configuration");
    Ok(config)
}
