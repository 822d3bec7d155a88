//! Where navkit keeps its config file, and writing the first one.

use navkit_common::ConfigError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::template::default_config_toml;

/// Directory under the platform config root.
const APP_DIR: &str = "navkit";
const CONFIG_FILE: &str = "config.toml";

/// `<config_dir>/navkit/config.toml` for the current platform.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let root = dirs::config_dir()
        .ok_or_else(|| ConfigError::ParseError("no platform config directory".into()))?;
    Ok(config_path_in(&root))
}

fn config_path_in(root: &Path) -> PathBuf {
    root.join(APP_DIR).join(CONFIG_FILE)
}

fn io_error(action: &str, path: &Path, e: std::io::Error) -> ConfigError {
    ConfigError::ParseError(format!("{action} {}: {e}", path.display()))
}

/// Write the documented template to `path`, creating missing parents.
///
/// An existing file is overwritten; `load_default` only calls this when
/// nothing is there yet.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| io_error("failed to create config directory", parent, e))?;
        debug!(dir = %parent.display(), "config directory ready");
    }

    std::fs::write(path, default_config_toml())
        .map_err(|e| io_error("failed to write default config to", path, e))?;

    info!(path = %path.display(), "created default config");
    Ok(())
}
