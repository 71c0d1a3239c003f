use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use tracing::debug;

use crate::config::AppConfig;

const CONFIG_DIR: &str = "digitalhub";
const CONFIG_FILE: &str = "config.toml";

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR))
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

/// Load the user config, falling back to defaults when there is none.
pub fn load() -> color_eyre::Result<AppConfig> {
    match config_path() {
        Some(path) => load_from(&path),
        None => {
            debug!("No config directory found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

pub fn load_from(path: &Path) -> color_eyre::Result<AppConfig> {
    if !path.exists() {
        debug!("Config file not found at {:?}, using defaults", path);
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)
        .wrap_err_with(|| format!("Invalid config file at {}", path.display()))?;
    debug!("Loaded config from {:?}", path);
    Ok(config)
}
