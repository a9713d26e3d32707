use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Default taskboard data directory: `~/.taskboard`.
pub fn get_taskboard_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".taskboard"))
}

pub fn load_from(path: &Path) -> anyhow::Result<AppConfig> {
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str::<AppConfig>(&raw)?)
}

/// Loads config with the usual priority chain: `~/.taskboard/config.toml`,
/// then `./config.toml`, then built-in defaults, with `TASKBOARD_*`
/// environment variables overriding everything.
pub fn load_default() -> anyhow::Result<AppConfig> {
    let home_config = get_taskboard_data_dir()?.join("config.toml");
    let local_config = Path::new("config.toml");

    let mut cfg = if home_config.exists() {
        load_from(&home_config)?
    } else if local_config.exists() {
        load_from(local_config)?
    } else {
        AppConfig::default()
    };

    if let Ok(v) = std::env::var("TASKBOARD_API_URL") {
        if !v.trim().is_empty() {
            cfg.api.base_url = v;
        }
    }
    if let Ok(v) = std::env::var("TASKBOARD_API_KEY") {
        if !v.trim().is_empty() {
            cfg.api.api_key = v;
        }
    }
    if let Ok(v) = std::env::var("TASKBOARD_LOG_LEVEL") {
        if !v.trim().is_empty() {
            cfg.logging.level = v;
        }
    }

    Ok(cfg)
}
