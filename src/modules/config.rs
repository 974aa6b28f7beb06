use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::models::AppConfig;

const DATA_DIR: &str = ".gitlab_proxy";
const CONFIG_FILE: &str = "config.json";

/// Overrides the config file location
pub const CONFIG_PATH_ENV: &str = "GITLAB_PROXY_CONFIG";
pub const URL_ENV: &str = "GITLAB_URL";
pub const ACCESS_TOKEN_ENV: &str = "GITLAB_ACCESS_TOKEN";

/// Get data directory path, creating it if needed
pub fn get_data_dir() -> AppResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| AppError::Config("Failed to get user home directory".to_string()))?;
    let data_dir = home.join(DATA_DIR);

    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)?;
    }

    Ok(data_dir)
}

fn config_path() -> AppResult<PathBuf> {
    match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) => Ok(PathBuf::from(path)),
        None => Ok(get_data_dir()?.join(CONFIG_FILE)),
    }
}

/// Load application config: file (or defaults), then environment overrides, then validation
pub fn load_app_config() -> AppResult<AppConfig> {
    let path = config_path()?;
    let mut config = load_config_file(&path)?;
    if !path.exists() {
        // Leave an editable template behind on first start
        if let Err(e) = save_app_config(&path, &config) {
            tracing::warn!("Failed to write default config to {}: {}", path.display(), e);
        }
    }
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config.gitlab.validate()?;
    Ok(config)
}

/// Read a config file; a missing file yields the defaults
pub fn load_config_file(path: &Path) -> AppResult<AppConfig> {
    if !path.exists() {
        tracing::info!("No config file at {}, using defaults", path.display());
        return Ok(AppConfig::new());
    }

    let content = fs::read_to_string(path)?;

    serde_json::from_str(&content)
        .map_err(|e| AppError::Config(format!("Failed to parse config file: {}", e)))
}

/// Save application config
pub fn save_app_config(path: &Path, config: &AppConfig) -> AppResult<()> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(path, content)?;
    Ok(())
}

fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup(URL_ENV).filter(|v| !v.is_empty()) {
        config.gitlab.url = url;
    }
    if let Some(token) = lookup(ACCESS_TOKEN_ENV).filter(|v| !v.is_empty()) {
        config.gitlab.access_token = token;
    }
}
