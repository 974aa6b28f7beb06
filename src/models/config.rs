use crate::proxy::{GitLabConfig, ServerConfig};
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gitlab: GitLabConfig,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }
}
