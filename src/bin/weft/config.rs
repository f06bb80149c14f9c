use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "weft.toml";

/// Configuration loaded from `weft.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeftConfig {
    #[serde(default)]
    pub redis: RedisSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisSettings {
    #[serde(default = "default_redis_url")]
    pub url: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            prefix: default_prefix(),
        }
    }
}

fn default_redis_url() -> String {
    "redis://127.0.0.1/".to_string()
}

fn default_prefix() -> String {
    "weft".to_string()
}

/// Load configuration from an explicit path, or from `weft.toml` in the
/// current directory when present. Missing files fall back to defaults
/// unless the path was given explicitly.
pub fn load(path: Option<&Path>) -> Result<WeftConfig> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
        }
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                let raw = std::fs::read_to_string(default_path).context("failed to read weft.toml")?;
                toml::from_str(&raw).context("failed to parse weft.toml")
            } else {
                Ok(WeftConfig::default())
            }
        }
    }
}
