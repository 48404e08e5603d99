//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the backend URL override, gym identity, last used
//! username, and the revenue policy for members without dates.
//!
//! Configuration is stored at `~/.config/gymdeck/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::analytics::MissingDatePolicy;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "gymdeck";

/// Config file name
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend base URL override; the built-in default is used when absent
    pub api_url: Option<String>,
    pub gym_id: Option<i64>,
    pub gym_name: Option<String>,
    pub last_username: Option<String>,
    #[serde(default)]
    pub missing_date_policy: MissingDatePolicy,
    /// Start without attempting any network refresh
    #[serde(default)]
    pub offline_mode: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir =
            dirs::cache_dir().ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;

        let mut path = cache_dir.join(APP_NAME);
        if let Some(gym_id) = self.gym_id {
            path = path.join(gym_id.to_string());
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api_url.is_none());
        assert_eq!(config.missing_date_policy, MissingDatePolicy::CountAsToday);
        assert!(!config.offline_mode);
    }

    #[test]
    fn test_config_parses_with_missing_fields() {
        // Older config files predate the policy and offline fields
        let config: Config = serde_json::from_str(r#"{"gym_name": "Iron Works"}"#)
            .expect("config should parse");
        assert_eq!(config.gym_name.as_deref(), Some("Iron Works"));
        assert_eq!(config.missing_date_policy, MissingDatePolicy::CountAsToday);
    }
}
