use crate::jules::API_BASE_URL;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const API_KEY_ENV: &str = "JULES_API_KEY";
const CONFIG_DIR_NAME: &str = "jules-launcher";
const PREFERENCES_FILE: &str = "preferences.json";

/// Preferences as persisted on disk. Keys mirror the launcher's
/// preference names (`julesApiKey`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub jules_api_key: Option<String>,
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub poll_interval_secs: Option<u64>,
}

/// Process-wide configuration, built once at startup and handed to every view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    pub api_key: String,
    pub api_base_url: String,
    pub poll_interval_secs: u64,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: API_BASE_URL.to_string(),
            poll_interval_secs: 60,
        }
    }
}

impl LauncherConfig {
    /// `~/.config/jules-launcher/preferences.json` on Linux, the platform
    /// equivalent elsewhere.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(PREFERENCES_FILE))
    }

    /// Load from `path` (or the default location), then apply the
    /// `JULES_API_KEY` override.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path(),
        };

        let preferences = match path {
            Some(ref p) => read_preferences(p)?,
            None => Preferences::default(),
        };

        Self::resolve(preferences, std::env::var(API_KEY_ENV).ok())
    }

    /// Merge file preferences with an optional environment key. The key is
    /// required but its format is not checked.
    pub fn resolve(preferences: Preferences, env_api_key: Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let api_key = env_api_key
            .filter(|k| !k.trim().is_empty())
            .or(preferences.jules_api_key)
            .unwrap_or_default();

        if api_key.trim().is_empty() {
            bail!(
                "No Jules API key configured. Set {} or add \"julesApiKey\" to {}",
                API_KEY_ENV,
                Self::default_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| PREFERENCES_FILE.to_string())
            );
        }

        Ok(Self {
            api_key,
            api_base_url: preferences.api_base_url.unwrap_or(defaults.api_base_url),
            poll_interval_secs: preferences
                .poll_interval_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.poll_interval_secs),
        })
    }
}

fn read_preferences(path: &Path) -> Result<Preferences> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no preferences file, using defaults");
        return Ok(Preferences::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read preferences from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse preferences in {}", path.display()))
}
