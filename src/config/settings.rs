//! Settings file management.
//!
//! Loads and saves `~/.taskgenius/config.json`. Environment variables take
//! precedence over the file; the file over built-in defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Model requested from the assistant when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// TaskGenius configuration file structure.
///
/// Stored at `~/.taskgenius/config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskGeniusConfig {
    /// The persisted credential, under its fixed key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<LatencySettings>,
}

/// Per-operation latency overrides in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencySettings {
    pub create_ms: Option<u64>,
    pub breakdown_ms: Option<u64>,
    pub group_ms: Option<u64>,
    pub strategy_ms: Option<u64>,
    pub reuse_ms: Option<u64>,
}

/// Simulated network latency for each store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub create: Duration,
    pub breakdown: Duration,
    pub group: Duration,
    pub strategy: Duration,
    pub reuse: Duration,
}

impl Latency {
    /// No simulated delay at all.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            create: Duration::ZERO,
            breakdown: Duration::ZERO,
            group: Duration::ZERO,
            strategy: Duration::ZERO,
            reuse: Duration::ZERO,
        }
    }

    /// Apply the overrides present in `settings`.
    #[must_use]
    pub fn with_overrides(self, settings: &LatencySettings) -> Self {
        let pick = |ms: Option<u64>, fallback: Duration| ms.map_or(fallback, Duration::from_millis);
        Self {
            create: pick(settings.create_ms, self.create),
            breakdown: pick(settings.breakdown_ms, self.breakdown),
            group: pick(settings.group_ms, self.group),
            strategy: pick(settings.strategy_ms, self.strategy),
            reuse: pick(settings.reuse_ms, self.reuse),
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            create: Duration::from_millis(1000),
            breakdown: Duration::from_millis(2000),
            group: Duration::from_millis(1500),
            strategy: Duration::from_millis(1000),
            reuse: Duration::from_millis(1500),
        }
    }
}

/// Get the config file path.
///
/// # Errors
///
/// Returns `Error::Config` if the home directory cannot be determined.
pub fn config_path() -> Result<PathBuf> {
    super::taskgenius_dir()
        .map(|dir| dir.join("config.json"))
        .ok_or(Error::Config("Could not determine home directory".into()))
}

/// Load the configuration from the default location.
///
/// # Errors
///
/// Returns `Error::Config` if the file exists but cannot be read or parsed.
pub fn load_config() -> Result<TaskGeniusConfig> {
    load_config_from(&config_path()?)
}

/// Load the configuration from an explicit path. A missing file yields the
/// default configuration.
///
/// # Errors
///
/// Returns `Error::Config` if the file exists but cannot be read or parsed.
pub fn load_config_from(path: &Path) -> Result<TaskGeniusConfig> {
    if !path.exists() {
        return Ok(TaskGeniusConfig::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse config file: {e}")))
}

/// Save the configuration to an explicit path.
///
/// # Errors
///
/// Returns `Error::Config` if the directory or file cannot be written.
pub fn save_config_to(path: &Path, config: &TaskGeniusConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;

    fs::write(path, content).map_err(|e| Error::Config(format!("Failed to write config file: {e}")))
}

/// Resolve the assistant model from environment or config.
#[must_use]
pub fn resolve_model(config: &TaskGeniusConfig) -> String {
    // Priority: env var > config > default
    if let Ok(model) = std::env::var("TG_MODEL") {
        if !model.is_empty() {
            return model;
        }
    }

    config.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string())
}

/// Resolve operation latencies.
///
/// `no_delay` (the `--no-delay` flag, or `TG_NO_DELAY=1`) zeroes all of
/// them; otherwise config overrides apply on top of the defaults.
#[must_use]
pub fn resolve_latency(config: &TaskGeniusConfig, no_delay: bool) -> Latency {
    let env_no_delay = std::env::var("TG_NO_DELAY")
        .map(|v| !v.is_empty() && v != "0" && v.to_lowercase() != "false")
        .unwrap_or(false);

    if no_delay || env_no_delay {
        return Latency::none();
    }

    match &config.latency {
        Some(settings) => Latency::default().with_overrides(settings),
        None => Latency::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = load_config_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, TaskGeniusConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = TaskGeniusConfig {
            gemini_api_key: Some("abc123".into()),
            model: Some("gemini-pro".into()),
            latency: Some(LatencySettings {
                breakdown_ms: Some(5),
                ..LatencySettings::default()
            }),
        };
        save_config_to(&path, &config).unwrap();

        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_config_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_latency_overrides() {
        let settings = LatencySettings {
            group_ms: Some(10),
            ..LatencySettings::default()
        };
        let latency = Latency::default().with_overrides(&settings);
        assert_eq!(latency.group, Duration::from_millis(10));
        assert_eq!(latency.breakdown, Duration::from_millis(2000));
    }

    #[test]
    fn test_no_delay_zeroes_everything() {
        let config = TaskGeniusConfig::default();
        assert_eq!(resolve_latency(&config, true), Latency::none());
    }
}
