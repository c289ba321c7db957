//! The external-service credential.
//!
//! A single API key string, persisted under the `gemini_api_key` key of the
//! config file. It is read once at startup, written or removed only by
//! explicit user action, and never expires.

use std::fmt;
use std::path::Path;

use super::settings::{load_config_from, save_config_to};
use crate::error::{Error, Result};

/// Environment variable that overrides the persisted key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// An API key for the assistant service.
///
/// `Debug` and `Display` never print the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, rejecting blank input.
    ///
    /// # Errors
    ///
    /// Returns `Error::RequiredField` if the key is empty or whitespace.
    pub fn new(key: &str) -> Result<Self> {
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(Error::RequiredField { field: "API key" });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The raw secret, for building request headers.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Masked form keeping the last four characters.
    #[must_use]
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{tail}", "*".repeat(chars.len() - 4))
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&self.masked()).finish()
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

/// Where the active credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    ConfigFile,
}

/// Resolve the credential at startup: env var first, then the config file.
///
/// # Errors
///
/// Returns `Error::Config` if the config file cannot be read.
pub fn load_credential(config_path: &Path) -> Result<Option<(ApiKey, CredentialSource)>> {
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if let Ok(key) = ApiKey::new(&key) {
            return Ok(Some((key, CredentialSource::Environment)));
        }
    }

    let config = load_config_from(config_path)?;
    Ok(config
        .gemini_api_key
        .as_deref()
        .and_then(|k| ApiKey::new(k).ok())
        .map(|k| (k, CredentialSource::ConfigFile)))
}

/// Persist the key, keeping the rest of the config file intact.
///
/// # Errors
///
/// Returns `Error::Config` if the config file cannot be read or written.
pub fn store_credential(config_path: &Path, key: &ApiKey) -> Result<()> {
    let mut config = load_config_from(config_path)?;
    config.gemini_api_key = Some(key.expose().to_string());
    save_config_to(config_path, &config)
}

/// Remove the persisted key. Returns whether one was present.
///
/// # Errors
///
/// Returns `Error::Config` if the config file cannot be read or written.
pub fn remove_credential(config_path: &Path) -> Result<bool> {
    let mut config = load_config_from(config_path)?;
    let had_key = config.gemini_api_key.take().is_some();
    if had_key {
        save_config_to(config_path, &config)?;
    }
    Ok(had_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_blank_key_rejected() {
        assert!(ApiKey::new("   ").is_err());
        assert_eq!(ApiKey::new(" k3y ").unwrap().expose(), "k3y");
    }

    #[test]
    fn test_debug_does_not_leak() {
        let key = ApiKey::new("AIzaSecretValue1234").unwrap();
        let debug = format!("{key:?}");
        assert!(!debug.contains("Secret"));
        assert!(debug.ends_with("1234\")"));
        assert_eq!(ApiKey::new("abc").unwrap().masked(), "***");
    }

    #[test]
    fn test_store_and_remove_preserves_other_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        save_config_to(
            &path,
            &crate::config::TaskGeniusConfig {
                model: Some("gemini-pro".into()),
                ..Default::default()
            },
        )
        .unwrap();

        store_credential(&path, &ApiKey::new("secret").unwrap()).unwrap();
        let config = load_config_from(&path).unwrap();
        assert_eq!(config.gemini_api_key.as_deref(), Some("secret"));
        assert_eq!(config.model.as_deref(), Some("gemini-pro"));

        assert!(remove_credential(&path).unwrap());
        assert!(!remove_credential(&path).unwrap());
        let config = load_config_from(&path).unwrap();
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.model.as_deref(), Some("gemini-pro"));
    }
}
