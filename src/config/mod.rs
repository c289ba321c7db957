//! Configuration management.
//!
//! This module resolves where TaskGenius keeps its files and loads the
//! settings and credential.
//!
//! # Layout
//!
//! Everything lives under `~/.taskgenius/` (or `$TG_HOME` when set):
//! - `config.json` - settings and the persisted API key
//! - `board.json` - the board snapshot carried between CLI runs

mod credential;
mod settings;

pub use credential::{
    load_credential, remove_credential, store_credential, ApiKey, CredentialSource, API_KEY_ENV,
};
pub use settings::{
    config_path, load_config, load_config_from, resolve_latency, resolve_model, save_config_to,
    Latency, LatencySettings, TaskGeniusConfig, DEFAULT_MODEL,
};

use std::path::{Path, PathBuf};

/// Get the TaskGenius directory.
///
/// `TG_HOME` wins when set; otherwise `~/.taskgenius/`.
#[must_use]
pub fn taskgenius_dir() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("TG_HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    directories::BaseDirs::new().map(|b| b.home_dir().join(".taskgenius"))
}

/// Resolve the board snapshot path.
///
/// Priority:
/// 1. If `explicit_path` is provided (`--board` / `TG_BOARD`), use it directly
/// 2. `board.json` in the TaskGenius directory
#[must_use]
pub fn resolve_board_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    taskgenius_dir().map(|dir| dir.join("board.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_board_path_wins() {
        let path = resolve_board_path(Some(Path::new("/tmp/my-board.json")));
        assert_eq!(path, Some(PathBuf::from("/tmp/my-board.json")));
    }

    #[test]
    fn test_default_board_path_is_in_taskgenius_dir() {
        if let Some(path) = resolve_board_path(None) {
            assert!(path.ends_with("board.json"));
        }
    }
}
