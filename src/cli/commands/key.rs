//! API key commands.
//!
//! The key lives under `gemini_api_key` in the config file. `GEMINI_API_KEY`
//! overrides it without being written anywhere. Set and clear go through the
//! task store, which persists the change.

use serde::Serialize;
use std::path::PathBuf;

use super::BoardContext;
use crate::cli::KeyCommands;
use crate::config::{config_path, load_credential, ApiKey, CredentialSource, API_KEY_ENV};
use crate::error::Result;

#[derive(Serialize)]
struct KeyStatusOutput {
    configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,
}

#[derive(Serialize)]
struct KeyChangeOutput {
    action: &'static str,
    changed: bool,
}

/// Execute a key command.
///
/// # Errors
///
/// Returns an error if the key is blank, or the board or config file cannot
/// be read or written.
pub fn execute(command: &KeyCommands, board: Option<&PathBuf>, json: bool) -> Result<()> {
    match command {
        KeyCommands::Set { key } => {
            let key = ApiKey::new(key)?;
            let ctx = BoardContext::open(board, true)?;
            ctx.store.set_credential(key.clone())?;

            if json {
                let output = KeyChangeOutput {
                    action: "set",
                    changed: true,
                };
                println!("{}", serde_json::to_string(&output)?);
            } else if !crate::is_silent() {
                println!("API key saved ({key}). New tasks will be broken down automatically.");
            }
        }
        KeyCommands::Clear => {
            let ctx = BoardContext::open(board, true)?;
            let removed = ctx.store.clear_credential()?;

            if json {
                let output = KeyChangeOutput {
                    action: "clear",
                    changed: removed,
                };
                println!("{}", serde_json::to_string(&output)?);
            } else if !crate::is_silent() {
                if removed {
                    println!("API key removed.");
                } else {
                    println!("No saved API key.");
                }
                if std::env::var(API_KEY_ENV).is_ok_and(|v| !v.trim().is_empty()) {
                    println!("Note: {API_KEY_ENV} is still set in the environment.");
                }
            }
        }
        KeyCommands::Status => {
            let credential = load_credential(&config_path()?)?;
            let output = KeyStatusOutput {
                configured: credential.is_some(),
                source: credential.as_ref().map(|(_, source)| match source {
                    CredentialSource::Environment => "environment",
                    CredentialSource::ConfigFile => "config",
                }),
                key: credential.as_ref().map(|(key, _)| key.masked()),
            };

            if json {
                println!("{}", serde_json::to_string(&output)?);
            } else {
                match (&output.key, output.source) {
                    (Some(key), Some(source)) => println!("API key configured: {key} (from {source})"),
                    _ => println!("No API key configured. Tasks get a single default ticket."),
                }
            }
        }
    }

    Ok(())
}
