//! Command implementations.
//!
//! Each command opens the board through [`BoardContext`] and runs store
//! operations on a tokio runtime. Changes reach the board file through
//! [`BoardContext::commit`], which reapplies them to the latest snapshot
//! under the board lock.

pub mod board;
pub mod completions;
pub mod group;
pub mod key;
pub mod reset;
pub mod reuse;
pub mod task;
pub mod ticket;
pub mod version;

use std::future::Future;
use std::path::PathBuf;
use tracing::debug;

use crate::assistant::create_assistant;
use crate::config::{config_path, load_config, load_credential, resolve_board_path, resolve_latency};
use crate::error::{Error, Result};
use crate::store::{load_or_seed, save_snapshot, with_board_lock, with_generation_marker, TaskStore};
use crate::validate::find_similar_ids;

/// An opened board: the store, where it came from, and a runtime to drive
/// its async operations.
pub struct BoardContext {
    pub store: TaskStore,
    board_path: PathBuf,
    runtime: tokio::runtime::Runtime,
}

impl BoardContext {
    /// Load config, credential and board snapshot and build the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the config or board file cannot be read, or the
    /// runtime cannot be created.
    pub fn open(board: Option<&PathBuf>, no_delay: bool) -> Result<Self> {
        let board_path = resolve_board_path(board.map(PathBuf::as_path))
            .ok_or_else(|| Error::Config("Could not determine home directory".into()))?;

        let config = load_config()?;
        let config_file = config_path()?;
        let credential = load_credential(&config_file)?.map(|(key, source)| {
            debug!(?source, "Using API key");
            key
        });
        let latency = resolve_latency(&config, no_delay);

        let snapshot = with_board_lock(&board_path, || load_or_seed(&board_path))?;
        let store = TaskStore::new(snapshot, create_assistant(&config, no_delay))
            .with_credential(credential)
            .with_credential_file(config_file)
            .with_create_delay(latency.create);

        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;

        Ok(Self {
            store,
            board_path,
            runtime,
        })
    }

    /// Drive a store future to completion.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Apply one change to the board file.
    ///
    /// Under the board lock: reload the latest snapshot into the store, run
    /// `apply`, and write the result. Changes other runs made since this one
    /// opened the board are kept. Nothing is written if `apply` fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the board cannot be locked, read or written, or
    /// whatever `apply` returns.
    pub fn commit<T>(&self, apply: impl FnOnce(&TaskStore) -> Result<T>) -> Result<T> {
        with_board_lock(&self.board_path, || {
            self.store.reload(load_or_seed(&self.board_path)?);
            let output = apply(&self.store)?;
            save_snapshot(&self.board_path, &self.store.snapshot())?;
            Ok(output)
        })
    }

    /// Run `f` holding this board's generation marker for `task_id`.
    ///
    /// # Errors
    ///
    /// Returns `Error::GenerationInProgress` if any process is already
    /// generating for the task, or whatever `f` returns.
    pub fn generating<T>(&self, task_id: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
        with_generation_marker(&self.board_path, task_id, f)
    }

    /// Not-found error for a ticket id, with suggestions when any are close.
    #[must_use]
    pub fn ticket_not_found(&self, id: &str) -> Error {
        let similar = find_similar_ids(id, &self.store.ticket_ids(), 3);
        if similar.is_empty() {
            Error::TicketNotFound { id: id.to_string() }
        } else {
            Error::TicketNotFoundSimilar {
                id: id.to_string(),
                similar,
            }
        }
    }

    /// Not-found error for a task id, with suggestions when any are close.
    #[must_use]
    pub fn task_not_found(&self, id: &str) -> Error {
        let similar = find_similar_ids(id, &self.store.task_ids(), 3);
        if similar.is_empty() {
            Error::TaskNotFound { id: id.to_string() }
        } else {
            Error::TaskNotFoundSimilar {
                id: id.to_string(),
                similar,
            }
        }
    }
}

/// Print a notice-level error without failing the command.
pub(crate) fn print_notice(err: &Error, json: bool) {
    if json || crate::is_silent() {
        return;
    }
    eprintln!("Notice: {err}");
    if let Some(hint) = err.hint() {
        eprintln!("  {hint}");
    }
}

pub(crate) fn format_timestamp(ts: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ts)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ts.to_string())
}

pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or(s);
    if first_line.chars().count() <= max_len {
        first_line.to_string()
    } else {
        let cut: String = first_line.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

/// Minutes as "1h 30m".
pub(crate) fn format_minutes(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer line", 10), "a much ...");
        assert_eq!(truncate("first\nsecond", 20), "first");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(120), "2h");
        assert_eq!(format_minutes(90), "1h 30m");
    }

    #[test]
    fn test_format_timestamp() {
        assert!(format_timestamp(0).starts_with("1970-01-01T00:00:00"));
    }
}
