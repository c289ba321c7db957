//! Reset command: overwrite the board file with a fresh board.

use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use crate::config::resolve_board_path;
use crate::error::{Error, Result};
use crate::store::{save_snapshot, with_board_lock, BoardSnapshot};

#[derive(Serialize)]
struct ResetOutput {
    board: String,
    tasks: usize,
}

/// Execute the reset command.
///
/// The existing file is not read, so a board that no longer loads can
/// still be reset. The write waits for any run holding the board lock.
///
/// # Errors
///
/// Returns an error if the board file cannot be written.
pub fn execute(empty: bool, board: Option<&PathBuf>, json: bool) -> Result<()> {
    let path = resolve_board_path(board.map(PathBuf::as_path))
        .ok_or_else(|| Error::Config("Could not determine home directory".into()))?;

    let snapshot = if empty {
        BoardSnapshot::empty()
    } else {
        BoardSnapshot::seeded()
    };
    with_board_lock(&path, || save_snapshot(&path, &snapshot))?;
    info!(path = %path.display(), tasks = snapshot.tasks.len(), "Board reset");

    if json {
        let output = ResetOutput {
            board: path.display().to_string(),
            tasks: snapshot.tasks.len(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if !crate::is_silent() {
        println!("Board reset with {} tasks: {}", snapshot.tasks.len(), path.display());
    }

    Ok(())
}
