//! Advisory file locks shared by every `tg` process using a board.
//!
//! Two kinds:
//! - the board lock (`<board>.lock`), held while a command reloads the
//!   snapshot, applies its change and writes it back
//! - a generation marker per task (`<board>.locks/<task>.lock`), held for
//!   the whole breakdown so a second process fails fast instead of racing
//!
//! Locks are released when the file handle closes, including when the
//! process dies. Lock files are left in place.

use fd_lock::RwLock;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::error::{Error, Result};

/// Run `f` while holding the exclusive lock for `board`, waiting for any
/// other holder to finish.
///
/// # Errors
///
/// Returns `Error::Io` if the lock file cannot be opened or locked, or
/// whatever `f` returns.
pub fn with_board_lock<T>(board: &Path, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let path = board_lock_path(board);
    let mut lock = RwLock::new(open_lock_file(&path)?);

    let _guard = lock.write()?;
    trace!(path = %path.display(), "Board lock acquired");
    f()
}

/// Run `f` while holding the generation marker for `task_id` on `board`.
///
/// # Errors
///
/// Returns `Error::GenerationInProgress` if another process (or another
/// handle in this one) holds the marker, `Error::Io` if the lock file
/// cannot be opened, or whatever `f` returns.
pub fn with_generation_marker<T>(board: &Path, task_id: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let path = marker_path(board, task_id);
    let mut lock = RwLock::new(open_lock_file(&path)?);

    let _guard = match lock.try_write() {
        Ok(guard) => guard,
        Err(e) if e.kind() == ErrorKind::WouldBlock => {
            return Err(Error::GenerationInProgress {
                task_id: task_id.to_string(),
            });
        }
        Err(e) => return Err(e.into()),
    };
    trace!(task_id, path = %path.display(), "Generation marker acquired");
    f()
}

fn board_lock_path(board: &Path) -> PathBuf {
    let mut name = board.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

fn marker_path(board: &Path, task_id: &str) -> PathBuf {
    let mut dir = board.as_os_str().to_owned();
    dir.push(".locks");

    let file: String = task_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    PathBuf::from(dir).join(format!("{file}.lock"))
}

fn open_lock_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    Ok(OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)?)
}
