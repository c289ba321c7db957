//! Board snapshot file.
//!
//! Each CLI run is a fresh process, so the store's tasks and grouped
//! projection are carried between runs in a JSON file. Writes are atomic:
//! temp file, fsync, rename. Callers that read and then write hold the
//! board lock around both. The kanban projection is derived and never
//! stored.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

use super::seed::{demo_grouped, demo_tasks};
use crate::error::{Error, Result};
use crate::model::{GroupedTickets, Task};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable store state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub version: u32,
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub grouped: GroupedTickets,
}

impl BoardSnapshot {
    #[must_use]
    pub fn new(tasks: Vec<Task>, grouped: GroupedTickets) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            tasks,
            grouped,
        }
    }

    /// A fresh board holding the demo tasks and their groups.
    #[must_use]
    pub fn seeded() -> Self {
        let tasks = demo_tasks();
        let grouped = demo_grouped(&tasks);
        Self::new(tasks, grouped)
    }

    /// An empty board.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), GroupedTickets::default())
    }
}

/// Read a snapshot. A missing file yields `None`.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read, or holds JSON
/// that is not a valid snapshot (including unknown ticket statuses).
pub fn load_snapshot(path: &Path) -> Result<Option<BoardSnapshot>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let snapshot: BoardSnapshot = serde_json::from_str(&content)?;

    if snapshot.version > SNAPSHOT_VERSION {
        return Err(Error::Config(format!(
            "Board file {} has version {}, newer than supported version {SNAPSHOT_VERSION}",
            path.display(),
            snapshot.version
        )));
    }

    debug!(path = %path.display(), tasks = snapshot.tasks.len(), "Loaded board snapshot");
    Ok(Some(snapshot))
}

/// Read a snapshot. If the file is missing, seed a fresh board and write
/// it, so later runs see the same ids and timestamps.
///
/// # Errors
///
/// See [`load_snapshot`] and [`save_snapshot`].
pub fn load_or_seed(path: &Path) -> Result<BoardSnapshot> {
    if let Some(snapshot) = load_snapshot(path)? {
        return Ok(snapshot);
    }

    let seeded = BoardSnapshot::seeded();
    save_snapshot(path, &seeded)?;
    info!(path = %path.display(), "Seeded new board");
    Ok(seeded)
}

/// Write a snapshot atomically.
///
/// # Errors
///
/// Returns an error if serialization or any file operation fails; the
/// previous file (if any) is left untouched.
pub fn save_snapshot(path: &Path, snapshot: &BoardSnapshot) -> Result<()> {
    let content = serde_json::to_string_pretty(snapshot)?;
    atomic_write(path, &content)?;
    debug!(path = %path.display(), tasks = snapshot.tasks.len(), "Saved board snapshot");
    Ok(())
}

/// Write content to a file atomically.
///
/// 1. Writes content to a temporary file next to the target
/// 2. Calls `fsync` to ensure data is on disk
/// 3. Atomically renames the temp file to the target path
fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes())?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }

    fs::rename(&temp_path, path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_seeds() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.json");

        assert!(load_snapshot(&path).unwrap().is_none());
        let seeded = load_or_seed(&path).unwrap();
        let ids: Vec<_> = seeded.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["task_1", "task_2"]);
        assert_eq!(seeded.grouped.len(), 4);
    }

    #[test]
    fn test_seed_written_on_first_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.json");

        let first = load_or_seed(&path).unwrap();
        assert!(path.exists());

        // Timestamps come from the file, not a second seeding
        let second = load_or_seed(&path).unwrap();
        assert_eq!(second, first);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("board.json");

        let snapshot = BoardSnapshot::seeded();
        save_snapshot(&path, &snapshot).unwrap();

        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(load_snapshot(&path).unwrap(), Some(snapshot));
    }

    #[test]
    fn test_unknown_status_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.json");
        fs::write(
            &path,
            r#"{"version":1,"tasks":[{"id":"task_1","title":"t","created_at":0,"tickets":[
                {"id":"ticket_1","title":"x","description":"","status":"Blocked","priority":1,"created_at":0}
            ]}]}"#,
        )
        .unwrap();

        assert!(matches!(load_snapshot(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_newer_version_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.json");
        fs::write(&path, r#"{"version":99,"tasks":[]}"#).unwrap();

        assert!(matches!(load_snapshot(&path), Err(Error::Config(_))));
    }
}
