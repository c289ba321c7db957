//! Per-task in-flight markers for ticket generation.
//!
//! A breakdown replaces a task's whole ticket list when it resolves. Two
//! overlapping breakdowns for the same task would race, so only one may be
//! in flight per task at a time. The marker is held by an RAII guard and is
//! released on success, on error, and when the owning future is dropped.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Set of task ids with a breakdown in flight.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    tasks: Arc<Mutex<HashSet<String>>>,
}

impl InFlight {
    /// Mark `task_id` as in flight. Returns `None` if it already is.
    #[must_use]
    pub fn try_acquire(&self, task_id: &str) -> Option<InFlightGuard> {
        if !lock(&self.tasks).insert(task_id.to_string()) {
            return None;
        }

        Some(InFlightGuard {
            tasks: Arc::clone(&self.tasks),
            task_id: task_id.to_string(),
        })
    }

    /// Whether a breakdown is in flight for `task_id`.
    #[must_use]
    pub fn contains(&self, task_id: &str) -> bool {
        lock(&self.tasks).contains(task_id)
    }
}

/// Releases the in-flight marker for one task when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    tasks: Arc<Mutex<HashSet<String>>>,
    task_id: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        lock(&self.tasks).remove(&self.task_id);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_rejected_until_release() {
        let in_flight = InFlight::default();

        let guard = in_flight.try_acquire("task_1").expect("first acquire");
        assert!(in_flight.contains("task_1"));
        assert!(in_flight.try_acquire("task_1").is_none());

        // Other tasks are independent
        assert!(in_flight.try_acquire("task_2").is_some());

        drop(guard);
        assert!(!in_flight.contains("task_1"));
        assert!(in_flight.try_acquire("task_1").is_some());
    }

    #[test]
    fn test_clones_share_markers() {
        let a = InFlight::default();
        let b = a.clone();
        let _guard = a.try_acquire("task_1").unwrap();
        assert!(b.contains("task_1"));
    }
}
