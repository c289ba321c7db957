//! The task store and its on-disk snapshot.
//!
//! [`TaskStore`] owns every task and ticket. The CLI builds one per run from
//! a [`BoardSnapshot`]. Mutating commands take the board lock, reload the
//! snapshot, apply only their own change and write it back, so concurrent
//! runs never undo each other.

mod board;
mod in_flight;
mod lock;
pub mod seed;
mod snapshot;

pub use board::TaskStore;
pub use in_flight::{InFlight, InFlightGuard};
pub use lock::{with_board_lock, with_generation_marker};
pub use snapshot::{load_or_seed, load_snapshot, save_snapshot, BoardSnapshot, SNAPSHOT_VERSION};
