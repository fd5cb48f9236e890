//! Generation counter for discarding superseded async work.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A shared monotonic generation counter.
///
/// A producer snapshots the generation before suspending at an I/O boundary
/// and checks [`Generation::is_current`] before writing results back. Any
/// supersession (a newer rebuild, a changed viewpoint set, teardown) bumps
/// the counter, so the stale completion is silently discarded.
#[derive(Debug, Clone, Default)]
pub struct Generation(Arc<AtomicU64>);

impl Generation {
    /// New counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation.
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Advance to a new generation, invalidating all outstanding snapshots.
    /// Returns the new value.
    pub fn bump(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Whether a snapshot taken earlier is still the live generation.
    pub fn is_current(&self, snapshot: u64) -> bool {
        self.current() == snapshot
    }
}
