//! Monotonic modification counters used to invalidate derived data.
//!
//! Derived data (member lists, name maps) is stamped with an [`Epoch`] when
//! it is computed. The stamp records the value of an external counter (the
//! host's "something structural changed" count) and of a local counter owned
//! by the cache itself. Any later change to either counter produces a
//! different epoch, and the stamped value is recomputed on next read.

use std::sync::atomic::{AtomicU64, Ordering};

/// A source of a monotonically increasing modification count.
///
/// The count only says *that* something may have changed, never *what*.
pub trait ModificationSource: Send + Sync {
    /// Returns the current modification count.
    fn modification_count(&self) -> u64;
}

/// An atomic modification counter.
#[derive(Debug, Default)]
pub struct ModificationTracker {
    count: AtomicU64,
}

impl ModificationTracker {
    /// Creates a tracker starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumps the counter and returns the new value.
    pub fn increment(&self) -> u64 {
        self.count.fetch_add(1, Ordering::AcqRel) + 1
    }
}

impl ModificationSource for ModificationTracker {
    fn modification_count(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }
}

/// A snapshot of an external and a local modification count.
///
/// Two epochs are equal only if both counters are equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Epoch {
    /// Value of the host's modification source.
    pub external: u64,
    /// Value of the cache's own tracker.
    pub local: u64,
}

impl Epoch {
    /// Reads both counters.
    pub fn capture(external: &dyn ModificationSource, local: &dyn ModificationSource) -> Self {
        Self {
            external: external.modification_count(),
            local: local.modification_count(),
        }
    }
}
