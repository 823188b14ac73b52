//! Epoch-keyed memoization of a single derived value.

use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use strata_common::Epoch;

struct Entry<T> {
    epoch: Epoch,
    value: T,
}

/// A lazily computed value that is valid for exactly one [`Epoch`].
///
/// Readers holding a current entry share a read lock. A stale or missing
/// entry is recomputed under the write lock after re-checking, so readers
/// racing on the same epoch compute the value once and all observe it.
pub struct Memo<T> {
    slot: RwLock<Option<Entry<T>>>,
    computations: AtomicUsize,
}

impl<T: Clone> Memo<T> {
    /// Creates an empty memo.
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
            computations: AtomicUsize::new(0),
        }
    }

    /// Returns the value stored for `epoch`, computing and storing it first
    /// if the stored entry is missing or stamped with another epoch.
    pub fn get_or_compute(&self, epoch: Epoch, compute: impl FnOnce() -> T) -> T {
        match self.try_get_or_compute(epoch, || Ok::<T, Infallible>(compute())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Fallible variant of [`get_or_compute`](Self::get_or_compute).
    ///
    /// An error is returned to the caller and nothing is stored, so the next
    /// read computes again.
    pub fn try_get_or_compute<E>(
        &self,
        epoch: Epoch,
        compute: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        if let Some(value) = self.current(epoch) {
            return Ok(value);
        }

        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = slot.as_ref().filter(|entry| entry.epoch == epoch) {
            return Ok(entry.value.clone());
        }
        let value = compute()?;
        self.computations.fetch_add(1, Ordering::Relaxed);
        *slot = Some(Entry {
            epoch,
            value: value.clone(),
        });
        Ok(value)
    }

    /// Returns the stored value if it was computed for `epoch`.
    pub fn current(&self, epoch: Epoch) -> Option<T> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref()
            .filter(|entry| entry.epoch == epoch)
            .map(|entry| entry.value.clone())
    }

    /// Number of times a value has been computed and stored.
    pub fn computations(&self) -> usize {
        self.computations.load(Ordering::Relaxed)
    }
}

impl<T: Clone> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epoch(external: u64, local: u64) -> Epoch {
        Epoch { external, local }
    }

    #[test]
    fn computes_once_per_epoch() {
        let memo = Memo::new();
        assert_eq!(memo.get_or_compute(epoch(0, 0), || 1), 1);
        assert_eq!(memo.get_or_compute(epoch(0, 0), || 2), 1);
        assert_eq!(memo.computations(), 1);
    }

    #[test]
    fn new_epoch_recomputes() {
        let memo = Memo::new();
        memo.get_or_compute(epoch(0, 0), || "old");
        assert_eq!(memo.get_or_compute(epoch(0, 1), || "new"), "new");
        assert_eq!(memo.get_or_compute(epoch(1, 1), || "newer"), "newer");
        assert_eq!(memo.computations(), 3);
    }

    #[test]
    fn current_ignores_stale_entries() {
        let memo = Memo::new();
        assert_eq!(memo.current(epoch(0, 0)), None::<u32>);
        memo.get_or_compute(epoch(0, 0), || 7);
        assert_eq!(memo.current(epoch(0, 0)), Some(7));
        assert_eq!(memo.current(epoch(3, 0)), None);
    }

    #[test]
    fn errors_are_not_stored() {
        let memo: Memo<u32> = Memo::new();
        let err = memo
            .try_get_or_compute(epoch(0, 0), || Err("broken"))
            .unwrap_err();
        assert_eq!(err, "broken");
        assert_eq!(memo.computations(), 0);
        let value = memo.try_get_or_compute(epoch(0, 0), || Ok::<_, &str>(5));
        assert_eq!(value, Ok(5));
    }

    #[test]
    fn concurrent_readers_share_one_computation() {
        let memo = Memo::new();
        let results: Vec<Vec<u32>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| memo.get_or_compute(epoch(4, 2), || vec![1, 2, 3])))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(results.iter().all(|r| r == &vec![1, 2, 3]));
        assert_eq!(memo.computations(), 1);
    }
}
