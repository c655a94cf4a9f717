//! Per-window locks
//!
//! Placement is a read-modify-write sequence on a live window (read state,
//! restore, move, re-maximize). Two callers placing the same window must not
//! interleave; callers placing different windows never wait on each other.

use crate::domain::WindowId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Registry of one mutex per window currently being placed
#[derive(Debug, Default)]
pub struct WindowLocks {
    locks: Mutex<HashMap<WindowId, Arc<Mutex<()>>>>,
}

impl WindowLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock guarding `window`, creating it on first use
    ///
    /// Entries nobody holds any more are dropped on the way.
    pub fn lock_for(&self, window: WindowId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.retain(|id, lock| *id == window || Arc::strong_count(lock) > 1);
        Arc::clone(locks.entry(window).or_default())
    }

    /// Number of windows with a live lock entry
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_window_shares_a_lock() {
        let locks = WindowLocks::new();
        let a = locks.lock_for(WindowId(1));
        let b = locks.lock_for(WindowId(1));
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn different_windows_get_different_locks() {
        let locks = WindowLocks::new();
        let a = locks.lock_for(WindowId(1));
        let b = locks.lock_for(WindowId(2));
        assert!(!Arc::ptr_eq(&a, &b));
        let _held = a.lock().unwrap();
        assert!(b.try_lock().is_ok());
    }

    #[test]
    fn unused_entries_are_pruned() {
        let locks = WindowLocks::new();
        drop(locks.lock_for(WindowId(1)));
        drop(locks.lock_for(WindowId(2)));
        let _held = locks.lock_for(WindowId(3));
        assert_eq!(locks.len(), 1);
    }
}
