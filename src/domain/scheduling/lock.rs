//! Per-event advisory lock.
//!
//! Serializes competing finalize/cancel operations on the same scheduled
//! event: a duplicate button tap that arrives while the first operation is
//! still running aborts instead of double-processing. Supports only
//! "proceed if free, otherwise abort" - no expiry, fairness, or wait queue.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use crate::domain::foundation::EventId;

/// In-memory set of event ids with an operation in flight.
///
/// No ownership token and no reentrancy; callers must pair `acquire` with
/// `release` themselves.
#[derive(Debug, Default)]
pub struct EventLock {
    held: Mutex<HashSet<EventId>>,
}

impl EventLock {
    /// Creates a lock with no held keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically marks the event as busy.
    ///
    /// Returns true only if the key was free before the call.
    pub fn acquire(&self, id: &EventId) -> bool {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        held.insert(*id)
    }

    /// Unconditionally frees the event.
    pub fn release(&self, id: &EventId) {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        held.remove(id);
    }

    /// True if an operation is currently in flight for the event.
    pub fn is_held(&self, id: &EventId) -> bool {
        let held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        held.contains(id)
    }
}
