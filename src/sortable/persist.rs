//! Debounced, fire-and-forget forwarding of position updates.

use std::time::{Duration, Instant};

use super::positions::PositionUpdate;

/// Where position updates go.
///
/// Called at most once per debounce window with the full position set of the
/// current tree. Returning `false` (or failing internally) is logged by the
/// caller and otherwise ignored: writes are optimistic and last-write-wins,
/// the in-memory tree stays authoritative for the session, and the engine
/// never retries or rolls back.
pub trait PositionSink {
    fn update_positions(&mut self, updates: &[PositionUpdate]) -> bool;
}

impl<F: FnMut(&[PositionUpdate]) -> bool> PositionSink for F {
    fn update_positions(&mut self, updates: &[PositionUpdate]) -> bool {
        self(updates)
    }
}

/// Trailing-edge debouncer: each queued change replaces the pending set and
/// pushes the deadline out, so a burst of reparents becomes one write
/// reflecting only the final state.
#[derive(Debug, Default)]
pub(super) struct PositionDebouncer {
    pending: Option<Vec<PositionUpdate>>,
    due_at: Option<Instant>,
}

impl PositionDebouncer {
    pub(super) fn queue(&mut self, updates: Vec<PositionUpdate>, now: Instant, window: Duration) {
        self.pending = Some(updates);
        self.due_at = Some(now + window);
    }

    pub(super) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending set if its window has elapsed.
    pub(super) fn take_due(&mut self, now: Instant) -> Option<Vec<PositionUpdate>> {
        if self.due_at.is_some_and(|due| now >= due) {
            self.due_at = None;
            self.pending.take()
        } else {
            None
        }
    }

    /// Take the pending set regardless of the window (host teardown).
    pub(super) fn take_now(&mut self) -> Option<Vec<PositionUpdate>> {
        self.due_at = None;
        self.pending.take()
    }
}
