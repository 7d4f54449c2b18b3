//! Single-slot verdict handoff from the dealer to one player.

use thiserror::Error;

use super::queue::{BoundedQueue, PushError};

/// The dealer's answer to a claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The three cards form a set: score a point.
    Approved,
    /// They do not: serve a penalty.
    Rejected,
    /// The claim went stale before it was judged.
    Withdrawn,
}

/// Failed delivery. Either means the one-claim-per-player rule was broken or
/// the player has already shut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeliverError {
    #[error("mailbox already holds an undelivered verdict")]
    Occupied,
    #[error("mailbox is closed")]
    Closed,
}

/// Capacity-1 channel carrying exactly one verdict per claim.
///
/// Delivery never blocks: a player has at most one claim outstanding, so the
/// slot is always free when the dealer answers.
#[derive(Debug)]
pub struct VerdictMailbox {
    slot: BoundedQueue<Verdict>,
}

impl Default for VerdictMailbox {
    fn default() -> Self {
        Self::new()
    }
}

impl VerdictMailbox {
    #[must_use]
    pub fn new() -> Self {
        Self { slot: BoundedQueue::new(1) }
    }

    /// Hand `verdict` to the waiting player.
    pub fn deliver(&self, verdict: Verdict) -> Result<(), DeliverError> {
        self.slot.try_push(verdict).map_err(|err| match err {
            PushError::Full(_) => DeliverError::Occupied,
            PushError::Closed(_) => DeliverError::Closed,
        })
    }

    /// Block until a verdict arrives. `None` once the mailbox is closed.
    pub fn wait(&self) -> Option<Verdict> {
        self.slot.pop()
    }

    /// Take a delivered verdict without waiting.
    pub fn try_take(&self) -> Option<Verdict> {
        self.slot.try_pop()
    }

    /// Wake a waiting player with no verdict; used on termination.
    pub fn close(&self) {
        self.slot.close();
    }
}
