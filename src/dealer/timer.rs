//! Round deadline arithmetic.

use std::time::{Duration, Instant};

use crate::core::GameConfig;

/// Deadline of the running round and the dealer's polling cadence.
///
/// Above the warning threshold the dealer wakes once per coarse tick, timed
/// so that one wake lands exactly on the threshold; inside it, once per fine
/// tick. All methods take `now` explicitly so the arithmetic is testable
/// without sleeping.
#[derive(Clone, Debug)]
pub struct RoundTimer {
    duration: Duration,
    warning: Duration,
    coarse: Duration,
    fine: Duration,
    deadline: Instant,
}

impl RoundTimer {
    /// Timer whose first round starts at `now`.
    #[must_use]
    pub fn new(config: &GameConfig, now: Instant) -> Self {
        let duration = config.round_duration();
        Self {
            duration,
            warning: config.warning_threshold(),
            coarse: config.coarse_tick(),
            fine: config.fine_tick(),
            deadline: now + duration,
        }
    }

    /// Restart the full round at `now`.
    pub fn reset(&mut self, now: Instant) {
        self.deadline = now + self.duration;
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left, zero once the deadline has passed.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    /// Whether the round is inside its warning threshold.
    #[must_use]
    pub fn is_warning(&self, now: Instant) -> bool {
        self.remaining(now) <= self.warning
    }

    /// How long the dealer may wait for a claim before updating the display.
    #[must_use]
    pub fn tick(&self, now: Instant) -> Duration {
        let remaining = self.remaining(now);
        if remaining <= self.warning {
            self.fine.min(remaining)
        } else {
            self.coarse.min(remaining - self.warning)
        }
    }
}
