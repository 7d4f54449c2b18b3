//! Interruptible sleeps.
//!
//! [`Shutdown`] is a one-way termination broadcast whose sleeps end early once
//! it fires. [`FreezeTimer`] additionally distinguishes a forced wake, which
//! cuts a point or penalty freeze short without ending the player.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// One-shot termination flag with interruptible sleeps.
#[derive(Debug, Default)]
pub struct Shutdown {
    triggered: Mutex<bool>,
    changed: Condvar,
}

impl Shutdown {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal and wake every sleeper. Idempotent.
    pub fn trigger(&self) {
        *self.lock() = true;
        self.changed.notify_all();
    }

    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.lock()
    }

    /// Sleep for `duration` unless the signal fires first.
    ///
    /// Returns `true` if the signal has fired.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut triggered = self.lock();
        while !*triggered {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            let (guard, _) = self
                .changed
                .wait_timeout(triggered, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            triggered = guard;
        }
        *triggered
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.triggered.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// How a freeze sleep ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SleepOutcome {
    /// The full duration passed.
    Elapsed,
    /// The dealer cut the freeze short at a round boundary.
    Woken,
    /// The player is terminating.
    Terminated,
}

#[derive(Debug, Default)]
struct FreezeState {
    frozen: bool,
    woken: bool,
    terminated: bool,
}

/// Sleep primitive for a player's point and penalty freezes.
///
/// A freeze spans several sleeps (one per countdown step), so wakes are
/// latched for the whole [`FreezeSession`] rather than a single sleep: a wake
/// that lands between two steps still ends the freeze.
#[derive(Debug, Default)]
pub struct FreezeTimer {
    state: Mutex<FreezeState>,
    changed: Condvar,
}

impl FreezeTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a freeze. The freeze ends when the session is dropped.
    pub fn begin(&self) -> FreezeSession<'_> {
        let mut state = self.lock();
        state.frozen = true;
        state.woken = false;
        FreezeSession { timer: self }
    }

    /// Cut the current freeze short. Returns `false` when not frozen, in which
    /// case nothing is latched for a later freeze.
    pub fn wake(&self) -> bool {
        let mut state = self.lock();
        if !state.frozen {
            return false;
        }
        state.woken = true;
        drop(state);
        self.changed.notify_all();
        true
    }

    /// End the current and every future freeze immediately.
    pub fn terminate(&self) {
        self.lock().terminated = true;
        self.changed.notify_all();
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.lock().frozen
    }

    fn lock(&self) -> MutexGuard<'_, FreezeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An active freeze; see [`FreezeTimer::begin`].
#[derive(Debug)]
pub struct FreezeSession<'a> {
    timer: &'a FreezeTimer,
}

impl FreezeSession<'_> {
    /// Sleep for `duration` unless woken or terminated.
    pub fn sleep(&self, duration: Duration) -> SleepOutcome {
        let deadline = Instant::now() + duration;
        let mut state = self.timer.lock();
        loop {
            if state.terminated {
                return SleepOutcome::Terminated;
            }
            if state.woken {
                return SleepOutcome::Woken;
            }
            let now = Instant::now();
            if now >= deadline {
                return SleepOutcome::Elapsed;
            }
            let (guard, _) = self
                .timer
                .changed
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            state = guard;
        }
    }
}

impl Drop for FreezeSession<'_> {
    fn drop(&mut self) {
        let mut state = self.timer.lock();
        state.frozen = false;
        state.woken = false;
    }
}
