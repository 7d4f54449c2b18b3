//! Synchronization primitives tying the units together.
//!
//! - [`BoundedQueue`]: drop-when-full FIFO with closable, blocking consumers.
//!   Backs each player's desired-action queue and the board's claim queue.
//! - [`VerdictMailbox`]: capacity-1 verdict handoff, one per player.
//! - [`Shutdown`]: termination broadcast with interruptible sleeps.
//! - [`FreezeTimer`]: freeze sleeps that a round boundary can cut short.
//!
//! Every blocking call here wakes promptly on close/terminate, which is what
//! lets the dealer tear a game down without waiting out timers.

mod mailbox;
mod queue;
mod signal;

pub use mailbox::{DeliverError, Verdict, VerdictMailbox};
pub use queue::{BoundedQueue, PopError, PushError};
pub use signal::{FreezeSession, FreezeTimer, Shutdown, SleepOutcome};
