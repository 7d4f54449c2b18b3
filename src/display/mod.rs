//! Display boundary.
//!
//! The core reports every visible change through a [`DisplaySink`]. Calls are
//! fire-and-forget: a sink never fails and never calls back into the game.
//! The board invokes the card and token notifications while it holds its
//! lock, so sinks must be quick and must not touch the board.

mod recorder;
mod traced;

pub use recorder::{DisplayEvent, EventLog};
pub use traced::TracingDisplay;

use crate::core::{CardId, PlayerId, Slot};

/// Write-only view of the game.
pub trait DisplaySink: Send + Sync {
    fn place_card(&self, card: CardId, slot: Slot);

    fn remove_card(&self, slot: Slot);

    fn place_token(&self, player: PlayerId, slot: Slot);

    fn remove_token(&self, player: PlayerId, slot: Slot);

    /// Every player's tokens were cleared at once.
    fn remove_all_tokens(&self);

    fn set_score(&self, player: PlayerId, score: u32);

    /// Remaining freeze for `player`. Zero means the player may act again.
    ///
    /// `fine` marks a sub-second remainder rather than a whole-second step.
    fn set_freeze(&self, player: PlayerId, remaining_ms: u64, fine: bool);

    /// Remaining round time. `warn` is set once inside the warning threshold.
    fn set_countdown(&self, remaining_ms: u64, warn: bool);

    fn announce_winners(&self, winners: &[PlayerId]);
}

/// Sink that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullDisplay;

impl DisplaySink for NullDisplay {
    fn place_card(&self, _card: CardId, _slot: Slot) {}
    fn remove_card(&self, _slot: Slot) {}
    fn place_token(&self, _player: PlayerId, _slot: Slot) {}
    fn remove_token(&self, _player: PlayerId, _slot: Slot) {}
    fn remove_all_tokens(&self) {}
    fn set_score(&self, _player: PlayerId, _score: u32) {}
    fn set_freeze(&self, _player: PlayerId, _remaining_ms: u64, _fine: bool) {}
    fn set_countdown(&self, _remaining_ms: u64, _warn: bool) {}
    fn announce_winners(&self, _winners: &[PlayerId]) {}
}
