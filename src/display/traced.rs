use tracing::{debug, info, trace};

use super::DisplaySink;
use crate::core::{CardId, PlayerId, Slot};

/// Sink that renders the game as structured log events.
///
/// Card and score changes log at `debug`, countdown ticks at `trace`, and the
/// final announcement at `info`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDisplay;

impl DisplaySink for TracingDisplay {
    fn place_card(&self, card: CardId, slot: Slot) {
        debug!(%card, %slot, "card placed");
    }

    fn remove_card(&self, slot: Slot) {
        debug!(%slot, "card removed");
    }

    fn place_token(&self, player: PlayerId, slot: Slot) {
        trace!(%player, %slot, "token placed");
    }

    fn remove_token(&self, player: PlayerId, slot: Slot) {
        trace!(%player, %slot, "token removed");
    }

    fn remove_all_tokens(&self) {
        debug!("all tokens removed");
    }

    fn set_score(&self, player: PlayerId, score: u32) {
        debug!(%player, score, "score");
    }

    fn set_freeze(&self, player: PlayerId, remaining_ms: u64, fine: bool) {
        trace!(%player, remaining_ms, fine, "freeze");
    }

    fn set_countdown(&self, remaining_ms: u64, warn: bool) {
        trace!(remaining_ms, warn, "countdown");
    }

    fn announce_winners(&self, winners: &[PlayerId]) {
        let names: Vec<String> = winners.iter().map(ToString::to_string).collect();
        info!(winners = %names.join(", "), "winners announced");
    }
}
