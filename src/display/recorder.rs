use std::sync::{Mutex, MutexGuard, PoisonError};

use super::DisplaySink;
use crate::core::{CardId, PlayerId, Slot};

/// One display notification, as recorded by [`EventLog`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayEvent {
    CardPlaced { card: CardId, slot: Slot },
    CardRemoved { slot: Slot },
    TokenPlaced { player: PlayerId, slot: Slot },
    TokenRemoved { player: PlayerId, slot: Slot },
    TokensCleared,
    Score { player: PlayerId, score: u32 },
    Freeze { player: PlayerId, remaining_ms: u64, fine: bool },
    Countdown { remaining_ms: u64, warn: bool },
    Winners(Vec<PlayerId>),
}

/// Sink that records every notification in order.
///
/// Used by tests to observe what a game showed, and by callers that want to
/// replay a game after the fact.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<DisplayEvent>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<DisplayEvent> {
        self.lock().clone()
    }

    /// Recorded events matching `predicate`.
    pub fn filter(&self, predicate: impl Fn(&DisplayEvent) -> bool) -> Vec<DisplayEvent> {
        self.lock().iter().filter(|event| predicate(event)).cloned().collect()
    }

    /// Round countdown values in the order they were shown.
    #[must_use]
    pub fn countdowns(&self) -> Vec<u64> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                DisplayEvent::Countdown { remaining_ms, .. } => Some(*remaining_ms),
                _ => None,
            })
            .collect()
    }

    /// Freeze values shown for `player`, in order.
    #[must_use]
    pub fn freezes(&self, player: PlayerId) -> Vec<u64> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                DisplayEvent::Freeze { player: p, remaining_ms, .. } if *p == player => {
                    Some(*remaining_ms)
                }
                _ => None,
            })
            .collect()
    }

    /// The last winners announcement, if any.
    #[must_use]
    pub fn winners(&self) -> Option<Vec<PlayerId>> {
        self.lock().iter().rev().find_map(|event| match event {
            DisplayEvent::Winners(winners) => Some(winners.clone()),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn record(&self, event: DisplayEvent) {
        self.lock().push(event);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<DisplayEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DisplaySink for EventLog {
    fn place_card(&self, card: CardId, slot: Slot) {
        self.record(DisplayEvent::CardPlaced { card, slot });
    }

    fn remove_card(&self, slot: Slot) {
        self.record(DisplayEvent::CardRemoved { slot });
    }

    fn place_token(&self, player: PlayerId, slot: Slot) {
        self.record(DisplayEvent::TokenPlaced { player, slot });
    }

    fn remove_token(&self, player: PlayerId, slot: Slot) {
        self.record(DisplayEvent::TokenRemoved { player, slot });
    }

    fn remove_all_tokens(&self) {
        self.record(DisplayEvent::TokensCleared);
    }

    fn set_score(&self, player: PlayerId, score: u32) {
        self.record(DisplayEvent::Score { player, score });
    }

    fn set_freeze(&self, player: PlayerId, remaining_ms: u64, fine: bool) {
        self.record(DisplayEvent::Freeze { player, remaining_ms, fine });
    }

    fn set_countdown(&self, remaining_ms: u64, warn: bool) {
        self.record(DisplayEvent::Countdown { remaining_ms, warn });
    }

    fn announce_winners(&self, winners: &[PlayerId]) {
        self.record(DisplayEvent::Winners(winners.to_vec()));
    }
}
