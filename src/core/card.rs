//! Card and slot identifiers.
//!
//! Both are opaque dense indices: cards live in `0..deck_size`, slots in
//! `0..board_size`. The engine never interprets a card id beyond handing it
//! to the [`SetEvaluator`](crate::rules::SetEvaluator).

use serde::{Deserialize, Serialize};

/// Identifier of a card in `0..deck_size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u16);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw card index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over every card of a deck with `deck_size` cards.
    pub fn all(deck_size: usize) -> impl Iterator<Item = CardId> {
        (0..deck_size as u16).map(CardId)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// A fixed board position that may hold one card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot(pub u16);

impl Slot {
    /// Create a new slot.
    #[must_use]
    pub const fn new(slot: u16) -> Self {
        Self(slot)
    }

    /// Get the raw slot index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over every slot of a board with `board_size` slots.
    pub fn all(board_size: usize) -> impl Iterator<Item = Slot> {
        (0..board_size as u16).map(Slot)
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Slot({})", self.0)
    }
}
