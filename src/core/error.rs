//! Error types.
//!
//! Steady-state play has no recoverable error taxonomy: interrupted waits,
//! stale claims and the end of the deck are ordinary return values. What is
//! left here are configuration mistakes and board bookkeeping defects.

use thiserror::Error;

use super::card::{CardId, Slot};
use super::player::PlayerId;

/// Invalid [`GameConfig`](super::GameConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("at least one player is required")]
    NoPlayers,
    #[error("at most 255 players are supported, got {0}")]
    TooManyPlayers(usize),
    #[error("board needs at least 3 slots, got {0}")]
    BoardTooSmall(usize),
    #[error("board of {0} slots exceeds the slot index range")]
    BoardTooLarge(usize),
    #[error("deck needs at least 3 cards, got {0}")]
    DeckTooSmall(usize),
    #[error("deck of {deck_size} cards exceeds the {space} distinct feature combinations")]
    DeckTooLarge { deck_size: usize, space: usize },
    #[error("feature size must be at least 3, got {0}")]
    FeatureSizeTooSmall(usize),
    #[error("feature size must fit in a byte, got {0}")]
    FeatureSizeTooLarge(usize),
    #[error("warning threshold {warning_ms}ms must be below the round duration {round_ms}ms")]
    WarningNotBelowRound { warning_ms: u64, round_ms: u64 },
    #[error("tick durations must be non-zero")]
    ZeroTick,
}

/// Violation of the board's slot/card bookkeeping.
///
/// The Dealer is the only caller that moves cards, so any of these indicates
/// a defect rather than a race.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("{slot} is outside a board of {board_size} slots")]
    SlotOutOfRange { slot: Slot, board_size: usize },
    #[error("{card} is outside a deck of {deck_size} cards")]
    CardOutOfRange { card: CardId, deck_size: usize },
    #[error("{slot} already holds {card}")]
    SlotOccupied { slot: Slot, card: CardId },
    #[error("{0} holds no card")]
    SlotEmpty(Slot),
    #[error("{card} is already on the board at {slot}")]
    CardAlreadyPlaced { card: CardId, slot: Slot },
}

/// Top-level error for starting and running a game.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("board defect: {0}")]
    Board(#[from] BoardError),
    #[error("{0} is not seated at this table")]
    UnknownPlayer(PlayerId),
    #[error("failed to spawn thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("{0} thread panicked")]
    UnitPanicked(String),
}
