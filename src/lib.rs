//! # rust-set
//!
//! Concurrent core of a real-time Set game: players race to mark three cards
//! forming a set on a shared board while a dealer judges their claims, runs
//! the round clock and refreshes the board.
//!
//! ## Design Principles
//!
//! 1. **One Lock for the Board**: every card and token mutation happens under
//!    a single mutex, so the slot/card bijection and the three-token bound
//!    can never be observed broken.
//!
//! 2. **Hints Are Not Locks**: the access gate only steers players away from
//!    acting mid-refresh. Correctness never depends on reading it fresh.
//!
//! 3. **One Verdict per Claim**: claims queue in submission order and each
//!    gets exactly one answer through the claimant's mailbox, including the
//!    ones still pending when a round or the game ends.
//!
//! 4. **Every Wait Is Interruptible**: termination closes queues and fires
//!    signals instead of waiting out timers.
//!
//! ## Threads
//!
//! - `dealer`: deals, polls the claim queue, judges claims, ends rounds
//! - `player-{id}`: one per player, toggles tokens and submits claims
//! - `computer-{id}`: random action source for each computer player
//!
//! ## Modules
//!
//! - `core`: identifiers, configuration, RNG, errors
//! - `sync`: bounded queue, verdict mailbox, shutdown and freeze signals
//! - `board`: the shared board, token sets, access gate
//! - `rules`: `SetEvaluator` and the standard feature rule
//! - `display`: output boundary and its sinks
//! - `player`: player loop and action generator
//! - `dealer`: round loop and countdown arithmetic
//! - `game`: wiring, `GameHandle` and `GameSummary`

pub mod board;
pub mod core;
pub mod dealer;
pub mod display;
pub mod game;
pub mod player;
pub mod rules;
pub mod sync;

// Re-export commonly used types
pub use crate::core::{
    BoardError, CardId, ConfigError, GameConfig, GameError, GameRng, PlayerId, PlayerMap, Slot,
};

pub use crate::board::{AccessGate, Board, BoardSnapshot, ClaimCheck, Hint, TokenSet};

pub use crate::sync::{BoundedQueue, Verdict, VerdictMailbox};

pub use crate::rules::{FeatureRules, SetEvaluator};

pub use crate::display::{DisplayEvent, DisplaySink, EventLog, NullDisplay, TracingDisplay};

pub use crate::player::{ActionGenerator, PlayerShared, PlayerUnit};

pub use crate::dealer::{Dealer, RoundTimer};

pub use crate::game::{Game, GameHandle, GameSummary};
