//! Shared board state.
//!
//! - [`Board`]: slot/card bijection plus per-player tokens behind a single
//!   lock, with the claim queue and access gate alongside
//! - [`TokenSet`]: one player's tokens, at most three
//! - [`AccessGate`]: the unsynchronized "players may act" hint

mod gate;
mod grid;
mod tokens;

pub use gate::AccessGate;
pub use grid::{Board, BoardSnapshot, ClaimCheck, Hint};
pub use tokens::TokenSet;
