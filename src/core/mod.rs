//! Core types: identifiers, configuration, RNG and errors.
//!
//! Everything here is plain data shared by the board, the player units and
//! the dealer. None of it synchronizes anything.

pub mod card;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;

pub use card::{CardId, Slot};
pub use config::GameConfig;
pub use error::{BoardError, ConfigError, GameError};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
