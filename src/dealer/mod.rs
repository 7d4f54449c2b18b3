//! The dealer unit.
//!
//! [`Dealer`] drives the game; [`RoundTimer`] holds the countdown arithmetic
//! it polls the claim queue with.

mod round;
mod timer;

pub use round::Dealer;
pub use timer::RoundTimer;
