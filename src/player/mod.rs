//! Player units.
//!
//! Each player runs on its own thread ([`PlayerUnit`]); computer players also
//! run an [`ActionGenerator`] thread feeding it random actions. Everything
//! else talks to a player through its [`PlayerShared`] handle.

mod generator;
mod shared;
mod unit;

pub use generator::ActionGenerator;
pub use shared::PlayerShared;
pub use unit::PlayerUnit;
