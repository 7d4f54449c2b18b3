use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::info;

use super::shared::PlayerShared;
use crate::core::{GameRng, Slot};

/// Floor on the pause between submissions.
const MIN_DELAY: Duration = Duration::from_millis(1);

/// Random action source for a computer player.
///
/// Feeds the player's action queue the same way keyboard input would, with
/// uniformly random slots, whenever the player may act.
pub struct ActionGenerator {
    shared: Arc<PlayerShared>,
    rng: GameRng,
    delay: Duration,
}

impl ActionGenerator {
    /// Generator submitting at most one action per `delay`.
    pub fn new(shared: Arc<PlayerShared>, rng: GameRng, delay: Duration) -> Self {
        Self { shared, rng, delay: delay.max(MIN_DELAY) }
    }

    /// Run on a `computer-{id}` thread.
    pub fn spawn(self) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(format!("computer-{}", self.shared.id().0))
            .spawn(move || self.run())
    }

    /// Submit random actions until the player terminates.
    pub fn run(mut self) {
        let id = self.shared.id();
        let board_size = self.shared.board().board_size();
        info!(player = %id, "action generator started");

        while !self.shared.is_terminated() {
            if self.shared.can_act() {
                let slot = Slot::new(self.rng.gen_range_usize(0..board_size) as u16);
                self.shared.request_action(slot);
            }
            if self.shared.shutdown.sleep(self.delay) {
                break;
            }
        }

        info!(player = %id, "action generator terminated");
    }
}
