//! The player loop.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::generator::ActionGenerator;
use super::shared::PlayerShared;
use crate::core::{GameConfig, GameRng, Slot};
use crate::rules::SET_SIZE;
use crate::sync::{PushError, SleepOutcome, Verdict};

/// Pause between checks while the player may not act.
const IDLE_BACKOFF: Duration = Duration::from_millis(2);

/// Freeze countdowns step down one second at a time.
const FREEZE_STEP: Duration = Duration::from_secs(1);

/// Which freeze follows a verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Freeze {
    Point,
    Penalty,
}

/// One player's execution loop.
///
/// Consumes desired actions, toggles tokens, submits a claim on reaching
/// three tokens and serves the freeze its verdict calls for. Computer players
/// also own an [`ActionGenerator`] thread, joined before the loop returns.
pub struct PlayerUnit {
    shared: Arc<PlayerShared>,
    point_freeze: Duration,
    penalty_freeze: Duration,
    generator: Option<ActionGenerator>,
}

impl PlayerUnit {
    /// Player loop for `shared`. `rng` drives the action generator and is
    /// ignored for human players.
    pub fn new(shared: Arc<PlayerShared>, config: &GameConfig, rng: GameRng) -> Self {
        let generator = (!shared.is_human())
            .then(|| ActionGenerator::new(Arc::clone(&shared), rng, config.computer_delay()));
        Self {
            shared,
            point_freeze: config.point_freeze(),
            penalty_freeze: config.penalty_freeze(),
            generator,
        }
    }

    /// Run the loop on its own `player-{id}` thread.
    pub fn spawn(self) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(format!("player-{}", self.shared.id().0))
            .spawn(move || self.run())
    }

    /// Run until terminated. Returns once the action generator, if any, has
    /// been joined.
    pub fn run(mut self) {
        let id = self.shared.id();
        info!(player = %id, human = self.shared.is_human(), "player started");

        let generator = self.generator.take().and_then(|generator| match generator.spawn() {
            Ok(handle) => Some(handle),
            Err(err) => {
                error!(player = %id, %err, "failed to spawn action generator");
                None
            }
        });

        while !self.shared.is_terminated() {
            if self.shared.can_act() {
                let Some(slot) = self.shared.actions().pop() else {
                    break;
                };
                if self.shared.is_terminated() {
                    break;
                }
                self.handle_action(slot);
            } else {
                // Whatever was requested before the gate closed is stale now.
                self.shared.actions().clear();
                self.shared.shutdown.sleep(IDLE_BACKOFF);
            }
        }

        if let Some(handle) = generator {
            if handle.join().is_err() {
                error!(player = %id, "action generator panicked");
            }
        }
        info!(player = %id, score = self.shared.score(), "player terminated");
    }

    fn handle_action(&self, slot: Slot) {
        let board = self.shared.board();
        let id = self.shared.id();

        if board.remove_token(id, slot) {
            return;
        }
        if board.token_count(id) >= SET_SIZE {
            return;
        }
        if board.place_token(id, slot) == Some(SET_SIZE) {
            self.claim();
        }
    }

    /// Submit a claim and serve whatever verdict comes back.
    fn claim(&self) {
        let id = self.shared.id();
        self.shared.set_accepting(false);

        match self.shared.board().claims().try_push(id) {
            Ok(()) => {
                self.shared.record_claim();
                debug!(player = %id, "claim submitted");
            }
            Err(PushError::Closed(_)) => {
                debug!(player = %id, "claim queue closed, claim dropped");
                self.shared.set_accepting(true);
                return;
            }
            Err(PushError::Full(_)) => {
                warn!(player = %id, "claim queue full, claim dropped");
                self.shared.set_accepting(true);
                return;
            }
        }

        let verdict = self.shared.mailbox().wait();
        if verdict.is_some() {
            self.shared.record_verdict();
        }
        match verdict {
            Some(Verdict::Approved) => self.serve(Freeze::Point),
            Some(Verdict::Rejected) => self.serve(Freeze::Penalty),
            Some(Verdict::Withdrawn) => debug!(player = %id, "claim withdrawn"),
            None => return,
        }
        self.shared.set_accepting(true);
    }

    /// Count a freeze down on the display, then apply its consequence.
    ///
    /// A wake or termination ends the countdown early; the consequence is
    /// applied either way.
    fn serve(&self, freeze: Freeze) {
        let id = self.shared.id();
        let display = self.shared.board().display();
        let duration = match freeze {
            Freeze::Point => self.point_freeze,
            Freeze::Penalty => self.penalty_freeze,
        };
        debug!(player = %id, ?freeze, ms = duration.as_millis() as u64, "freeze");

        {
            let session = self.shared.freeze.begin();
            let mut remaining = duration;
            while !remaining.is_zero() {
                display.set_freeze(id, remaining.as_millis() as u64, remaining < FREEZE_STEP);
                let step = remaining.min(FREEZE_STEP);
                match session.sleep(step) {
                    SleepOutcome::Elapsed => remaining -= step,
                    SleepOutcome::Woken | SleepOutcome::Terminated => break,
                }
            }
        }
        display.set_freeze(id, 0, false);

        if freeze == Freeze::Point {
            let score = self.shared.add_point();
            display.set_score(id, score);
        }
    }
}
