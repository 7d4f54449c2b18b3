//! Game wiring and the caller-facing handle.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use rust_set::core::GameConfig;
//! use rust_set::display::TracingDisplay;
//! use rust_set::game::Game;
//! use rust_set::rules::FeatureRules;
//!
//! let config = GameConfig::default().with_players(0, 3).with_seed(7);
//! let rules = Arc::new(FeatureRules::from_config(&config));
//! let handle = Game::new(config, Arc::new(TracingDisplay), rules)?.start()?;
//!
//! std::thread::sleep(Duration::from_secs(5));
//! handle.terminate();
//! let summary = handle.join()?;
//! println!("winners: {:?}", summary.winners);
//! # Ok::<(), rust_set::core::GameError>(())
//! ```

use std::sync::Arc;
use std::thread::JoinHandle;

use tracing::warn;

use crate::board::Board;
use crate::core::{GameConfig, GameError, GameRng, PlayerId, PlayerMap, Slot};
use crate::dealer::Dealer;
use crate::display::DisplaySink;
use crate::player::PlayerShared;
use crate::rules::SetEvaluator;
use crate::sync::Shutdown;

/// Final result of a game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSummary {
    pub scores: PlayerMap<u32>,
    /// Every player whose score equals the highest score.
    pub winners: Vec<PlayerId>,
    pub rounds: u32,
    /// Verdicts the dealer could not hand over. Zero unless a player had two
    /// claims outstanding.
    pub undelivered: u32,
}

impl GameSummary {
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.winners.contains(&player)
    }
}

/// A configured game that has not started yet.
///
/// Players `0..human_players` take their actions from the caller through
/// [`GameHandle::request_action`]; the rest are computer players.
pub struct Game {
    config: GameConfig,
    board: Arc<Board>,
    players: PlayerMap<Arc<PlayerShared>>,
    rng: GameRng,
}

impl Game {
    pub fn new(
        config: GameConfig,
        display: Arc<dyn DisplaySink>,
        evaluator: Arc<dyn SetEvaluator>,
    ) -> Result<Self, GameError> {
        config.validate()?;

        let board = Arc::new(Board::new(&config, display, evaluator));
        let human_players = config.human_players;
        let players = PlayerMap::new(config.player_count(), |id| {
            Arc::new(PlayerShared::new(id, id.index() < human_players, Arc::clone(&board)))
        });
        let rng = GameRng::from_seed_or_entropy(config.seed).for_context("dealer");

        Ok(Self { config, board, players, rng })
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Arc<Board> {
        &self.board
    }

    /// Start the dealer, which in turn starts every player.
    pub fn start(self) -> Result<GameHandle, GameError> {
        let stop = Arc::new(Shutdown::new());
        let dealer = Dealer::new(
            self.config,
            Arc::clone(&self.board),
            self.players.clone(),
            self.rng,
            Arc::clone(&stop),
        )
        .spawn()?;

        Ok(GameHandle { board: self.board, players: self.players, stop, dealer: Some(dealer) })
    }
}

/// Control over a running game.
///
/// Dropping the handle terminates the game and waits for it to wind down.
pub struct GameHandle {
    board: Arc<Board>,
    players: PlayerMap<Arc<PlayerShared>>,
    stop: Arc<Shutdown>,
    dealer: Option<JoinHandle<Result<GameSummary, GameError>>>,
}

impl GameHandle {
    #[must_use]
    pub fn board(&self) -> &Arc<Board> {
        &self.board
    }

    pub fn player(&self, player: PlayerId) -> Result<&Arc<PlayerShared>, GameError> {
        self.players.get(player).ok_or(GameError::UnknownPlayer(player))
    }

    /// Ask `player` to toggle its token on `slot`.
    ///
    /// Returns whether the request was queued; see
    /// [`PlayerShared::request_action`].
    pub fn request_action(&self, player: PlayerId, slot: Slot) -> Result<bool, GameError> {
        Ok(self.player(player)?.request_action(slot))
    }

    /// Current scores.
    #[must_use]
    pub fn scores(&self) -> PlayerMap<u32> {
        PlayerMap::new(self.players.player_count(), |id| self.players[id].score())
    }

    /// Stop the game. The dealer finishes the current step, clears the board
    /// and shuts every player down. Idempotent.
    pub fn terminate(&self) {
        self.stop.trigger();
        self.board.claims().close();
    }

    /// Whether the dealer has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.dealer.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the game to end on its own (or after [`terminate`]).
    ///
    /// [`terminate`]: GameHandle::terminate
    pub fn join(mut self) -> Result<GameSummary, GameError> {
        let dealer = self
            .dealer
            .take()
            .ok_or_else(|| GameError::UnitPanicked("dealer".into()))?;
        dealer.join().map_err(|_| GameError::UnitPanicked("dealer".into()))?
    }
}

impl Drop for GameHandle {
    fn drop(&mut self) {
        if let Some(dealer) = self.dealer.take() {
            self.terminate();
            if dealer.join().is_err() {
                warn!("dealer thread panicked during shutdown");
            }
        }
    }
}
