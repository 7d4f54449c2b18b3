//! Game configuration.
//!
//! A `GameConfig` is supplied once at construction and never changes while
//! the game runs. Durations are stored as milliseconds so the struct
//! serializes cleanly; accessors hand out [`Duration`]s.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Interactive players. They take the lowest player ids.
    pub human_players: usize,

    /// Automated players, each driven by an action generator.
    pub computer_players: usize,

    /// Number of board slots.
    pub board_size: usize,

    /// Number of cards; card ids are `0..deck_size`.
    pub deck_size: usize,

    /// Attributes per card.
    pub feature_count: usize,

    /// Distinct values per attribute.
    pub feature_size: usize,

    /// Round duration before the board is reshuffled.
    pub round_ms: u64,

    /// Remaining time below which the countdown switches to fine mode.
    pub warning_ms: u64,

    /// Freeze after an approved claim.
    pub point_freeze_ms: u64,

    /// Freeze after a rejected claim.
    pub penalty_freeze_ms: u64,

    /// Delay applied by every card placement or removal.
    pub board_delay_ms: u64,

    /// Dealer poll interval while above the warning threshold.
    pub coarse_tick_ms: u64,

    /// Dealer poll interval inside the warning threshold.
    pub fine_tick_ms: u64,

    /// Pause between two actions of an automated player.
    pub computer_delay_ms: u64,

    /// Log every valid set on the board after each deal.
    pub hints: bool,

    /// RNG seed. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            human_players: 0,
            computer_players: 2,
            board_size: 12,
            deck_size: 81,
            feature_count: 4,
            feature_size: 3,
            round_ms: 60_000,
            warning_ms: 5_000,
            point_freeze_ms: 1_000,
            penalty_freeze_ms: 3_000,
            board_delay_ms: 100,
            coarse_tick_ms: 1_000,
            fine_tick_ms: 10,
            computer_delay_ms: 10,
            hints: false,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Defaults overlaid with `SET_*` environment variables.
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            human_players: read_env("SET_HUMAN_PLAYERS", defaults.human_players),
            computer_players: read_env("SET_COMPUTER_PLAYERS", defaults.computer_players),
            board_size: read_env("SET_BOARD_SIZE", defaults.board_size),
            deck_size: read_env("SET_DECK_SIZE", defaults.deck_size),
            feature_count: read_env("SET_FEATURE_COUNT", defaults.feature_count),
            feature_size: read_env("SET_FEATURE_SIZE", defaults.feature_size),
            round_ms: read_env("SET_ROUND_MS", defaults.round_ms),
            warning_ms: read_env("SET_WARNING_MS", defaults.warning_ms),
            point_freeze_ms: read_env("SET_POINT_FREEZE_MS", defaults.point_freeze_ms),
            penalty_freeze_ms: read_env("SET_PENALTY_FREEZE_MS", defaults.penalty_freeze_ms),
            board_delay_ms: read_env("SET_BOARD_DELAY_MS", defaults.board_delay_ms),
            coarse_tick_ms: read_env("SET_COARSE_TICK_MS", defaults.coarse_tick_ms),
            fine_tick_ms: read_env("SET_FINE_TICK_MS", defaults.fine_tick_ms),
            computer_delay_ms: read_env("SET_COMPUTER_DELAY_MS", defaults.computer_delay_ms),
            hints: read_env("SET_HINTS", defaults.hints),
            seed: std::env::var("SET_SEED").ok().and_then(|raw| raw.parse().ok()),
        }
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let players = self.player_count();
        if players == 0 {
            return Err(ConfigError::NoPlayers);
        }
        if players > 255 {
            return Err(ConfigError::TooManyPlayers(players));
        }
        if self.board_size < 3 {
            return Err(ConfigError::BoardTooSmall(self.board_size));
        }
        if self.board_size > usize::from(u16::MAX) {
            return Err(ConfigError::BoardTooLarge(self.board_size));
        }
        if self.deck_size < 3 {
            return Err(ConfigError::DeckTooSmall(self.deck_size));
        }
        if self.feature_size < 3 {
            return Err(ConfigError::FeatureSizeTooSmall(self.feature_size));
        }
        if self.feature_size > usize::from(u8::MAX) {
            return Err(ConfigError::FeatureSizeTooLarge(self.feature_size));
        }
        let space = self.feature_space();
        if self.deck_size > space || self.deck_size > usize::from(u16::MAX) {
            return Err(ConfigError::DeckTooLarge { deck_size: self.deck_size, space });
        }
        if self.warning_ms >= self.round_ms {
            return Err(ConfigError::WarningNotBelowRound {
                warning_ms: self.warning_ms,
                round_ms: self.round_ms,
            });
        }
        if self.coarse_tick_ms == 0 || self.fine_tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        Ok(())
    }

    /// Total seated players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.human_players + self.computer_players
    }

    /// Number of distinct cards the feature encoding can express.
    #[must_use]
    pub fn feature_space(&self) -> usize {
        u32::try_from(self.feature_count)
            .ok()
            .and_then(|count| self.feature_size.checked_pow(count))
            .unwrap_or(usize::MAX)
    }

    #[must_use]
    pub fn round_duration(&self) -> Duration {
        Duration::from_millis(self.round_ms)
    }

    #[must_use]
    pub fn warning_threshold(&self) -> Duration {
        Duration::from_millis(self.warning_ms)
    }

    #[must_use]
    pub fn point_freeze(&self) -> Duration {
        Duration::from_millis(self.point_freeze_ms)
    }

    #[must_use]
    pub fn penalty_freeze(&self) -> Duration {
        Duration::from_millis(self.penalty_freeze_ms)
    }

    #[must_use]
    pub fn board_delay(&self) -> Duration {
        Duration::from_millis(self.board_delay_ms)
    }

    #[must_use]
    pub fn coarse_tick(&self) -> Duration {
        Duration::from_millis(self.coarse_tick_ms)
    }

    #[must_use]
    pub fn fine_tick(&self) -> Duration {
        Duration::from_millis(self.fine_tick_ms)
    }

    #[must_use]
    pub fn computer_delay(&self) -> Duration {
        Duration::from_millis(self.computer_delay_ms)
    }

    /// Set the human/computer split.
    #[must_use]
    pub fn with_players(mut self, human: usize, computer: usize) -> Self {
        self.human_players = human;
        self.computer_players = computer;
        self
    }

    /// Set board and deck sizes.
    #[must_use]
    pub fn with_board(mut self, board_size: usize, deck_size: usize) -> Self {
        self.board_size = board_size;
        self.deck_size = deck_size;
        self
    }

    /// Set round duration and warning threshold.
    #[must_use]
    pub fn with_round(mut self, round_ms: u64, warning_ms: u64) -> Self {
        self.round_ms = round_ms;
        self.warning_ms = warning_ms;
        self
    }

    /// Set point and penalty freezes.
    #[must_use]
    pub fn with_freezes(mut self, point_ms: u64, penalty_ms: u64) -> Self {
        self.point_freeze_ms = point_ms;
        self.penalty_freeze_ms = penalty_ms;
        self
    }

    /// Set the dealer's coarse and fine poll ticks.
    #[must_use]
    pub fn with_ticks(mut self, coarse_ms: u64, fine_ms: u64) -> Self {
        self.coarse_tick_ms = coarse_ms;
        self.fine_tick_ms = fine_ms;
        self
    }

    #[must_use]
    pub fn with_board_delay(mut self, delay_ms: u64) -> Self {
        self.board_delay_ms = delay_ms;
        self
    }

    #[must_use]
    pub fn with_computer_delay(mut self, delay_ms: u64) -> Self {
        self.computer_delay_ms = delay_ms;
        self
    }

    #[must_use]
    pub fn with_hints(mut self, hints: bool) -> Self {
        self.hints = hints;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

fn read_env<T: std::str::FromStr>(key: &str, fallback: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse::<T>().ok())
        .unwrap_or(fallback)
}
