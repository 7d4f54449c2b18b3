//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

use rust_set::{CardId, FeatureRules, GameConfig, SetEvaluator};
use tracing_subscriber::{fmt, EnvFilter};

static LOGGING: OnceLock<()> = OnceLock::new();

/// Install a test-writer subscriber once per test binary.
///
/// Level comes from `TEST_LOG`, then `RUST_LOG`, then `warn`.
pub fn init_logging() {
    LOGGING.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt().with_env_filter(filter).with_test_writer().without_time().try_init().ok();
    });
}

/// Short rounds, no placement delay and no freezes.
pub fn fast_config(humans: usize, computers: usize) -> GameConfig {
    GameConfig::default()
        .with_players(humans, computers)
        .with_round(400, 100)
        .with_ticks(20, 5)
        .with_freezes(0, 0)
        .with_board_delay(0)
        .with_computer_delay(1)
        .with_seed(42)
}

/// Poll `condition` every millisecond for up to five seconds.
pub fn wait_for(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(1));
    }
}

/// Standard rules that refuse every claim while still reporting sets, so a
/// game keeps dealing but never approves anything.
#[derive(Debug, Default)]
pub struct RejectAll(FeatureRules);

impl SetEvaluator for RejectAll {
    fn find_sets(&self, cards: &[CardId], limit: usize) -> Vec<[CardId; 3]> {
        self.0.find_sets(cards, limit)
    }

    fn test_set(&self, _cards: &[CardId; 3]) -> bool {
        false
    }

    fn card_features(&self, cards: &[CardId]) -> Vec<Vec<u8>> {
        self.0.card_features(cards)
    }
}

pub fn rules() -> Arc<FeatureRules> {
    Arc::new(FeatureRules::default())
}
