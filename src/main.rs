//! Headless simulation: computer players race each other until the deck runs
//! out of sets, or until `SET_RUN_SECS` elapses.
//!
//! Configuration comes from `SET_*` environment variables (see
//! [`GameConfig::from_env`]); logging from `RUST_LOG`, default `info`.

use std::sync::Arc;
use std::time::Duration;

use rust_set::{FeatureRules, Game, GameConfig, TracingDisplay};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = GameConfig::from_env();
    config.validate()?;
    let run_for = std::env::var("SET_RUN_SECS")
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .map(Duration::from_secs);
    info!(?config, ?run_for, "starting simulation");

    let rules = Arc::new(FeatureRules::from_config(&config));
    let handle = Game::new(config, Arc::new(TracingDisplay), rules)?.start()?;

    if let Some(run_for) = run_for {
        let deadline = std::time::Instant::now() + run_for;
        while !handle.is_finished() && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(100));
        }
        handle.terminate();
    }

    let summary = handle.join()?;
    for (player, score) in summary.scores.iter() {
        println!("{player}: {score}");
    }
    let winners: Vec<String> = summary.winners.iter().map(ToString::to_string).collect();
    println!("winners after {} rounds: {}", summary.rounds, winners.join(", "));
    Ok(())
}
