//! End-to-end games: real dealer, player and generator threads.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use common::{fast_config, init_logging, rules, wait_for, RejectAll};
use rust_set::{
    ConfigError, DisplayEvent, EventLog, Game, GameConfig, GameError, GameHandle, PlayerId,
    PlayerShared, Slot,
};

fn p(id: u8) -> PlayerId {
    PlayerId::new(id)
}

fn start(config: GameConfig, log: &Arc<EventLog>) -> GameHandle {
    Game::new(config, log.clone(), rules()).unwrap().start().unwrap()
}

fn wait_for_full_board(handle: &GameHandle, cards: usize) {
    wait_for("dealt board", || {
        handle.board().card_count() == cards && handle.board().gate().is_open()
    });
}

fn players(handle: &GameHandle, count: u8) -> Vec<Arc<PlayerShared>> {
    (0..count).map(|id| Arc::clone(handle.player(p(id)).unwrap())).collect()
}

/// A player never has more than one claim waiting for its verdict.
fn assert_one_claim_outstanding(players: &[Arc<PlayerShared>]) {
    for player in players {
        // Claims first: verdicts can only catch up while we read.
        let claims = player.claims_submitted();
        let verdicts = player.verdicts_received();
        assert!(
            claims.saturating_sub(verdicts) <= 1,
            "{} has {claims} claims but {verdicts} verdicts",
            player.id()
        );
    }
}

fn request(handle: &GameHandle, player: PlayerId, slots: &[u16]) {
    for &slot in slots {
        wait_for("accepted action", || handle.request_action(player, Slot::new(slot)).unwrap());
    }
}

/// A lone player claims the only set in a three-card deck, scores, and the
/// game ends once the deck has nothing left.
#[test]
fn test_single_set_is_approved_and_game_ends() {
    init_logging();
    let log = Arc::new(EventLog::new());
    let config = fast_config(1, 0).with_board(3, 3).with_round(2_000, 100);
    let handle = start(config, &log);

    wait_for_full_board(&handle, 3);
    request(&handle, p(0), &[0, 1, 2]);
    wait_for("point", || handle.scores()[p(0)] == 1);
    // Nothing left to deal: the slots stay empty.
    wait_for("retired cards", || handle.board().card_count() == 0);
    assert!(handle.board().empty_slots().len() == 3);

    let summary = handle.join().unwrap();
    assert_eq!(summary.scores[p(0)], 1);
    assert_eq!(summary.winners, vec![p(0)]);
    assert_eq!(summary.rounds, 1);
    assert_eq!(log.winners(), Some(vec![p(0)]));
    assert!(log.events().contains(&DisplayEvent::Score { player: p(0), score: 1 }));

    let removed = log.filter(|e| matches!(e, DisplayEvent::CardRemoved { .. }));
    assert_eq!(removed.len(), 3);
}

/// A rejected claim costs a penalty, leaves the score alone and keeps the
/// tokens on the board.
#[test]
fn test_invalid_claim_is_rejected() {
    init_logging();
    let log = Arc::new(EventLog::new());
    let config = fast_config(1, 0).with_round(5_000, 100);
    let handle = Game::new(config, log.clone(), Arc::new(RejectAll::default()))
        .unwrap()
        .start()
        .unwrap();

    wait_for_full_board(&handle, 12);
    request(&handle, p(0), &[0, 1, 2]);
    wait_for("penalty served", || log.freezes(p(0)) == vec![0]);
    wait_for("player resumed", || handle.player(p(0)).unwrap().is_accepting());

    assert_eq!(handle.scores()[p(0)], 0);
    assert_eq!(handle.board().token_count(p(0)), 3);

    handle.terminate();
    let summary = handle.join().unwrap();
    assert_eq!(summary.scores[p(0)], 0);
}

/// Two tokens at the round boundary are swept away without any claim.
#[test]
fn test_round_end_clears_partial_tokens() {
    init_logging();
    let log = Arc::new(EventLog::new());
    let handle = start(fast_config(1, 0), &log);

    wait_for_full_board(&handle, 12);
    request(&handle, p(0), &[4, 7]);
    wait_for("two tokens", || handle.board().token_count(p(0)) == 2);
    wait_for("round boundary", || handle.board().token_count(p(0)) == 0);

    assert!(log.events().contains(&DisplayEvent::TokensCleared));
    assert!(log.freezes(p(0)).is_empty());
    assert!(handle.board().claims().is_empty());
    assert_eq!(handle.scores()[p(0)], 0);

    handle.terminate();
    handle.join().unwrap();
}

/// Within a round the countdown only goes down; each reset shows the full
/// duration again, and the last stretch is shown in warning mode.
#[test]
fn test_countdown_never_increases_within_round() {
    init_logging();
    let log = Arc::new(EventLog::new());
    let handle = start(fast_config(1, 0), &log);

    wait_for("two rounds", || {
        log.filter(|e| *e == DisplayEvent::TokensCleared).len() >= 2
    });
    handle.terminate();
    handle.join().unwrap();

    let countdowns = log.countdowns();
    assert_eq!(countdowns.first(), Some(&400));
    for pair in countdowns.windows(2) {
        let (before, after) = (pair[0], pair[1]);
        assert!(after <= before || after == 400, "countdown rose from {before} to {after}");
    }
    let warned = log.filter(|e| matches!(e, DisplayEvent::Countdown { warn: true, .. }));
    assert!(!warned.is_empty());
}

/// Computer players race each other; the winners are exactly the players on
/// the highest score and the board ends empty and consistent.
#[test]
fn test_computer_players_game() {
    init_logging();
    let log = Arc::new(EventLog::new());
    let handle = start(fast_config(0, 4).with_freezes(10, 20), &log);

    thread::sleep(Duration::from_millis(1_500));
    handle.terminate();
    let board = Arc::clone(handle.board());
    let summary = handle.join().unwrap();

    let best = summary.scores.values().copied().max().unwrap();
    let expected: Vec<PlayerId> = summary
        .scores
        .iter()
        .filter(|&(_, &score)| score == best)
        .map(|(id, _)| id)
        .collect();
    assert_eq!(summary.winners, expected);
    assert!(summary.rounds >= 1);

    let snapshot = board.snapshot();
    assert!(snapshot.check_bijection());
    assert_eq!(snapshot.card_count(), 0);
    assert!(snapshot.tokens.iter().all(Vec::is_empty));
}

/// Termination does not wait out a long round or freeze.
#[test]
fn test_terminate_is_prompt() {
    init_logging();
    let log = Arc::new(EventLog::new());
    let config = fast_config(1, 2).with_round(60_000, 5_000).with_freezes(30_000, 30_000);
    let handle = start(config, &log);

    wait_for_full_board(&handle, 12);
    thread::sleep(Duration::from_millis(200));

    let started = Instant::now();
    handle.terminate();
    handle.join().unwrap();
    assert!(started.elapsed() < Duration::from_secs(5));
}

/// Dropping the handle shuts the game down as well.
#[test]
fn test_dropping_handle_terminates() {
    init_logging();
    let log = Arc::new(EventLog::new());
    let handle = start(fast_config(0, 2), &log);
    wait_for_full_board(&handle, 12);

    drop(handle);
    assert!(log.winners().is_some());
}

#[test]
fn test_unknown_player_is_an_error() {
    init_logging();
    let log = Arc::new(EventLog::new());
    let handle = start(fast_config(1, 0), &log);

    let err = handle.request_action(p(3), Slot::new(0)).unwrap_err();
    assert!(matches!(err, GameError::UnknownPlayer(player) if player == p(3)));

    handle.terminate();
    handle.join().unwrap();
}

#[test]
fn test_invalid_config_is_refused() {
    let log = Arc::new(EventLog::new());
    let err = Game::new(GameConfig::default().with_players(0, 0), log, rules())
        .err()
        .unwrap();
    assert!(matches!(err, GameError::Config(ConfigError::NoPlayers)));
}

/// Under a crowd of computer players every claim that reaches the queue is
/// answered exactly once, and nobody ever waits on two claims.
#[test]
fn test_every_claim_gets_exactly_one_verdict() {
    init_logging();
    let log = Arc::new(EventLog::new());
    let config = fast_config(0, 6).with_round(250, 50);
    let handle = Game::new(config, log, Arc::new(RejectAll::default()))
        .unwrap()
        .start()
        .unwrap();
    let players = players(&handle, 6);

    let started = Instant::now();
    while started.elapsed() < Duration::from_millis(800) {
        assert_one_claim_outstanding(&players);
        assert!(handle.board().claims().len() <= players.len());
        thread::sleep(Duration::from_millis(1));
    }
    handle.terminate();
    let summary = handle.join().unwrap();

    assert_eq!(summary.undelivered, 0);
    let mut total = 0;
    for player in &players {
        assert_eq!(player.claims_submitted(), player.verdicts_received(), "{}", player.id());
        total += player.claims_submitted();
    }
    assert!(total > 0, "no claim was ever made");
}

/// Players act on a gate that another thread keeps flipping. Whatever they
/// manage to do on a stale view, the board stays consistent and every claim
/// is still answered once.
#[test]
fn test_flipping_gate_keeps_board_consistent() {
    init_logging();
    let log = Arc::new(EventLog::new());
    let handle = start(fast_config(0, 4).with_round(300, 50), &log);
    let players = players(&handle, 4);
    let board = Arc::clone(handle.board());

    let flipping = Arc::new(AtomicBool::new(true));
    let flipper = {
        let board = Arc::clone(&board);
        let flipping = Arc::clone(&flipping);
        thread::spawn(move || {
            let mut open = false;
            while flipping.load(Ordering::Relaxed) {
                if open {
                    board.gate().open();
                } else {
                    board.gate().close();
                }
                open = !open;
                thread::sleep(Duration::from_micros(300));
            }
        })
    };

    let started = Instant::now();
    while started.elapsed() < Duration::from_millis(800) {
        let snapshot = board.snapshot();
        assert!(snapshot.check_bijection());
        assert!(snapshot.tokens.iter().all(|tokens| tokens.len() <= 3));
        assert_one_claim_outstanding(&players);
        thread::sleep(Duration::from_millis(1));
    }
    flipping.store(false, Ordering::Relaxed);
    flipper.join().unwrap();

    handle.terminate();
    let summary = handle.join().unwrap();

    assert_eq!(summary.undelivered, 0);
    for player in &players {
        assert_eq!(player.claims_submitted(), player.verdicts_received(), "{}", player.id());
    }
    let snapshot = board.snapshot();
    assert!(snapshot.check_bijection());
    assert_eq!(snapshot.card_count(), 0);
    assert!(snapshot.tokens.iter().all(Vec::is_empty));
}
