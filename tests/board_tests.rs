//! Board invariants under arbitrary and concurrent operation sequences.

mod common;

use std::sync::Arc;
use std::thread;

use common::{init_logging, rules};
use proptest::prelude::*;
use rust_set::{
    Board, BoardSnapshot, BoundedQueue, CardId, GameConfig, GameRng, NullDisplay, PlayerId, Slot,
};

const BOARD_SIZE: usize = 6;
const DECK_SIZE: usize = 9;
const PLAYERS: usize = 3;

#[derive(Clone, Debug)]
enum Op {
    PlaceCard(u16, u16),
    RemoveCard(u16),
    RetireCard(u16),
    PlaceToken(u8, u16),
    RemoveToken(u8, u16),
    ClearTokens,
}

fn op() -> impl Strategy<Value = Op> {
    let slot = 0..BOARD_SIZE as u16;
    let card = 0..DECK_SIZE as u16;
    let player = 0..PLAYERS as u8;
    prop_oneof![
        3 => (card, slot.clone()).prop_map(|(c, s)| Op::PlaceCard(c, s)),
        1 => slot.clone().prop_map(Op::RemoveCard),
        1 => slot.clone().prop_map(Op::RetireCard),
        4 => (player.clone(), slot.clone()).prop_map(|(p, s)| Op::PlaceToken(p, s)),
        2 => (player, slot).prop_map(|(p, s)| Op::RemoveToken(p, s)),
        1 => Just(Op::ClearTokens),
    ]
}

fn board() -> Board {
    let config = GameConfig::default()
        .with_players(0, PLAYERS)
        .with_board(BOARD_SIZE, DECK_SIZE)
        .with_board_delay(0);
    Board::new(&config, Arc::new(NullDisplay), rules())
}

fn apply(board: &Board, op: &Op) {
    match *op {
        Op::PlaceCard(card, slot) => {
            let _ = board.place_card(CardId::new(card), Slot::new(slot));
        }
        Op::RemoveCard(slot) => {
            let _ = board.remove_card(Slot::new(slot));
        }
        Op::RetireCard(slot) => {
            let _ = board.retire_card(Slot::new(slot));
        }
        Op::PlaceToken(player, slot) => {
            board.place_token(PlayerId::new(player), Slot::new(slot));
        }
        Op::RemoveToken(player, slot) => {
            board.remove_token(PlayerId::new(player), Slot::new(slot));
        }
        Op::ClearTokens => board.clear_all_tokens(),
    }
}

fn tokens_well_formed(snapshot: &BoardSnapshot) -> bool {
    snapshot.tokens.iter().all(|tokens| {
        let mut unique = tokens.clone();
        unique.sort_unstable();
        unique.dedup();
        tokens.len() <= 3 && unique.len() == tokens.len()
    })
}

proptest! {
    /// Property: no sequence of operations breaks the slot/card bijection or
    /// the three-token bound.
    #[test]
    fn prop_invariants_hold(ops in prop::collection::vec(op(), 1..80)) {
        let board = board();
        for op in &ops {
            apply(&board, op);
            let snapshot = board.snapshot();
            prop_assert!(snapshot.check_bijection(), "bijection broken after {:?}", op);
            prop_assert!(tokens_well_formed(&snapshot), "tokens malformed after {:?}", op);
        }
    }

    /// Property: the board agrees with a plain model of which card sits where.
    #[test]
    fn prop_cards_match_model(ops in prop::collection::vec(op(), 1..80)) {
        let board = board();
        let mut model: Vec<Option<u16>> = vec![None; BOARD_SIZE];

        for op in &ops {
            match *op {
                Op::PlaceCard(card, slot) => {
                    let free = model[slot as usize].is_none() && !model.contains(&Some(card));
                    let placed = board.place_card(CardId::new(card), Slot::new(slot)).is_ok();
                    prop_assert_eq!(placed, free);
                    if placed {
                        model[slot as usize] = Some(card);
                    }
                }
                Op::RemoveCard(slot) | Op::RetireCard(slot) => {
                    let expected = model[slot as usize].take().map(CardId::new);
                    let removed = if matches!(op, Op::RemoveCard(_)) {
                        board.remove_card(Slot::new(slot)).ok()
                    } else {
                        board.retire_card(Slot::new(slot)).ok()
                    };
                    prop_assert_eq!(removed, expected);
                }
                _ => apply(&board, op),
            }
            prop_assert_eq!(board.card_count(), model.iter().flatten().count());
        }
    }

    /// Property: a bounded queue never holds more than its capacity.
    #[test]
    fn prop_queue_respects_capacity(capacity in 1usize..6, pushes in 0usize..20) {
        let queue = BoundedQueue::new(capacity);
        let accepted = (0..pushes).filter(|&i| queue.try_push(i).is_ok()).count();

        prop_assert_eq!(accepted, pushes.min(capacity));
        prop_assert_eq!(queue.len(), pushes.min(capacity));
    }
}

/// Several threads hammer the board at once while another keeps checking
/// snapshots; every snapshot must be consistent.
#[test]
fn test_concurrent_operations_keep_invariants() {
    init_logging();
    let board = Arc::new(board());

    let workers: Vec<_> = (0..4u64)
        .map(|worker| {
            let board = Arc::clone(&board);
            thread::spawn(move || {
                let mut rng = GameRng::new(worker);
                for _ in 0..2_000 {
                    let slot = rng.gen_range_usize(0..BOARD_SIZE) as u16;
                    let op = match rng.gen_range_usize(0..6) {
                        0 | 1 => Op::PlaceCard(rng.gen_range_usize(0..DECK_SIZE) as u16, slot),
                        2 => Op::RetireCard(slot),
                        3 => Op::PlaceToken((worker % PLAYERS as u64) as u8, slot),
                        4 => Op::RemoveToken((worker % PLAYERS as u64) as u8, slot),
                        _ => Op::RemoveCard(slot),
                    };
                    apply(&board, &op);
                }
            })
        })
        .collect();

    let observer = {
        let board = Arc::clone(&board);
        thread::spawn(move || {
            for _ in 0..500 {
                let snapshot = board.snapshot();
                assert!(snapshot.check_bijection());
                assert!(tokens_well_formed(&snapshot));
            }
        })
    };

    for worker in workers {
        worker.join().unwrap();
    }
    observer.join().unwrap();

    let snapshot = board.snapshot();
    assert!(snapshot.check_bijection());
    assert!(tokens_well_formed(&snapshot));
}
