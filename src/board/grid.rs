//! The shared board.
//!
//! All card and token state lives behind one mutex, and every operation below
//! takes it for its whole duration: no two board operations ever interleave.
//! The access gate and the claim queue sit beside that state rather than
//! inside it, since each synchronizes itself.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use tracing::info;

use super::gate::AccessGate;
use super::tokens::TokenSet;
use crate::core::{BoardError, CardId, GameConfig, PlayerId, PlayerMap, Slot};
use crate::display::DisplaySink;
use crate::rules::{SetEvaluator, SET_SIZE};
use crate::sync::BoundedQueue;

/// Result of resolving a claim against the current board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClaimCheck {
    /// The claimant no longer holds three tokens on occupied slots.
    Stale,
    /// The claimed slots, in token order, and the cards on them.
    Ready {
        slots: [Slot; SET_SIZE],
        cards: [CardId; SET_SIZE],
    },
}

/// A set currently on the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hint {
    /// Ascending.
    pub slots: [Slot; SET_SIZE],
    pub cards: [CardId; SET_SIZE],
    /// Feature values of each card, in slot order.
    pub features: Vec<Vec<u8>>,
}

/// Point-in-time copy of the board, taken under the lock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub slot_to_card: Vec<Option<CardId>>,
    pub card_to_slot: Vec<Option<Slot>>,
    pub tokens: Vec<Vec<Slot>>,
}

impl BoardSnapshot {
    /// Whether the two card maps are exact inverses of each other.
    #[must_use]
    pub fn check_bijection(&self) -> bool {
        let forward = self.slot_to_card.iter().enumerate().all(|(slot, card)| match card {
            Some(card) => self.card_to_slot.get(card.index()) == Some(&Some(Slot::new(slot as u16))),
            None => true,
        });
        let backward = self.card_to_slot.iter().enumerate().all(|(card, slot)| match slot {
            Some(slot) => {
                self.slot_to_card.get(slot.index()) == Some(&Some(CardId::new(card as u16)))
            }
            None => true,
        });
        forward && backward
    }

    #[must_use]
    pub fn card_count(&self) -> usize {
        self.slot_to_card.iter().flatten().count()
    }
}

#[derive(Debug)]
struct BoardState {
    slot_to_card: Vec<Option<CardId>>,
    card_to_slot: Vec<Option<Slot>>,
    tokens: PlayerMap<TokenSet>,
}

impl BoardState {
    fn check_slot(&self, slot: Slot) -> Result<(), BoardError> {
        if slot.index() < self.slot_to_card.len() {
            Ok(())
        } else {
            Err(BoardError::SlotOutOfRange { slot, board_size: self.slot_to_card.len() })
        }
    }

    fn check_card(&self, card: CardId) -> Result<(), BoardError> {
        if card.index() < self.card_to_slot.len() {
            Ok(())
        } else {
            Err(BoardError::CardOutOfRange { card, deck_size: self.card_to_slot.len() })
        }
    }

    fn card_at(&self, slot: Slot) -> Option<CardId> {
        self.slot_to_card.get(slot.index()).copied().flatten()
    }

    fn take_card(&mut self, slot: Slot) -> Result<CardId, BoardError> {
        self.check_slot(slot)?;
        let card = self.slot_to_card[slot.index()].take().ok_or(BoardError::SlotEmpty(slot))?;
        self.card_to_slot[card.index()] = None;
        Ok(card)
    }
}

/// Cards, tokens, the access gate and the claim queue shared by every unit.
pub struct Board {
    state: Mutex<BoardState>,
    gate: AccessGate,
    claims: BoundedQueue<PlayerId>,
    display: Arc<dyn DisplaySink>,
    evaluator: Arc<dyn SetEvaluator>,
    delay: Duration,
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("state", &self.state)
            .field("gate", &self.gate)
            .field("claims", &self.claims)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl Board {
    /// Empty board sized for `config`, with a claim queue holding one entry
    /// per player.
    pub fn new(
        config: &GameConfig,
        display: Arc<dyn DisplaySink>,
        evaluator: Arc<dyn SetEvaluator>,
    ) -> Self {
        let player_count = config.player_count();
        Self {
            state: Mutex::new(BoardState {
                slot_to_card: vec![None; config.board_size],
                card_to_slot: vec![None; config.deck_size],
                tokens: PlayerMap::with_default(player_count),
            }),
            gate: AccessGate::default(),
            claims: BoundedQueue::new(player_count),
            display,
            evaluator,
            delay: config.board_delay(),
        }
    }

    // Every operation restores the bijection before releasing the lock, so
    // the state behind a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn pause(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }

    #[must_use]
    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    /// Players waiting for a verdict, in submission order.
    #[must_use]
    pub fn claims(&self) -> &BoundedQueue<PlayerId> {
        &self.claims
    }

    #[must_use]
    pub fn display(&self) -> &Arc<dyn DisplaySink> {
        &self.display
    }

    #[must_use]
    pub fn evaluator(&self) -> &Arc<dyn SetEvaluator> {
        &self.evaluator
    }

    #[must_use]
    pub fn board_size(&self) -> usize {
        self.lock().slot_to_card.len()
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.lock().tokens.player_count()
    }

    /// Put `card` on the empty `slot` after the placement delay.
    pub fn place_card(&self, card: CardId, slot: Slot) -> Result<(), BoardError> {
        let mut state = self.lock();
        state.check_slot(slot)?;
        state.check_card(card)?;
        if let Some(current) = state.card_at(slot) {
            return Err(BoardError::SlotOccupied { slot, card: current });
        }
        if let Some(at) = state.card_to_slot[card.index()] {
            return Err(BoardError::CardAlreadyPlaced { card, slot: at });
        }

        self.pause();
        state.slot_to_card[slot.index()] = Some(card);
        state.card_to_slot[card.index()] = Some(slot);
        self.display.place_card(card, slot);
        Ok(())
    }

    /// Take the card off `slot` after the placement delay.
    ///
    /// Tokens on the slot are left in place.
    pub fn remove_card(&self, slot: Slot) -> Result<CardId, BoardError> {
        let mut state = self.lock();
        state.check_slot(slot)?;
        if state.card_at(slot).is_none() {
            return Err(BoardError::SlotEmpty(slot));
        }

        self.pause();
        let card = state.take_card(slot)?;
        self.display.remove_card(slot);
        Ok(card)
    }

    /// Remove the card on `slot` together with every player's token on it.
    pub fn retire_card(&self, slot: Slot) -> Result<CardId, BoardError> {
        let mut state = self.lock();
        state.check_slot(slot)?;
        if state.card_at(slot).is_none() {
            return Err(BoardError::SlotEmpty(slot));
        }

        for (player, tokens) in state.tokens.iter_mut() {
            if tokens.remove(slot) {
                self.display.remove_token(player, slot);
            }
        }

        self.pause();
        let card = state.take_card(slot)?;
        self.display.remove_card(slot);
        Ok(card)
    }

    /// Mark `slot` for `player`.
    ///
    /// Does nothing if the slot holds no card, the player already has a token
    /// there or already holds three. Returns the player's new token count when
    /// a token was placed.
    pub fn place_token(&self, player: PlayerId, slot: Slot) -> Option<usize> {
        let mut state = self.lock();
        state.card_at(slot)?;
        let tokens = state.tokens.get_mut(player)?;
        if !tokens.insert(slot) {
            return None;
        }
        let count = tokens.len();
        self.display.place_token(player, slot);
        Some(count)
    }

    /// Take `player`'s token off `slot`. Returns whether one was there.
    pub fn remove_token(&self, player: PlayerId, slot: Slot) -> bool {
        let mut state = self.lock();
        let removed = state.tokens.get_mut(player).is_some_and(|tokens| tokens.remove(slot));
        if removed {
            self.display.remove_token(player, slot);
        }
        removed
    }

    /// Empty every player's tokens.
    pub fn clear_all_tokens(&self) {
        let mut state = self.lock();
        for (_, tokens) in state.tokens.iter_mut() {
            tokens.clear();
        }
        self.display.remove_all_tokens();
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.lock().slot_to_card.iter().flatten().count()
    }

    #[must_use]
    pub fn card_at(&self, slot: Slot) -> Option<CardId> {
        self.lock().card_at(slot)
    }

    #[must_use]
    pub fn slot_of(&self, card: CardId) -> Option<Slot> {
        self.lock().card_to_slot.get(card.index()).copied().flatten()
    }

    /// `player`'s tokens in placement order. Empty for unknown players.
    #[must_use]
    pub fn tokens(&self, player: PlayerId) -> Vec<Slot> {
        self.lock()
            .tokens
            .get(player)
            .map(|tokens| tokens.as_slice().to_vec())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn token_count(&self, player: PlayerId) -> usize {
        self.lock().tokens.get(player).map_or(0, TokenSet::len)
    }

    /// Slots without a card, ascending.
    #[must_use]
    pub fn empty_slots(&self) -> Vec<Slot> {
        let state = self.lock();
        Slot::all(state.slot_to_card.len()).filter(|&slot| state.card_at(slot).is_none()).collect()
    }

    /// Slots holding a card, ascending.
    #[must_use]
    pub fn occupied_slots(&self) -> Vec<Slot> {
        let state = self.lock();
        Slot::all(state.slot_to_card.len()).filter(|&slot| state.card_at(slot).is_some()).collect()
    }

    /// Cards on the board in slot order.
    #[must_use]
    pub fn cards_on_board(&self) -> Vec<CardId> {
        self.lock().slot_to_card.iter().flatten().copied().collect()
    }

    /// Resolve `player`'s claim against the board as it is now.
    #[must_use]
    pub fn claim_cards(&self, player: PlayerId) -> ClaimCheck {
        let state = self.lock();
        let Some(slots) = state.tokens.get(player).and_then(TokenSet::as_full) else {
            return ClaimCheck::Stale;
        };
        let [a, b, c] = slots.map(|slot| state.card_at(slot));
        match (a, b, c) {
            (Some(a), Some(b), Some(c)) => ClaimCheck::Ready { slots, cards: [a, b, c] },
            _ => ClaimCheck::Stale,
        }
    }

    /// Every set currently on the board, logged and returned.
    pub fn hints(&self) -> Vec<Hint> {
        let (cards, slots_of): (Vec<CardId>, Vec<Option<Slot>>) = {
            let state = self.lock();
            let cards: Vec<CardId> = state.slot_to_card.iter().flatten().copied().collect();
            let slots = cards.iter().map(|card| state.card_to_slot[card.index()]).collect();
            (cards, slots)
        };
        let slot_of = |card: CardId| {
            cards.iter().position(|&c| c == card).and_then(|index| slots_of[index])
        };

        let mut hints = Vec::new();
        for set in self.evaluator.find_sets(&cards, usize::MAX) {
            let mut placed: Vec<(Slot, CardId)> = Vec::with_capacity(SET_SIZE);
            for card in set {
                if let Some(slot) = slot_of(card) {
                    placed.push((slot, card));
                }
            }
            placed.sort_unstable();
            let &[(s0, c0), (s1, c1), (s2, c2)] = placed.as_slice() else {
                continue;
            };
            let cards = [c0, c1, c2];
            let hint = Hint {
                slots: [s0, s1, s2],
                cards,
                features: self.evaluator.card_features(&cards),
            };
            info!(slots = ?hint.slots, features = ?hint.features, "hint");
            hints.push(hint);
        }
        hints
    }

    /// Copy of the full board state.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        let state = self.lock();
        BoardSnapshot {
            slot_to_card: state.slot_to_card.clone(),
            card_to_slot: state.card_to_slot.clone(),
            tokens: state.tokens.values().map(|tokens| tokens.as_slice().to_vec()).collect(),
        }
    }
}
