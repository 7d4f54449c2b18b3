//! The dealer loop.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use tracing::{debug, error, info, warn};

use super::timer::RoundTimer;
use crate::board::{Board, ClaimCheck};
use crate::core::{BoardError, CardId, GameConfig, GameError, GameRng, PlayerId, PlayerMap};
use crate::game::GameSummary;
use crate::player::{PlayerShared, PlayerUnit};
use crate::sync::{PopError, Shutdown, Verdict};

/// The single orchestrator: deals, runs the round clock, judges claims and
/// refreshes the board until no set is left in the deck.
///
/// The dealer owns the deck and is the only unit that moves cards. It starts
/// every player thread and joins all of them before returning.
pub struct Dealer {
    config: GameConfig,
    board: Arc<Board>,
    players: PlayerMap<Arc<PlayerShared>>,
    deck: Vec<CardId>,
    rng: GameRng,
    timer: RoundTimer,
    stop: Arc<Shutdown>,
    rounds: u32,
    undelivered: u32,
}

impl Dealer {
    /// Dealer holding the full deck. `stop` ends the game from outside; it
    /// must be paired with closing the board's claim queue, see
    /// [`GameHandle::terminate`](crate::game::GameHandle::terminate).
    pub fn new(
        config: GameConfig,
        board: Arc<Board>,
        players: PlayerMap<Arc<PlayerShared>>,
        rng: GameRng,
        stop: Arc<Shutdown>,
    ) -> Self {
        let deck = CardId::all(config.deck_size).collect();
        let timer = RoundTimer::new(&config, Instant::now());
        Self { config, board, players, deck, rng, timer, stop, rounds: 0, undelivered: 0 }
    }

    /// Run on a `dealer` thread.
    pub fn spawn(self) -> std::io::Result<JoinHandle<Result<GameSummary, GameError>>> {
        thread::Builder::new().name("dealer".into()).spawn(move || self.run())
    }

    /// Play the whole game: start the players, run rounds until the deck is
    /// out of sets or the game is stopped, then shut everything down.
    pub fn run(mut self) -> Result<GameSummary, GameError> {
        info!(
            players = self.players.player_count(),
            board_size = self.config.board_size,
            deck_size = self.config.deck_size,
            "dealer started"
        );

        let units = self.spawn_players()?;
        let played = self.play();
        if let Err(err) = &played {
            error!(%err, "board defect, ending game");
        }
        let summary = self.finish(units);
        played?;
        summary
    }

    fn is_terminated(&self) -> bool {
        self.stop.is_triggered()
    }

    fn spawn_players(&mut self) -> Result<Vec<(PlayerId, JoinHandle<()>)>, GameError> {
        let mut units = Vec::with_capacity(self.players.player_count());
        for (id, shared) in self.players.iter() {
            let unit = PlayerUnit::new(Arc::clone(shared), &self.config, self.rng.fork());
            match unit.spawn() {
                Ok(handle) => units.push((id, handle)),
                Err(err) => {
                    error!(player = %id, %err, "failed to spawn player");
                    self.stop_players(units);
                    return Err(GameError::Spawn(err));
                }
            }
        }
        Ok(units)
    }

    fn play(&mut self) -> Result<(), BoardError> {
        while !self.is_terminated() && self.deck_has_set() {
            self.rounds += 1;
            info!(round = self.rounds, deck = self.deck.len(), "round started");

            self.deal()?;
            self.reset_timer();
            self.round_loop()?;
            self.end_round()?;
        }
        Ok(())
    }

    fn deck_has_set(&self) -> bool {
        self.board.evaluator().has_set(&self.deck)
    }

    /// Fill the empty slots, visited in random order, with random cards.
    fn deal(&mut self) -> Result<(), BoardError> {
        let mut slots = self.board.empty_slots();
        self.rng.shuffle(&mut slots);

        let mut dealt = 0;
        for slot in slots {
            let Some(card) = self.rng.take_random(&mut self.deck) else {
                break;
            };
            if let Err(err) = self.board.place_card(card, slot) {
                self.deck.push(card);
                return Err(err);
            }
            dealt += 1;
        }
        debug!(dealt, deck = self.deck.len(), "dealt");

        if self.config.hints {
            self.board.hints();
        }
        Ok(())
    }

    fn reset_timer(&mut self) {
        self.timer.reset(Instant::now());
        self.board.display().set_countdown(self.timer.duration().as_millis() as u64, false);
    }

    fn update_countdown(&self) {
        let now = Instant::now();
        let remaining = self.timer.remaining(now);
        self.board
            .display()
            .set_countdown(remaining.as_millis() as u64, self.timer.is_warning(now));
    }

    fn round_loop(&mut self) -> Result<(), BoardError> {
        loop {
            let now = Instant::now();
            if self.is_terminated() || self.timer.is_expired(now) {
                return Ok(());
            }

            self.board.gate().open();
            match self.board.claims().pop_timeout(self.timer.tick(now)) {
                Ok(player) => self.judge(player)?,
                Err(PopError::Timeout) => {
                    if self.board.gate().is_open() {
                        self.update_countdown();
                    }
                }
                Err(PopError::Closed) => return Ok(()),
            }
        }
    }

    /// Answer one claim.
    fn judge(&mut self, player: PlayerId) -> Result<(), BoardError> {
        let (slots, cards) = match self.board.claim_cards(player) {
            ClaimCheck::Ready { slots, cards } => (slots, cards),
            ClaimCheck::Stale => {
                debug!(%player, "stale claim");
                self.deliver(player, Verdict::Withdrawn);
                return Ok(());
            }
        };

        self.board.gate().close();
        if self.board.evaluator().test_set(&cards) {
            info!(%player, ?cards, "set approved");
            self.deliver(player, Verdict::Approved);
            for slot in slots {
                self.board.retire_card(slot)?;
            }
            self.deal()?;
            self.reset_timer();
        } else {
            info!(%player, ?cards, "set rejected");
            self.deliver(player, Verdict::Rejected);
        }
        self.board.gate().open();
        Ok(())
    }

    fn deliver(&mut self, player: PlayerId, verdict: Verdict) {
        let Some(shared) = self.players.get(player) else {
            warn!(%player, ?verdict, "verdict for unknown player");
            self.undelivered += 1;
            return;
        };
        if let Err(err) = shared.deliver(verdict) {
            warn!(%player, ?verdict, %err, "verdict not delivered");
            self.undelivered += 1;
        }
    }

    fn end_round(&mut self) -> Result<(), BoardError> {
        self.board.gate().close();
        self.update_countdown();

        let woken = self.players.values().filter(|player| player.wake()).count();
        self.clear_board()?;
        self.board.clear_all_tokens();
        let withdrawn = self.withdraw_claims();

        info!(round = self.rounds, woken, withdrawn, deck = self.deck.len(), "round ended");
        Ok(())
    }

    /// Return every card on the board to the deck, slots in random order.
    fn clear_board(&mut self) -> Result<(), BoardError> {
        let mut slots = self.board.occupied_slots();
        self.rng.shuffle(&mut slots);
        for slot in slots {
            let card = self.board.remove_card(slot)?;
            self.deck.push(card);
        }
        Ok(())
    }

    /// Answer every queued claim with `Withdrawn`.
    fn withdraw_claims(&mut self) -> usize {
        let pending = self.board.claims().drain();
        for &player in &pending {
            self.deliver(player, Verdict::Withdrawn);
        }
        pending.len()
    }

    /// Terminate and join player threads in reverse seating order. Returns the
    /// first player, in that order, whose thread panicked.
    fn stop_players(&self, units: Vec<(PlayerId, JoinHandle<()>)>) -> Option<PlayerId> {
        let mut panicked = None;
        for (id, handle) in units.into_iter().rev() {
            self.players[id].terminate();
            if handle.join().is_err() {
                error!(player = %id, "player thread panicked");
                panicked.get_or_insert(id);
            }
        }
        panicked
    }

    /// Tear the game down and tally the winners.
    ///
    /// Players are terminated and joined in reverse seating order. Scores are
    /// read after every player has exited, so a point awarded by the last
    /// verdict still counts.
    fn finish(mut self, units: Vec<(PlayerId, JoinHandle<()>)>) -> Result<GameSummary, GameError> {
        self.board.gate().close();
        self.board.claims().close();

        let cleared = self.clear_board();
        if let Err(err) = &cleared {
            error!(%err, "failed to clear the board");
        }
        self.withdraw_claims();
        self.board.clear_all_tokens();

        let panicked = self.stop_players(units);

        let scores = PlayerMap::new(self.players.player_count(), |id| self.players[id].score());
        let best = scores.values().copied().max().unwrap_or(0);
        let winners: Vec<PlayerId> =
            scores.iter().filter(|&(_, &score)| score == best).map(|(id, _)| id).collect();

        self.board.display().announce_winners(&winners);
        info!(rounds = self.rounds, ?winners, best, undelivered = self.undelivered, "game over");

        cleared?;
        if let Some(id) = panicked {
            return Err(GameError::UnitPanicked(format!("player-{}", id.0)));
        }
        Ok(GameSummary { scores, winners, rounds: self.rounds, undelivered: self.undelivered })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Slot;
    use crate::display::{DisplayEvent, EventLog};
    use crate::rules::FeatureRules;

    fn s(slot: u16) -> Slot {
        Slot::new(slot)
    }

    fn c(card: u16) -> CardId {
        CardId::new(card)
    }

    fn dealer(humans: usize) -> (Dealer, Arc<EventLog>) {
        let config = GameConfig::default().with_players(humans, 0).with_board_delay(0);
        let log = Arc::new(EventLog::new());
        let board = Arc::new(Board::new(&config, log.clone(), Arc::new(FeatureRules::default())));
        let players = PlayerMap::new(config.player_count(), |id| {
            Arc::new(PlayerShared::new(id, true, Arc::clone(&board)))
        });
        let dealer = Dealer::new(
            config,
            board,
            players,
            GameRng::new(11),
            Arc::new(Shutdown::new()),
        );
        (dealer, log)
    }

    /// Put specific cards on the board, taking them out of the deck.
    fn lay_out(dealer: &mut Dealer, cards: &[(u16, u16)]) {
        for &(slot, card) in cards {
            dealer.deck.retain(|&d| d != c(card));
            dealer.board.place_card(c(card), s(slot)).unwrap();
        }
    }

    fn token(dealer: &Dealer, player: u8, slots: &[u16]) {
        for &slot in slots {
            dealer.board.place_token(PlayerId::new(player), s(slot));
        }
    }

    fn claim(dealer: &Dealer, player: u8) {
        dealer.board.claims().try_push(PlayerId::new(player)).unwrap();
    }

    fn verdict(dealer: &Dealer, player: u8) -> Option<Verdict> {
        dealer.players[PlayerId::new(player)].mailbox().try_take()
    }

    #[test]
    fn test_deal_fills_every_slot() {
        let (mut dealer, _log) = dealer(1);
        dealer.deal().unwrap();

        assert_eq!(dealer.board.card_count(), 12);
        assert_eq!(dealer.deck.len(), 81 - 12);
        assert!(dealer.board.snapshot().check_bijection());
    }

    #[test]
    fn test_deal_stops_when_deck_runs_out() {
        let (mut dealer, _log) = dealer(1);
        dealer.deck.truncate(5);
        dealer.deal().unwrap();

        assert_eq!(dealer.board.card_count(), 5);
        assert!(dealer.deck.is_empty());
    }

    #[test]
    fn test_valid_claim_is_approved_and_replaced() {
        let (mut dealer, log) = dealer(1);
        lay_out(&mut dealer, &[(0, 0), (1, 1), (2, 2)]);
        token(&dealer, 0, &[0, 1, 2]);
        claim(&dealer, 0);

        let player = dealer.board.claims().try_pop().unwrap();
        dealer.judge(player).unwrap();

        assert_eq!(verdict(&dealer, 0), Some(Verdict::Approved));
        assert_eq!(dealer.board.token_count(PlayerId::new(0)), 0);
        for card in [0, 1, 2] {
            assert_eq!(dealer.board.slot_of(c(card)), None);
            assert!(!dealer.deck.contains(&c(card)));
        }
        // Refilled along with the rest of the empty board.
        assert_eq!(dealer.board.card_count(), 12);
        assert_eq!(log.countdowns().last(), Some(&60_000));
        assert!(dealer.board.gate().is_open());
    }

    #[test]
    fn test_invalid_claim_is_rejected() {
        let (mut dealer, _log) = dealer(1);
        lay_out(&mut dealer, &[(0, 0), (1, 1), (2, 3)]);
        token(&dealer, 0, &[0, 1, 2]);

        dealer.judge(PlayerId::new(0)).unwrap();

        assert_eq!(verdict(&dealer, 0), Some(Verdict::Rejected));
        assert_eq!(dealer.board.tokens(PlayerId::new(0)), vec![s(0), s(1), s(2)]);
        assert_eq!(dealer.board.card_count(), 3);
    }

    #[test]
    fn test_claim_with_removed_token_is_withdrawn() {
        let (mut dealer, _log) = dealer(1);
        lay_out(&mut dealer, &[(0, 0), (1, 1), (2, 2)]);
        token(&dealer, 0, &[0, 1, 2]);
        claim(&dealer, 0);
        dealer.board.remove_token(PlayerId::new(0), s(1));

        let player = dealer.board.claims().try_pop().unwrap();
        dealer.judge(player).unwrap();

        assert_eq!(verdict(&dealer, 0), Some(Verdict::Withdrawn));
        assert_eq!(dealer.board.card_count(), 3);
    }

    #[test]
    fn test_overlapping_claims_are_judged_in_order() {
        let (mut dealer, _log) = dealer(2);
        // {0,1,2} and {0,3,6} share card 0 on slot 0.
        lay_out(&mut dealer, &[(0, 0), (1, 1), (2, 2), (3, 3), (4, 6)]);
        token(&dealer, 0, &[0, 1, 2]);
        token(&dealer, 1, &[0, 3, 4]);
        claim(&dealer, 0);
        claim(&dealer, 1);

        let first = dealer.board.claims().try_pop().unwrap();
        assert_eq!(first, PlayerId::new(0));
        dealer.judge(first).unwrap();

        // Approval stripped the shared slot from the other claimant.
        assert_eq!(dealer.board.tokens(PlayerId::new(1)), vec![s(3), s(4)]);

        let second = dealer.board.claims().try_pop().unwrap();
        dealer.judge(second).unwrap();

        assert_eq!(verdict(&dealer, 0), Some(Verdict::Approved));
        assert_eq!(verdict(&dealer, 1), Some(Verdict::Withdrawn));
        assert!(dealer.board.snapshot().check_bijection());
    }

    #[test]
    fn test_end_round_resets_board() {
        let (mut dealer, log) = dealer(2);
        dealer.deal().unwrap();
        token(&dealer, 0, &[0, 1]);
        token(&dealer, 1, &[4, 5, 6]);
        claim(&dealer, 1);

        dealer.end_round().unwrap();

        assert_eq!(dealer.board.card_count(), 0);
        assert_eq!(dealer.deck.len(), 81);
        assert_eq!(dealer.board.token_count(PlayerId::new(0)), 0);
        assert!(dealer.board.claims().is_empty());
        assert_eq!(verdict(&dealer, 1), Some(Verdict::Withdrawn));
        assert!(!dealer.board.gate().is_open());
        assert!(log.events().contains(&DisplayEvent::TokensCleared));
    }

    #[test]
    fn test_finish_announces_everyone_on_zero() {
        let (dealer, log) = dealer(3);
        let summary = dealer.finish(Vec::new()).unwrap();

        let everyone: Vec<PlayerId> = PlayerId::all(3).collect();
        assert_eq!(summary.winners, everyone);
        assert_eq!(log.winners(), Some(everyone));
        assert!(summary.scores.values().all(|&score| score == 0));
        assert_eq!(summary.undelivered, 0);
    }

    #[test]
    fn test_second_verdict_for_one_player_is_counted() {
        let (mut dealer, _log) = dealer(1);
        lay_out(&mut dealer, &[(0, 0), (1, 1), (2, 3)]);
        token(&dealer, 0, &[0, 1, 2]);

        // Two claims from the same player without the first being taken.
        dealer.judge(PlayerId::new(0)).unwrap();
        dealer.judge(PlayerId::new(0)).unwrap();

        assert_eq!(verdict(&dealer, 0), Some(Verdict::Rejected));
        let summary = dealer.finish(Vec::new()).unwrap();
        assert_eq!(summary.undelivered, 1);
    }

    #[test]
    fn test_stop_players_reports_panicked_thread() {
        let (dealer, _log) = dealer(2);
        let quiet = thread::spawn(|| {});
        let broken = thread::spawn(|| panic!("player loop failed"));

        let units = vec![(PlayerId::new(0), quiet), (PlayerId::new(1), broken)];
        let panicked = dealer.stop_players(units);

        assert_eq!(panicked, Some(PlayerId::new(1)));
        assert!(dealer.players.values().all(|player| player.is_terminated()));
    }

    #[test]
    fn test_finish_fails_on_panicked_player() {
        let (dealer, log) = dealer(1);
        let broken = thread::spawn(|| panic!("player loop failed"));

        let err = dealer.finish(vec![(PlayerId::new(0), broken)]).unwrap_err();

        assert!(matches!(err, GameError::UnitPanicked(name) if name == "player-0"));
        assert!(log.winners().is_some());
    }
}
