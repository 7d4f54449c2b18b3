//! The part of a player visible to the rest of the game.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use tracing::trace;

use crate::board::Board;
use crate::core::{PlayerId, Slot};
use crate::rules::SET_SIZE;
use crate::sync::{BoundedQueue, DeliverError, FreezeTimer, PushError, Shutdown, Verdict, VerdictMailbox};

/// Handle shared between a player's own thread, its action source and the
/// dealer.
///
/// The player thread is the only consumer of the action queue and the only
/// writer of the score. The dealer only delivers verdicts, wakes freezes and
/// terminates.
#[derive(Debug)]
pub struct PlayerShared {
    id: PlayerId,
    human: bool,
    board: Arc<Board>,
    accepting: AtomicBool,
    score: AtomicU32,
    claims: AtomicU32,
    verdicts: AtomicU32,
    actions: BoundedQueue<Slot>,
    mailbox: VerdictMailbox,
    pub(super) shutdown: Shutdown,
    pub(super) freeze: FreezeTimer,
}

impl PlayerShared {
    pub fn new(id: PlayerId, human: bool, board: Arc<Board>) -> Self {
        Self {
            id,
            human,
            board,
            accepting: AtomicBool::new(true),
            score: AtomicU32::new(0),
            claims: AtomicU32::new(0),
            verdicts: AtomicU32::new(0),
            actions: BoundedQueue::new(SET_SIZE),
            mailbox: VerdictMailbox::new(),
            shutdown: Shutdown::new(),
            freeze: FreezeTimer::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Whether actions come from outside rather than an action generator.
    #[must_use]
    pub fn is_human(&self) -> bool {
        self.human
    }

    #[must_use]
    pub fn board(&self) -> &Arc<Board> {
        &self.board
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score.load(Ordering::SeqCst)
    }

    pub(super) fn add_point(&self) -> u32 {
        self.score.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Claims pushed onto the claim queue so far.
    #[must_use]
    pub fn claims_submitted(&self) -> u32 {
        self.claims.load(Ordering::SeqCst)
    }

    /// Verdicts taken from the mailbox so far. Trails
    /// [`claims_submitted`](Self::claims_submitted) by at most one.
    #[must_use]
    pub fn verdicts_received(&self) -> u32 {
        self.verdicts.load(Ordering::SeqCst)
    }

    pub(super) fn record_claim(&self) {
        self.claims.fetch_add(1, Ordering::SeqCst);
    }

    pub(super) fn record_verdict(&self) {
        self.verdicts.fetch_add(1, Ordering::SeqCst);
    }

    /// Whether the player takes new actions: false from claim submission until
    /// its verdict, including any freeze, has been served.
    #[must_use]
    pub fn is_accepting(&self) -> bool {
        self.accepting.load(Ordering::SeqCst)
    }

    pub(super) fn set_accepting(&self, accepting: bool) {
        self.accepting.store(accepting, Ordering::SeqCst);
    }

    /// Whether the player may act right now, as far as the hints tell.
    #[must_use]
    pub fn can_act(&self) -> bool {
        self.board.gate().is_open() && self.is_accepting()
    }

    /// Ask the player to toggle its token on `slot`.
    ///
    /// Never blocks. Returns `false` when the request was ignored: the gate is
    /// closed, the player is not accepting actions, three requests are already
    /// pending, or the player has terminated.
    pub fn request_action(&self, slot: Slot) -> bool {
        if !self.can_act() {
            return false;
        }
        match self.actions.try_push(slot) {
            Ok(()) => true,
            Err(PushError::Full(slot)) => {
                trace!(player = %self.id, %slot, "action queue full, dropping");
                false
            }
            Err(PushError::Closed(_)) => false,
        }
    }

    /// Number of desired actions waiting to be processed.
    #[must_use]
    pub fn pending_actions(&self) -> usize {
        self.actions.len()
    }

    pub(super) fn actions(&self) -> &BoundedQueue<Slot> {
        &self.actions
    }

    /// Where the dealer leaves this player's verdicts.
    #[must_use]
    pub fn mailbox(&self) -> &VerdictMailbox {
        &self.mailbox
    }

    /// Answer the player's outstanding claim.
    pub fn deliver(&self, verdict: Verdict) -> Result<(), DeliverError> {
        self.mailbox.deliver(verdict)
    }

    /// Cut a running point or penalty freeze short. Returns whether the player
    /// was frozen.
    pub fn wake(&self) -> bool {
        self.freeze.wake()
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.freeze.is_frozen()
    }

    /// Stop the player and its action generator, releasing every wait.
    pub fn terminate(&self) {
        self.shutdown.trigger();
        self.actions.close();
        self.mailbox.close();
        self.freeze.terminate();
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.shutdown.is_triggered()
    }
}
