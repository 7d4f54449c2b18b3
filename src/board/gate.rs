use std::sync::atomic::{AtomicBool, Ordering};

/// Shared hint telling players whether they may act right now.
///
/// The dealer closes the gate while it rearranges the board and opens it
/// again afterwards. Reads may be stale: nothing depends on the gate for
/// safety, because every board operation is atomic on its own. Relaxed
/// ordering is enough for a flag that only steers behavior.
#[derive(Debug)]
pub struct AccessGate(AtomicBool);

impl Default for AccessGate {
    /// Gates start closed; the dealer opens them once the first round starts.
    fn default() -> Self {
        Self(AtomicBool::new(false))
    }
}

impl AccessGate {
    #[must_use]
    pub fn new(open: bool) -> Self {
        Self(AtomicBool::new(open))
    }

    pub fn open(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn close(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
