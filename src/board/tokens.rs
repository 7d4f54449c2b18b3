use smallvec::SmallVec;

use crate::core::Slot;
use crate::rules::SET_SIZE;

/// One player's tokens, in placement order.
///
/// Never holds more than [`SET_SIZE`] slots or the same slot twice. Stored
/// inline, since a full set is exactly three slots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenSet {
    slots: SmallVec<[Slot; SET_SIZE]>,
}

impl TokenSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.slots.len() >= SET_SIZE
    }

    #[must_use]
    pub fn contains(&self, slot: Slot) -> bool {
        self.slots.contains(&slot)
    }

    /// Add `slot`. Returns `false` if the set is full or already holds it.
    pub fn insert(&mut self, slot: Slot) -> bool {
        if self.is_full() || self.contains(slot) {
            return false;
        }
        self.slots.push(slot);
        true
    }

    /// Remove `slot`, keeping the order of the rest.
    pub fn remove(&mut self, slot: Slot) -> bool {
        match self.slots.iter().position(|&s| s == slot) {
            Some(index) => {
                self.slots.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Slot] {
        &self.slots
    }

    pub fn iter(&self) -> impl Iterator<Item = Slot> + '_ {
        self.slots.iter().copied()
    }

    /// The three slots of a complete set.
    #[must_use]
    pub fn as_full(&self) -> Option<[Slot; SET_SIZE]> {
        match self.slots.as_slice() {
            &[a, b, c] => Some([a, b, c]),
            _ => None,
        }
    }
}
