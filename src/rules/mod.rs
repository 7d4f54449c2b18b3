//! Set evaluation.
//!
//! The board, players and dealer never interpret cards themselves; they ask a
//! [`SetEvaluator`] whether three cards match and which sets exist among a
//! group of cards. [`FeatureRules`] is the standard attribute-matching rule.

pub mod features;

pub use features::FeatureRules;

use crate::core::CardId;

/// Number of cards in a set.
pub const SET_SIZE: usize = 3;

/// Query service deciding which card triples form a set.
///
/// Shared read-only between the dealer (validation, deck checks) and the
/// board (hints), so implementations must be `Send + Sync`.
pub trait SetEvaluator: Send + Sync {
    /// Up to `limit` distinct sets among `cards`.
    ///
    /// Each set is reported once, in ascending card order.
    fn find_sets(&self, cards: &[CardId], limit: usize) -> Vec<[CardId; SET_SIZE]>;

    /// Whether `cards` form a set.
    fn test_set(&self, cards: &[CardId; SET_SIZE]) -> bool;

    /// Decode each card into its feature values, for display.
    fn card_features(&self, cards: &[CardId]) -> Vec<Vec<u8>>;

    /// Whether at least one set exists among `cards`.
    fn has_set(&self, cards: &[CardId]) -> bool {
        !self.find_sets(cards, 1).is_empty()
    }
}
