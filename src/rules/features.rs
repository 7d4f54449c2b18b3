//! The attribute-matching rule.
//!
//! A card id encodes `feature_count` features, each a digit in base
//! `feature_size`. Three cards form a set when, for every feature, the three
//! values are either all equal or all different.

use rustc_hash::FxHashSet;

use super::{SetEvaluator, SET_SIZE};
use crate::core::{CardId, GameConfig};

/// Standard attribute-matching rule over a `feature_size ^ feature_count` deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeatureRules {
    feature_count: usize,
    feature_size: usize,
}

impl Default for FeatureRules {
    /// Four features with three values each: the 81-card deck.
    fn default() -> Self {
        Self::new(4, 3)
    }
}

impl FeatureRules {
    #[must_use]
    pub fn new(feature_count: usize, feature_size: usize) -> Self {
        assert!(feature_size >= SET_SIZE, "Feature size must allow {SET_SIZE} distinct values");
        assert!(feature_size <= usize::from(u8::MAX), "Feature values must fit in a byte");
        Self { feature_count, feature_size }
    }

    /// Rules matching the feature layout of `config`.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.feature_count, config.feature_size)
    }

    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    #[must_use]
    pub fn feature_size(&self) -> usize {
        self.feature_size
    }

    /// Feature values of `card`, least significant feature first.
    #[must_use]
    pub fn features(&self, card: CardId) -> Vec<u8> {
        let mut rest = card.index();
        (0..self.feature_count)
            .map(|_| {
                let digit = rest % self.feature_size;
                rest /= self.feature_size;
                digit as u8
            })
            .collect()
    }

    /// Card with the given feature values, or `None` when the id does not
    /// fit a card index.
    fn encode(&self, features: &[u8]) -> Option<CardId> {
        let id = features.iter().rev().try_fold(0usize, |acc, &digit| {
            acc.checked_mul(self.feature_size)?.checked_add(usize::from(digit))
        })?;
        u16::try_from(id).ok().map(CardId::new)
    }

    /// Every card that completes a set with `a` and `b`.
    ///
    /// With three values per feature there is exactly one. Completions beyond
    /// the card id range cannot be dealt and are skipped.
    fn completions(&self, a: CardId, b: CardId) -> Vec<CardId> {
        let fa = self.features(a);
        let fb = self.features(b);

        let mut partial: Vec<Vec<u8>> = vec![Vec::with_capacity(self.feature_count)];
        for (&x, &y) in fa.iter().zip(&fb) {
            let choices: Vec<u8> = if x == y {
                vec![x]
            } else {
                (0..self.feature_size as u8).filter(|&v| v != x && v != y).collect()
            };
            partial = partial
                .into_iter()
                .flat_map(|prefix| {
                    choices.iter().map(move |&v| {
                        let mut next = prefix.clone();
                        next.push(v);
                        next
                    })
                })
                .collect();
        }

        partial.iter().filter_map(|features| self.encode(features)).collect()
    }
}

impl SetEvaluator for FeatureRules {
    fn find_sets(&self, cards: &[CardId], limit: usize) -> Vec<[CardId; SET_SIZE]> {
        let mut sets = Vec::new();
        if limit == 0 {
            return sets;
        }

        let mut sorted = cards.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        let present: FxHashSet<CardId> = sorted.iter().copied().collect();

        for (i, &a) in sorted.iter().enumerate() {
            for &b in &sorted[i + 1..] {
                for c in self.completions(a, b) {
                    // Report each set once: from its two smallest cards.
                    if c > b && present.contains(&c) {
                        sets.push([a, b, c]);
                        if sets.len() >= limit {
                            return sets;
                        }
                    }
                }
            }
        }
        sets
    }

    fn test_set(&self, cards: &[CardId; SET_SIZE]) -> bool {
        let [a, b, c] = cards.map(|card| self.features(card));
        a.iter().zip(&b).zip(&c).all(|((&x, &y), &z)| {
            let all_equal = x == y && y == z;
            let all_distinct = x != y && y != z && x != z;
            all_equal || all_distinct
        })
    }

    fn card_features(&self, cards: &[CardId]) -> Vec<Vec<u8>> {
        cards.iter().map(|&card| self.features(card)).collect()
    }
}
