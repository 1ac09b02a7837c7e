//! Match validity rules.
//!
//! The dealer only needs three pure functions from the rules: enumerate
//! matches, test one candidate, and describe cards as feature vectors for
//! hints. [`ClassicRules`] implements the standard encoding where a card id
//! is read as `feature_count` digits in base `feature_size`.

use super::{config::GameConfig, entities::Card};

/// Pure match rules, shared read-only by every actor
pub trait Rules: Send + Sync {
    /// Every match that can be formed from `cards`, stopping after `limit`
    fn find_sets(&self, cards: &[Card], limit: usize) -> Vec<Vec<Card>>;

    /// Whether `cards` form a match
    fn test_set(&self, cards: &[Card]) -> bool;

    /// Feature vector of each card, in input order
    fn cards_to_features(&self, cards: &[Card]) -> Vec<Vec<usize>>;
}

/// A selection matches when, for every feature, the values are either all
/// equal or all distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassicRules {
    feature_size: usize,
    feature_count: usize,
}

impl ClassicRules {
    pub fn new(feature_size: usize, feature_count: usize) -> Self {
        Self {
            feature_size,
            feature_count,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.feature_size, config.feature_count)
    }

    fn features(&self, card: Card) -> Vec<usize> {
        let mut rest = card;
        (0..self.feature_count)
            .map(|_| {
                let value = rest % self.feature_size;
                rest /= self.feature_size;
                value
            })
            .collect()
    }

    fn collect_sets(
        &self,
        cards: &[Card],
        start: usize,
        chosen: &mut Vec<Card>,
        limit: usize,
        found: &mut Vec<Vec<Card>>,
    ) {
        if found.len() >= limit {
            return;
        }
        if chosen.len() == self.feature_size {
            if self.test_set(chosen) {
                found.push(chosen.clone());
            }
            return;
        }
        let missing = self.feature_size - chosen.len();
        for i in start..cards.len() {
            if cards.len() - i < missing || found.len() >= limit {
                break;
            }
            chosen.push(cards[i]);
            self.collect_sets(cards, i + 1, chosen, limit, found);
            chosen.pop();
        }
    }
}

impl Default for ClassicRules {
    fn default() -> Self {
        Self::new(3, 4)
    }
}

impl Rules for ClassicRules {
    fn find_sets(&self, cards: &[Card], limit: usize) -> Vec<Vec<Card>> {
        let mut found = Vec::new();
        if limit > 0 {
            self.collect_sets(cards, 0, &mut Vec::new(), limit, &mut found);
        }
        found
    }

    fn test_set(&self, cards: &[Card]) -> bool {
        if cards.len() != self.feature_size {
            return false;
        }
        for (i, card) in cards.iter().enumerate() {
            if cards[..i].contains(card) {
                return false;
            }
        }

        let features = self.cards_to_features(cards);
        (0..self.feature_count).all(|f| {
            let mut values: Vec<usize> = features.iter().map(|v| v[f]).collect();
            values.sort_unstable();
            values.dedup();
            values.len() == 1 || values.len() == self.feature_size
        })
    }

    fn cards_to_features(&self, cards: &[Card]) -> Vec<Vec<usize>> {
        cards.iter().map(|&card| self.features(card)).collect()
    }
}
