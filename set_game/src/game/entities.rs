use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque card identifier in `0..deck_size`.
pub type Card = usize;

/// Index of a position on the table.
pub type Slot = usize;

/// Player identifier, starting from 0.
pub type PlayerId = usize;

/// Points are only ever added, one per accepted match.
pub type Score = u32;

/// A player's full selection, captured the moment its last token landed.
///
/// Cards and slots are parallel: `cards[i]` was on `slots[i]` when the
/// snapshot was taken. A submission is never modified once built.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Submission {
    player: PlayerId,
    cards: Vec<Card>,
    slots: Vec<Slot>,
}

impl Submission {
    pub fn new(player: PlayerId, cards: Vec<Card>, slots: Vec<Slot>) -> Self {
        debug_assert_eq!(cards.len(), slots.len());
        Self {
            player,
            cards,
            slots,
        }
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// `(card, slot)` pairs in selection order.
    pub fn pairs(&self) -> impl Iterator<Item = (Card, Slot)> + '_ {
        self.cards.iter().copied().zip(self.slots.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl fmt::Display for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "player {} cards {:?} at slots {:?}",
            self.player, self.cards, self.slots
        )
    }
}

/// The dealer's answer to one submission.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Verdict {
    /// The cards form a match: one point, then the point freeze.
    Accepted,
    /// The cards are still on the table but do not match: penalty freeze.
    Rejected,
    /// Some card left the table before the dealer got to it. No effect.
    Stale,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Stale => "stale",
        };
        write!(f, "{repr}")
    }
}
