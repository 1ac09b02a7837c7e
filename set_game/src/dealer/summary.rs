//! End-of-game summary.

use crate::game::entities::{PlayerId, Score};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the dealer reports once every actor has been joined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    /// Final score per player, indexed by id
    pub scores: Vec<Score>,
    /// Every player tied at the maximum score
    pub winners: Vec<PlayerId>,
    /// Rounds dealt
    pub rounds: u32,
    /// Submissions accepted as matches
    pub matches: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl GameSummary {
    pub fn is_tie(&self) -> bool {
        self.winners.len() > 1
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Every player whose score equals the maximum, ascending
pub fn winners(scores: &[Score]) -> Vec<PlayerId> {
    let Some(&best) = scores.iter().max() else {
        return Vec::new();
    };
    scores
        .iter()
        .enumerate()
        .filter(|&(_, &score)| score == best)
        .map(|(id, _)| id)
        .collect()
}
