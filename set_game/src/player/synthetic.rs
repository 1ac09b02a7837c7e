//! Synthetic key presses for computer players.

use super::actor::Player;
use rand::Rng;
use std::sync::Arc;

/// Presses uniformly random slots on behalf of a computer player until the
/// player is terminated. Blocks on the player's full input queue, which is
/// the only pacing unless a computer delay is configured.
pub struct SyntheticInput {
    player: Arc<Player>,
}

impl SyntheticInput {
    pub fn new(player: Arc<Player>) -> Self {
        Self { player }
    }

    /// Thread body of `computer-<id>`.
    pub fn run(self) {
        let id = self.player.id();
        log::info!("thread computer-{id} starting");

        let mut rng = rand::rng();
        let table_size = self.player.table_size();
        let delay = self.player.computer_delay();

        while !self.player.is_terminated() {
            let slot = rng.random_range(0..table_size);
            if !self.player.feed(slot) {
                break;
            }
            if !delay.is_zero() && !self.player.pause(delay) {
                break;
            }
        }

        log::info!("thread computer-{id} terminated");
    }
}
