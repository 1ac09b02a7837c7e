//! Game bootstrap and the external handle.

use crate::{
    dealer::{Dealer, GameSummary},
    game::{
        config::GameConfig,
        entities::{PlayerId, Score, Slot},
        errors::{GameError, GameResult},
        rules::Rules,
        ui::Ui,
    },
    player::Player,
    sync::{Shutdown, SubmissionQueue},
};
use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

/// Cloneable handle for routing input into a running game
#[derive(Clone)]
pub struct GameHandle {
    config: Arc<GameConfig>,
    players: Arc<[Arc<Player>]>,
    submissions: Arc<SubmissionQueue>,
    shutdown: Arc<Shutdown>,
}

impl GameHandle {
    /// Route a key press to `player`'s input queue
    ///
    /// # Arguments
    ///
    /// * `player` - Player id
    /// * `slot` - Pressed slot
    ///
    /// # Returns
    ///
    /// * `GameResult<bool>` - Whether the press was queued; presses are
    ///   dropped while the player is frozen or the table is closed
    ///
    /// # Errors
    ///
    /// * `GameError::UnknownPlayer` - No player with this id
    /// * `GameError::SlotOutOfRange` - Slot outside the table
    pub fn key_pressed(&self, player: PlayerId, slot: Slot) -> GameResult<bool> {
        let target = self
            .players
            .get(player)
            .ok_or(GameError::UnknownPlayer(player))?;
        if slot >= self.config.table_size {
            return Err(GameError::SlotOutOfRange {
                slot,
                table_size: self.config.table_size,
            });
        }
        Ok(target.key_pressed(slot))
    }

    /// Request termination. The dealer finishes the current resolution,
    /// announces winners and joins every actor.
    pub fn terminate(&self) {
        log::info!("termination requested");
        self.shutdown.cancel();
        self.submissions.shutdown();
    }

    pub fn is_terminated(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Current score of every player, indexed by id
    pub fn scores(&self) -> Vec<Score> {
        self.players.iter().map(|p| p.score()).collect()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

impl std::fmt::Debug for GameHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameHandle")
            .field("players", &self.players.len())
            .field("terminated", &self.is_terminated())
            .finish_non_exhaustive()
    }
}

/// A running game: the dealer thread plus its handle
pub struct Game {
    handle: GameHandle,
    dealer: JoinHandle<GameResult<GameSummary>>,
    ui: Arc<dyn Ui>,
}

impl Game {
    /// Validate `config` and start the dealer thread
    ///
    /// # Arguments
    ///
    /// * `config` - Game configuration
    /// * `ui` - Display collaborator
    /// * `rules` - Match rules
    ///
    /// # Returns
    ///
    /// * `GameResult<Game>` - Running game
    ///
    /// # Errors
    ///
    /// * `GameError::Config` - Invalid configuration
    /// * `GameError::Spawn` - The dealer thread could not be started
    pub fn start(config: GameConfig, ui: Arc<dyn Ui>, rules: Arc<dyn Rules>) -> GameResult<Self> {
        config.validate()?;
        log::info!(
            "starting game: {} human and {} computer players",
            config.human_players,
            config.computer_players
        );

        let shutdown = Arc::new(Shutdown::new());
        let dealer = Dealer::new(config.clone(), ui.clone(), rules, shutdown.clone());
        let handle = GameHandle {
            config: Arc::new(config),
            players: dealer.players().iter().cloned().collect(),
            submissions: dealer.submissions().clone(),
            shutdown,
        };

        let dealer = thread::Builder::new()
            .name("dealer".to_string())
            .spawn(move || dealer.run())?;

        Ok(Self { handle, dealer, ui })
    }

    pub fn handle(&self) -> GameHandle {
        self.handle.clone()
    }

    /// Wait for the game to end and dispose of the display
    ///
    /// # Errors
    ///
    /// * `GameError::ActorPanicked` - The dealer thread panicked
    /// * `GameError::Spawn` - A player thread could not be started
    pub fn join(self) -> GameResult<GameSummary> {
        let joined = self.dealer.join();
        self.ui.dispose();
        joined.map_err(|_| GameError::ActorPanicked("dealer".to_string()))?
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}
