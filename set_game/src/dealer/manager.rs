//! Dealer actor: deals rounds, resolves submissions, ends the game.

use super::{
    clock::{ClockMode, RoundClock},
    summary::{self, GameSummary},
};
use crate::{
    game::{
        config::GameConfig,
        entities::{Card, Score, Slot, Submission, Verdict},
        errors::GameResult,
        rules::Rules,
        ui::Ui,
    },
    player::Player,
    sync::{Shutdown, SubmissionQueue},
    table::Table,
};
use chrono::Utc;
use rand::seq::SliceRandom;
use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

/// Owner of the deck and the only actor that moves cards.
pub struct Dealer {
    config: GameConfig,
    table: Arc<Table>,
    players: Vec<Arc<Player>>,
    submissions: Arc<SubmissionQueue>,
    rules: Arc<dyn Rules>,
    ui: Arc<dyn Ui>,
    shutdown: Arc<Shutdown>,
    deck: Vec<Card>,
    slot_order: Vec<Slot>,
    clock: RoundClock,
    rounds: u32,
    matches: u32,
}

impl Dealer {
    /// Create the dealer together with the table and every player
    ///
    /// # Arguments
    ///
    /// * `config` - Validated game configuration
    /// * `ui` - Display collaborator
    /// * `rules` - Match rules
    /// * `shutdown` - External termination flag
    ///
    /// # Returns
    ///
    /// * `Dealer` - Dealer holding a full deck; no thread is started yet
    pub fn new(
        config: GameConfig,
        ui: Arc<dyn Ui>,
        rules: Arc<dyn Rules>,
        shutdown: Arc<Shutdown>,
    ) -> Self {
        let table = Arc::new(Table::new(&config, ui.clone()));
        let submissions = Arc::new(SubmissionQueue::new());
        let players = (0..config.players())
            .map(|id| {
                Arc::new(Player::new(
                    id,
                    &config,
                    table.clone(),
                    submissions.clone(),
                    ui.clone(),
                ))
            })
            .collect();
        let clock = RoundClock::new(
            ClockMode::from_millis(config.turn_timeout_millis),
            config.turn_timeout_warning(),
        );

        Self {
            deck: (0..config.deck_size).collect(),
            slot_order: (0..config.table_size).collect(),
            config,
            table,
            players,
            submissions,
            rules,
            ui,
            shutdown,
            clock,
            rounds: 0,
            matches: 0,
        }
    }

    pub fn players(&self) -> &[Arc<Player>] {
        &self.players
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    pub fn submissions(&self) -> &Arc<SubmissionQueue> {
        &self.submissions
    }

    /// Dealer thread body.
    ///
    /// # Returns
    ///
    /// * `GameResult<GameSummary>` - Final scores and winners, or a spawn
    ///   failure for a player thread
    ///
    /// # Errors
    ///
    /// * `GameError::Spawn` - A player thread could not be started; players
    ///   already running are terminated and joined first
    pub fn run(mut self) -> GameResult<GameSummary> {
        log::info!("thread dealer starting");
        let started_at = Utc::now();
        let handles = self.spawn_players()?;

        while !self.should_finish() {
            self.play_round();
        }
        // Anything submitted during the last clear still gets a verdict.
        while self.resolve_next() {}

        self.table.set_placement(true);
        let scores = self.scores();
        let winners = summary::winners(&scores);
        log::info!("game over after {} rounds, winners: {winners:?}", self.rounds);
        self.ui.announce_winners(&winners);

        self.terminate_players(handles);
        log::info!("thread dealer terminated");

        Ok(GameSummary {
            scores: self.scores(),
            winners,
            rounds: self.rounds,
            matches: self.matches,
            started_at,
            finished_at: Utc::now(),
        })
    }

    fn spawn_players(&self) -> GameResult<Vec<JoinHandle<()>>> {
        let mut handles = Vec::with_capacity(self.players.len());
        for player in &self.players {
            let runner = player.clone();
            let spawned = thread::Builder::new()
                .name(format!("player-{}", player.id()))
                .spawn(move || runner.run());
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    log::error!("failed to start player {}: {e}", player.id());
                    self.table.set_placement(true);
                    self.terminate_players(handles);
                    return Err(e.into());
                }
            }
        }
        Ok(handles)
    }

    /// Terminate and join players in reverse creation order.
    fn terminate_players(&self, handles: Vec<JoinHandle<()>>) {
        for (player, handle) in self.players.iter().zip(handles).rev() {
            player.terminate();
            if handle.join().is_err() {
                log::error!("player {} panicked", player.id());
            }
        }
    }

    fn should_finish(&self) -> bool {
        self.shutdown.is_cancelled() || self.rules.find_sets(&self.deck, 1).is_empty()
    }

    /// One full round: deal, open, run the clock, close, drain, clear.
    fn play_round(&mut self) {
        self.rounds += 1;
        log::info!(
            "round {} starting, {} cards in the deck",
            self.rounds,
            self.deck.len()
        );

        let mut rng = rand::rng();
        self.deck.shuffle(&mut rng);
        self.slot_order.shuffle(&mut rng);

        self.clock.reset();
        self.clock.display_reset(self.ui.as_ref());
        self.place_cards();

        self.table.set_placement(true);
        self.run_clock();
        self.close_round();
        log::info!("round {} over", self.rounds);
    }

    /// Stop token placement, answer every queued submission, then clear.
    fn close_round(&mut self) {
        self.table.set_placement(false);
        while self.resolve_next() {}
        self.clear_table();
    }

    fn round_open(&self) -> bool {
        match self.clock.mode() {
            ClockMode::Countdown(_) => !self.clock.expired(),
            ClockMode::CountUp | ClockMode::Disabled => self.table.has_match(self.rules.as_ref()),
        }
    }

    fn run_clock(&mut self) {
        self.clock.reset();
        while !self.shutdown.is_cancelled() && self.round_open() {
            let poll = self.clock.next_poll();
            self.submissions.wait(poll);
            self.clock.display(self.ui.as_ref());
            self.resolve_next();
            self.place_cards();
        }
    }

    /// Fill every empty slot from the deck, in the current slot order.
    fn place_cards(&mut self) {
        let before = self.deck.len();
        for &slot in &self.slot_order {
            if self.table.card_at(slot).is_some() {
                continue;
            }
            let Some(card) = self.deck.pop() else {
                break;
            };
            self.table.place_card(card, slot);
        }

        if self.config.hints && self.deck.len() < before {
            for hint in self.table.hints(self.rules.as_ref()) {
                log::info!("hint: {hint}");
            }
        }
    }

    /// Resolve the oldest pending submission, if any.
    ///
    /// # Returns
    ///
    /// * `bool` - Whether a submission was resolved
    fn resolve_next(&mut self) -> bool {
        let Some(submission) = self.submissions.take() else {
            return false;
        };
        let verdict = self.judge(&submission);
        log::debug!("{submission}: {verdict}");

        if verdict == Verdict::Accepted {
            self.matches += 1;
            for &slot in submission.slots() {
                self.table.remove_card(slot);
                self.remove_tokens(slot);
            }
            self.slot_order.shuffle(&mut rand::rng());
        }

        match self.players.get(submission.player()) {
            Some(player) => player.deliver(verdict),
            None => log::warn!("submission from unknown player {}", submission.player()),
        }

        if verdict == Verdict::Accepted {
            self.clock.reset();
            self.clock.display_reset(self.ui.as_ref());
        }
        true
    }

    fn judge(&self, submission: &Submission) -> Verdict {
        if !self.table.is_relevant(submission) {
            Verdict::Stale
        } else if self.rules.test_set(submission.cards()) {
            Verdict::Accepted
        } else {
            Verdict::Rejected
        }
    }

    fn remove_tokens(&self, slot: Slot) {
        self.table.clear_tokens(slot, |id| {
            if let Some(player) = self.players.get(id) {
                player.token_removed();
            }
        });
    }

    /// Return every card on the table to the deck and empty every slot.
    fn clear_table(&mut self) {
        self.table.return_cards_to(&mut self.deck);
        self.slot_order.shuffle(&mut rand::rng());
        for &slot in &self.slot_order {
            self.table.remove_card(slot);
            self.remove_tokens(slot);
        }
    }

    fn scores(&self) -> Vec<Score> {
        self.players.iter().map(|p| p.score()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        rules::ClassicRules,
        ui::{RecordingUi, UiEvent},
    };
    use std::time::{Duration, Instant};

    fn dealer_with(config: GameConfig) -> (Dealer, Arc<RecordingUi>) {
        let ui = Arc::new(RecordingUi::new());
        let rules = Arc::new(ClassicRules::from_config(&config));
        let dealer = Dealer::new(config, ui.clone(), rules, Arc::new(Shutdown::new()));
        (dealer, ui)
    }

    fn two_humans() -> GameConfig {
        GameConfig {
            human_players: 2,
            computer_players: 0,
            point_freeze_millis: 0,
            penalty_freeze_millis: 0,
            ..GameConfig::default()
        }
    }

    /// Press `slots` for `player`; the last press runs on its own thread
    /// since it blocks until the verdict arrives.
    fn submit(dealer: &Dealer, player: usize, slots: &[Slot]) -> JoinHandle<()> {
        let (last, first) = slots.split_last().unwrap();
        let player = dealer.players[player].clone();
        for &slot in first {
            player.handle_press(slot);
        }
        let last = *last;
        let queued = dealer.submissions.len();
        let pressing = thread::spawn(move || player.handle_press(last));
        let deadline = Instant::now() + Duration::from_secs(5);
        while dealer.submissions.len() == queued {
            assert!(Instant::now() < deadline, "selection never submitted");
            thread::sleep(Duration::from_millis(1));
        }
        pressing
    }

    #[test]
    fn test_accepted_match_removes_cards_and_tokens() {
        let (mut dealer, ui) = dealer_with(two_humans());
        for (slot, card) in [0, 1, 2, 3].into_iter().enumerate() {
            dealer.table.place_card(card, slot);
        }
        dealer.players[1].handle_press(0);
        dealer.players[1].handle_press(3);
        assert_eq!(dealer.players[1].token_count(), 2);

        let pressing = submit(&dealer, 0, &[0, 1, 2]);
        assert!(dealer.resolve_next());
        pressing.join().unwrap();

        for slot in 0..3 {
            assert_eq!(dealer.table.card_at(slot), None);
            assert!(!dealer.table.has_token(0, slot));
            assert!(!dealer.table.has_token(1, slot));
        }
        assert_eq!(dealer.table.card_at(3), Some(3));
        assert!(dealer.table.has_token(1, 3));
        assert_eq!(dealer.players[0].score(), 1);
        assert_eq!(dealer.players[0].token_count(), 0);
        assert_eq!(dealer.players[1].token_count(), 1);
        assert_eq!(dealer.matches, 1);
        assert_eq!(ui.count(|e| matches!(e, UiEvent::RemoveCard { .. })), 3);
    }

    #[test]
    fn test_rejected_match_keeps_cards() {
        let (mut dealer, _) = dealer_with(two_humans());
        for (slot, card) in [0, 1, 3].into_iter().enumerate() {
            dealer.table.place_card(card, slot);
        }

        let pressing = submit(&dealer, 0, &[0, 1, 2]);
        assert!(dealer.resolve_next());
        pressing.join().unwrap();

        assert_eq!(dealer.table.count_cards(), 3);
        assert_eq!(dealer.players[0].score(), 0);
        assert_eq!(dealer.matches, 0);
    }

    #[test]
    fn test_stale_selection_has_no_effect() {
        let (mut dealer, _) = dealer_with(two_humans());
        for (slot, card) in [0, 1, 2].into_iter().enumerate() {
            dealer.table.place_card(card, slot);
        }

        let pressing = submit(&dealer, 0, &[0, 1, 2]);
        dealer.table.remove_card(1);
        assert!(dealer.resolve_next());
        pressing.join().unwrap();

        assert_eq!(dealer.players[0].score(), 0);
        assert_eq!(dealer.table.card_at(0), Some(0));
        assert_eq!(dealer.table.card_at(2), Some(2));
        assert_eq!(dealer.matches, 0);
    }

    #[test]
    fn test_submissions_resolved_in_arrival_order() {
        let (mut dealer, _) = dealer_with(two_humans());
        for (slot, card) in [0, 1, 2, 3, 6].into_iter().enumerate() {
            dealer.table.place_card(card, slot);
        }

        // Both selections are valid matches sharing the card on slot 0.
        let first = submit(&dealer, 0, &[0, 1, 2]);
        let second = submit(&dealer, 1, &[0, 3, 4]);
        assert_eq!(dealer.submissions.len(), 2);

        assert!(dealer.resolve_next());
        first.join().unwrap();
        assert_eq!(dealer.players[0].score(), 1);
        assert!(!dealer.table.has_token(1, 0));

        assert!(dealer.resolve_next());
        second.join().unwrap();
        assert_eq!(dealer.players[1].score(), 0);
        assert_eq!(dealer.matches, 1);
        assert_eq!(dealer.table.card_at(3), Some(3));
        assert_eq!(dealer.table.card_at(4), Some(6));
        assert_eq!(dealer.players[1].token_count(), 2);
        assert!(!dealer.resolve_next());
    }

    #[test]
    fn test_closing_drain_answers_late_submission() {
        let (mut dealer, _) = dealer_with(two_humans());
        for (slot, card) in [0, 1, 2].into_iter().enumerate() {
            dealer.table.place_card(card, slot);
        }
        dealer.table.set_placement(true);

        // Completed after the clock stopped, before the table closed.
        let pressing = submit(&dealer, 0, &[0, 1, 2]);
        dealer.close_round();
        pressing.join().unwrap();

        assert!(dealer.submissions.is_empty());
        assert_eq!(dealer.players[0].score(), 1);
        assert_eq!(dealer.players[0].pending_verdict(), None);
        assert_eq!(dealer.matches, 1);
        assert_eq!(dealer.table.count_cards(), 0);
        assert!(!dealer.table.placement_allowed());
    }

    #[test]
    fn test_final_drain_answers_leftover_submission() {
        let (mut dealer, _) = dealer_with(two_humans());
        dealer.deck = vec![0, 1, 3, 4];
        dealer
            .submissions
            .put(Submission::new(1, vec![0, 1, 2], vec![0, 1, 2]));
        let players = dealer.players.clone();
        let submissions = dealer.submissions.clone();

        let summary = dealer.run().unwrap();
        assert!(submissions.is_empty());
        assert_eq!(players[1].pending_verdict(), Some(Verdict::Stale));
        assert_eq!(players[0].pending_verdict(), None);
        assert_eq!(summary.matches, 0);
    }

    #[test]
    fn test_resolve_on_empty_queue() {
        let (mut dealer, _) = dealer_with(two_humans());
        assert!(!dealer.resolve_next());
    }

    #[test]
    fn test_timeout_clears_table_and_redeals() {
        let config = GameConfig {
            turn_timeout_millis: 30,
            turn_timeout_warning_millis: 1000,
            ..two_humans()
        };
        let (mut dealer, ui) = dealer_with(config);

        dealer.play_round();
        assert_eq!(dealer.table.count_cards(), 0);
        assert_eq!(dealer.deck.len(), 81);
        assert!(!dealer.table.placement_allowed());
        assert!(dealer.table.is_consistent());
        assert_eq!(ui.count(|e| matches!(e, UiEvent::PlaceCard { .. })), 12);

        dealer.play_round();
        assert_eq!(dealer.rounds, 2);
        assert_eq!(dealer.deck.len(), 81);
        assert_eq!(ui.count(|e| matches!(e, UiEvent::PlaceCard { .. })), 24);
    }

    #[test]
    fn test_matchless_deck_ends_game_with_tie() {
        let (mut dealer, ui) = dealer_with(two_humans());
        dealer.deck = vec![0, 1, 3, 4];
        let table = dealer.table.clone();

        let summary = dealer.run().unwrap();
        assert_eq!(summary.rounds, 0);
        assert_eq!(summary.winners, vec![0, 1]);
        assert_eq!(summary.scores, vec![0, 0]);
        assert!(table.placement_allowed());
        assert_eq!(ui.winners(), Some(vec![0, 1]));
    }

    #[test]
    fn test_terminated_dealer_stops_before_dealing() {
        let ui = Arc::new(RecordingUi::new());
        let shutdown = Arc::new(Shutdown::new());
        shutdown.cancel();
        let dealer = Dealer::new(
            two_humans(),
            ui.clone(),
            Arc::new(ClassicRules::default()),
            shutdown,
        );

        let summary = dealer.run().unwrap();
        assert_eq!(summary.rounds, 0);
        assert_eq!(ui.count(|e| matches!(e, UiEvent::PlaceCard { .. })), 0);
    }
}
