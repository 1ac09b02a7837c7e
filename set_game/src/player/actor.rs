//! Player actor: consumes key presses, toggles tokens, submits selections.

use super::synthetic::SyntheticInput;
use crate::{
    game::{
        config::GameConfig,
        entities::{PlayerId, Score, Slot, Verdict},
        ui::Ui,
    },
    sync::{InputQueue, Shutdown, SubmissionQueue, VerdictMailbox},
    table::Table,
};
use parking_lot::Mutex;
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU32, Ordering},
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

/// First freeze display refresh comes quickly, later ones once a second.
const FIRST_FREEZE_STEP: Duration = Duration::from_millis(10);
const FREEZE_STEP: Duration = Duration::from_secs(1);

/// One seat at the table.
///
/// The player thread owns the token-toggling logic. Everything other threads
/// touch (score, freeze flag, token count, input queue, verdict mailbox) is
/// internally synchronised so the player can be shared behind an `Arc`.
pub struct Player {
    id: PlayerId,
    human: bool,
    feature_size: usize,
    table_size: usize,
    point_freeze: Duration,
    penalty_freeze: Duration,
    computer_delay: Duration,
    table: Arc<Table>,
    submissions: Arc<SubmissionQueue>,
    ui: Arc<dyn Ui>,
    inputs: InputQueue<Slot>,
    mailbox: VerdictMailbox,
    score: AtomicU32,
    frozen: AtomicBool,
    /// Tokens this player currently has on the table. The dealer decrements
    /// it when it clears tokens, so it lives behind its own lock. Never held
    /// while acquiring the table gate.
    token_count: Mutex<usize>,
    shutdown: Shutdown,
    synthetic: Mutex<Option<JoinHandle<()>>>,
}

impl Player {
    /// Create a player
    ///
    /// # Arguments
    ///
    /// * `id` - Player id, also the row of the token matrix
    /// * `config` - Game configuration
    /// * `table` - Shared table
    /// * `submissions` - Dealer's submission queue
    /// * `ui` - Display collaborator
    ///
    /// # Returns
    ///
    /// * `Player` - Idle player; human iff `config.is_human(id)`
    pub fn new(
        id: PlayerId,
        config: &GameConfig,
        table: Arc<Table>,
        submissions: Arc<SubmissionQueue>,
        ui: Arc<dyn Ui>,
    ) -> Self {
        Self {
            id,
            human: config.is_human(id),
            feature_size: config.feature_size,
            table_size: config.table_size,
            point_freeze: config.point_freeze(),
            penalty_freeze: config.penalty_freeze(),
            computer_delay: config.computer_delay(),
            table,
            submissions,
            ui,
            inputs: InputQueue::new(),
            mailbox: VerdictMailbox::new(),
            score: AtomicU32::new(0),
            frozen: AtomicBool::new(false),
            token_count: Mutex::new(0),
            shutdown: Shutdown::new(),
            synthetic: Mutex::new(None),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn is_human(&self) -> bool {
        self.human
    }

    pub fn score(&self) -> Score {
        self.score.load(Ordering::Acquire)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    pub fn token_count(&self) -> usize {
        *self.token_count.lock()
    }

    /// Player thread body. Spawns the synthetic-input actor for computer
    /// players, then loops until terminated.
    pub fn run(self: Arc<Self>) {
        log::info!("thread player-{} starting", self.id);
        if !self.human {
            self.start_synthetic();
        }

        while !self.shutdown.is_cancelled() {
            // Presses queued while the table was closed are obsolete.
            if self.table.wait_for_placement() {
                self.inputs.clear();
            }
            if self.shutdown.is_cancelled() {
                break;
            }
            // Synthetic presses bypass the placement check, so it is
            // repeated here.
            if let Some(slot) = self.inputs.take() {
                if self.table.placement_allowed() {
                    self.handle_press(slot);
                }
            }
        }

        let synthetic = self.synthetic.lock().take();
        if let Some(handle) = synthetic {
            if handle.join().is_err() {
                log::error!("synthetic input of player {} panicked", self.id);
            }
        }
        log::info!("thread player-{} terminated", self.id);
    }

    /// External key press for this player.
    ///
    /// # Returns
    ///
    /// * `bool` - Whether the press was queued; dropped while frozen, while
    ///   the table is closed, or after termination
    pub fn key_pressed(&self, slot: Slot) -> bool {
        if self.is_frozen() || !self.table.placement_allowed() {
            return false;
        }
        self.inputs.put(slot)
    }

    /// Queue a press straight from the synthetic-input actor, blocking while
    /// the queue is full.
    pub(crate) fn feed(&self, slot: Slot) -> bool {
        self.inputs.put(slot)
    }

    /// Toggle a token on `slot` and submit once the selection is complete.
    pub(crate) fn handle_press(&self, slot: Slot) {
        if slot >= self.table_size || self.table.card_at(slot).is_none() {
            return;
        }
        // A full selection only accepts removals.
        if self.token_count() == self.feature_size && !self.table.has_token(self.id, slot) {
            return;
        }

        // The count moves inside the placement's reader section, so a dealer
        // clear that removes this token always finds it already counted.
        if self.table.remove_token(self.id, slot) {
            self.token_removed();
        } else {
            self.table
                .place_token_on_card_with(self.id, slot, || *self.token_count.lock() += 1);
        }

        if self.token_count() == self.feature_size {
            self.complete_selection();
        }
    }

    fn complete_selection(&self) {
        self.frozen.store(true, Ordering::Release);

        // Tokens cleared by the dealer since the last check leave a short
        // selection, which is as stale as one with a missing card.
        match self
            .table
            .selection(self.id)
            .filter(|selection| selection.len() == self.feature_size)
        {
            Some(selection) => {
                log::debug!("submitting {selection}");
                self.submissions.put(selection);
                if let Some(verdict) = self.mailbox.wait() {
                    self.settle(verdict);
                }
            }
            None => log::debug!("player {} selection went stale before submit", self.id),
        }

        self.frozen.store(false, Ordering::Release);
    }

    /// Apply a verdict: point or penalty freeze, then drop queued presses.
    /// A stale verdict only drops the presses.
    pub(crate) fn settle(&self, verdict: Verdict) {
        match verdict {
            Verdict::Accepted => {
                let score = self.score.fetch_add(1, Ordering::AcqRel) + 1;
                self.ui.set_score(self.id, score);
                self.freeze(self.point_freeze);
            }
            Verdict::Rejected => self.freeze(self.penalty_freeze),
            Verdict::Stale => {}
        }
        self.inputs.clear();
    }

    fn freeze(&self, duration: Duration) {
        let end = Instant::now() + duration;
        let mut step = FIRST_FREEZE_STEP;
        loop {
            let remaining = end.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            self.ui.set_freeze(self.id, millis(remaining));
            if !self.shutdown.sleep(step.min(remaining)) {
                break;
            }
            step = FREEZE_STEP;
        }
        self.ui.set_freeze(self.id, 0);
    }

    /// Deposit the dealer's verdict for the pending submission.
    pub fn deliver(&self, verdict: Verdict) {
        self.mailbox.deliver(verdict);
    }

    /// Account for one of this player's tokens leaving the table.
    pub fn token_removed(&self) {
        *self.token_count.lock() -= 1;
    }

    /// Stop the player and its synthetic input, waking every blocking wait.
    pub fn terminate(&self) {
        self.shutdown.cancel();
        self.inputs.close();
        self.mailbox.close();
    }

    #[cfg(test)]
    pub(crate) fn pending_verdict(&self) -> Option<Verdict> {
        self.mailbox.try_take()
    }

    pub(crate) fn is_terminated(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    pub(crate) fn computer_delay(&self) -> Duration {
        self.computer_delay
    }

    pub(crate) fn table_size(&self) -> usize {
        self.table_size
    }

    pub(crate) fn pause(&self, duration: Duration) -> bool {
        self.shutdown.sleep(duration)
    }

    fn start_synthetic(self: &Arc<Self>) {
        let input = SyntheticInput::new(self.clone());
        match thread::Builder::new()
            .name(format!("computer-{}", self.id))
            .spawn(move || input.run())
        {
            Ok(handle) => *self.synthetic.lock() = Some(handle),
            Err(e) => log::error!("failed to start synthetic input for player {}: {e}", self.id),
        }
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("human", &self.human)
            .field("score", &self.score())
            .field("frozen", &self.is_frozen())
            .field("token_count", &self.token_count())
            .finish_non_exhaustive()
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        entities::Card,
        ui::{RecordingUi, UiEvent},
    };

    struct Fixture {
        player: Arc<Player>,
        table: Arc<Table>,
        submissions: Arc<SubmissionQueue>,
        ui: Arc<RecordingUi>,
    }

    fn fixture(layout: &[Option<Card>]) -> Fixture {
        let config = GameConfig {
            human_players: 1,
            computer_players: 0,
            point_freeze_millis: 0,
            penalty_freeze_millis: 0,
            ..GameConfig::default()
        };
        let ui = Arc::new(RecordingUi::new());
        let table = Arc::new(Table::with_layout(&config, ui.clone(), layout));
        let submissions = Arc::new(SubmissionQueue::new());
        let player = Arc::new(Player::new(
            0,
            &config,
            table.clone(),
            submissions.clone(),
            ui.clone(),
        ));
        Fixture {
            player,
            table,
            submissions,
            ui,
        }
    }

    #[test]
    fn test_press_toggles_token() {
        let f = fixture(&[Some(0), Some(1)]);
        f.player.handle_press(0);
        assert!(f.table.has_token(0, 0));
        assert_eq!(f.player.token_count(), 1);

        f.player.handle_press(0);
        assert!(!f.table.has_token(0, 0));
        assert_eq!(f.player.token_count(), 0);
    }

    #[test]
    fn test_press_on_empty_slot_is_ignored() {
        let f = fixture(&[Some(0), None]);
        f.player.handle_press(1);
        f.player.handle_press(40);
        assert_eq!(f.player.token_count(), 0);
        assert!(f.ui.events().is_empty());
    }

    #[test]
    fn test_full_selection_submits_and_waits_for_verdict() {
        let f = fixture(&[Some(0), Some(1), Some(2), Some(3)]);
        f.player.handle_press(0);
        f.player.handle_press(1);

        let pressing = {
            let player = f.player.clone();
            thread::spawn(move || player.handle_press(2))
        };
        assert!(f.submissions.wait(Some(Duration::from_secs(5))));
        let submission = f.submissions.take().unwrap();
        assert_eq!(submission.player(), 0);
        assert_eq!(submission.slots(), &[0, 1, 2]);
        assert_eq!(submission.cards(), &[0, 1, 2]);
        assert!(f.player.is_frozen());

        f.player.deliver(Verdict::Accepted);
        pressing.join().unwrap();
        assert!(!f.player.is_frozen());
        assert_eq!(f.player.score(), 1);
        assert!(f.ui.events().contains(&UiEvent::SetScore {
            player: 0,
            score: 1
        }));
    }

    #[test]
    fn test_full_player_only_removes() {
        let f = fixture(&[Some(0), Some(1), Some(3), Some(4)]);
        for slot in 0..3 {
            f.table.place_token_on_card(0, slot);
        }
        *f.player.token_count.lock() = 3;

        f.player.handle_press(3);
        assert!(!f.table.has_token(0, 3));
        assert_eq!(f.player.token_count(), 3);

        f.player.handle_press(1);
        assert!(!f.table.has_token(0, 1));
        assert_eq!(f.player.token_count(), 2);
    }

    #[test]
    fn test_stale_verdict_keeps_score_and_drops_presses() {
        let f = fixture(&[Some(0)]);
        f.player.feed(0);
        f.player.settle(Verdict::Stale);
        assert_eq!(f.player.score(), 0);
        assert!(f.player.inputs.is_empty());
        assert!(
            !f.ui
                .events()
                .iter()
                .any(|e| matches!(e, UiEvent::SetFreeze { .. }))
        );
    }

    #[test]
    fn test_rejection_clears_queued_presses() {
        let f = fixture(&[Some(0)]);
        f.player.feed(0);
        f.player.feed(0);
        f.player.settle(Verdict::Rejected);
        assert_eq!(f.player.score(), 0);
        assert!(f.player.inputs.is_empty());
        assert_eq!(f.ui.events().last(), Some(&UiEvent::SetFreeze { player: 0, millis: 0 }));
    }

    #[test]
    fn test_key_pressed_dropped_while_table_closed() {
        let f = fixture(&[Some(0)]);
        assert!(!f.player.key_pressed(0));
        f.table.set_placement(true);
        assert!(f.player.key_pressed(0));
        f.player.frozen.store(true, Ordering::Release);
        assert!(!f.player.key_pressed(0));
    }

    #[test]
    fn test_terminate_wakes_idle_player() {
        let f = fixture(&[Some(0)]);
        f.table.set_placement(true);
        let running = {
            let player = f.player.clone();
            thread::spawn(move || player.run())
        };
        thread::sleep(Duration::from_millis(20));
        f.player.terminate();
        running.join().unwrap();
        assert!(f.player.is_terminated());
        assert!(!f.player.key_pressed(0));
    }

    #[test]
    fn test_token_count_survives_concurrent_clears() {
        let f = fixture(&[Some(0)]);
        let stop = AtomicBool::new(false);

        thread::scope(|s| {
            s.spawn(|| {
                while !stop.load(Ordering::Acquire) {
                    f.player.handle_press(0);
                }
            });
            for _ in 0..2_000 {
                f.table.remove_card(0);
                f.table.clear_tokens(0, |_| f.player.token_removed());
                f.table.place_card(0, 0);
            }
            stop.store(true, Ordering::Release);
        });

        let on_table = usize::from(f.table.has_token(0, 0));
        assert_eq!(f.player.token_count(), on_table);
    }
}
