//! The table shared between the dealer and every player.

use super::grid::Grid;
use crate::{
    game::{
        config::GameConfig,
        entities::{Card, PlayerId, Slot, Submission},
        rules::Rules,
        ui::Ui,
    },
    sync::{GateLock, Switch},
};
use std::{fmt, sync::Arc, thread, time::Duration};

/// A match currently on the table, for hint output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    /// Slots holding the match, ascending
    pub slots: Vec<Slot>,
    /// Feature vector of each card, in slot order
    pub features: Vec<Vec<usize>>,
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slots: {:?} features: {:?}", self.slots, self.features)
    }
}

/// Point-in-time copy of both card mappings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSnapshot {
    pub slot_to_card: Vec<Option<Card>>,
    pub card_to_slot: Vec<Option<Slot>>,
}

/// Shared table state.
///
/// Card moves and bulk checks take the gate as writer (dealer side); token
/// toggles and selection snapshots take it as reader (player side). The
/// placement switch is separate: it says whether players may act at all.
pub struct Table {
    grid: GateLock<Grid>,
    placement: Switch,
    ui: Arc<dyn Ui>,
    delay: Duration,
}

impl Table {
    /// Create an empty table
    ///
    /// # Arguments
    ///
    /// * `config` - Game configuration (players, table and deck size, delay)
    /// * `ui` - Display notified of every card and token change
    pub fn new(config: &GameConfig, ui: Arc<dyn Ui>) -> Self {
        Self {
            grid: GateLock::new(Grid::new(
                config.players(),
                config.table_size,
                config.deck_size,
            )),
            placement: Switch::new(false),
            ui,
            delay: config.table_delay(),
        }
    }

    /// Create a table with `layout[slot]` already dealt, without display
    /// calls or placement delay.
    pub fn with_layout(config: &GameConfig, ui: Arc<dyn Ui>, layout: &[Option<Card>]) -> Self {
        let table = Self::new(config, ui);
        {
            let mut grid = table.grid.write();
            for (slot, card) in layout.iter().enumerate() {
                if let Some(card) = *card {
                    grid.place_card(card, slot);
                }
            }
        }
        table
    }

    pub fn table_size(&self) -> usize {
        self.grid.read().table_size()
    }

    /// Place `card` on `slot`.
    pub fn place_card(&self, card: Card, slot: Slot) {
        self.simulate_delay();
        self.grid.write().place_card(card, slot);
        self.ui.place_card(card, slot);
    }

    /// Remove the card on `slot`, if any.
    pub fn remove_card(&self, slot: Slot) -> Option<Card> {
        self.simulate_delay();
        let card = self.grid.write().remove_card(slot);
        if card.is_some() {
            self.ui.remove_card(slot);
        }
        card
    }

    pub fn place_token(&self, player: PlayerId, slot: Slot) {
        if self.grid.read().place_token(player, slot) {
            self.ui.place_token(player, slot);
        }
    }

    /// Remove `player`'s token from `slot`.
    ///
    /// # Returns
    ///
    /// * `bool` - Whether a token was there; a no-op otherwise
    pub fn remove_token(&self, player: PlayerId, slot: Slot) -> bool {
        let removed = self.grid.read().remove_token(player, slot);
        if removed {
            self.ui.remove_token(player, slot);
        }
        removed
    }

    /// Place `player`'s token on `slot` only if a card lies there.
    ///
    /// # Returns
    ///
    /// * `bool` - Whether the token was placed
    pub fn place_token_on_card(&self, player: PlayerId, slot: Slot) -> bool {
        self.place_token_on_card_with(player, slot, || {})
    }

    /// Like [`Table::place_token_on_card`], calling `on_placed` before the
    /// reader section ends. The dealer clears tokens as writer, so anything
    /// `on_placed` records is visible before a clear can remove the token.
    pub fn place_token_on_card_with(
        &self,
        player: PlayerId,
        slot: Slot,
        on_placed: impl FnOnce(),
    ) -> bool {
        let grid = self.grid.read();
        if grid.card_at(slot).is_none() || !grid.place_token(player, slot) {
            return false;
        }
        on_placed();
        self.ui.place_token(player, slot);
        true
    }

    /// Snapshot `player`'s tokened slots with the cards lying on them.
    ///
    /// # Returns
    ///
    /// * `Option<Submission>` - `None` if a tokened slot has already lost its
    ///   card, which makes the selection stale
    pub fn selection(&self, player: PlayerId) -> Option<Submission> {
        let grid = self.grid.read();
        let mut cards = Vec::new();
        let mut slots = Vec::new();
        for slot in grid.tokens_of(player) {
            cards.push(grid.card_at(slot)?);
            slots.push(slot);
        }
        Some(Submission::new(player, cards, slots))
    }

    /// Whether every card of `submission` still lies on its recorded slot.
    pub fn is_relevant(&self, submission: &Submission) -> bool {
        let grid = self.grid.write();
        submission
            .pairs()
            .all(|(card, slot)| grid.card_at(slot) == Some(card))
    }

    pub fn card_at(&self, slot: Slot) -> Option<Card> {
        self.grid.read().card_at(slot)
    }

    pub fn has_token(&self, player: PlayerId, slot: Slot) -> bool {
        self.grid.read().has_token(player, slot)
    }

    pub fn count_cards(&self) -> usize {
        self.grid.read().count_cards()
    }

    /// Cards on the table in slot order.
    pub fn cards(&self) -> Vec<Card> {
        self.grid.write().cards()
    }

    /// Whether at least one match lies on the table.
    pub fn has_match(&self, rules: &dyn Rules) -> bool {
        let cards = self.cards();
        !rules.find_sets(&cards, 1).is_empty()
    }

    /// Append every card on the table to `deck`. The cards stay on the table.
    pub fn return_cards_to(&self, deck: &mut Vec<Card>) {
        deck.extend(self.grid.write().cards());
    }

    /// Remove every player's token from `slot`, calling `on_removed` for each
    /// player that actually had one while the gate is still held.
    ///
    /// # Returns
    ///
    /// * `usize` - Number of tokens removed
    pub fn clear_tokens(&self, slot: Slot, mut on_removed: impl FnMut(PlayerId)) -> usize {
        let grid = self.grid.write();
        let mut removed = 0;
        for player in 0..grid.players() {
            if grid.remove_token(player, slot) {
                self.ui.remove_token(player, slot);
                on_removed(player);
                removed += 1;
            }
        }
        removed
    }

    /// Every match on the table, described by slots and features
    pub fn hints(&self, rules: &dyn Rules) -> Vec<Hint> {
        let grid = self.grid.write();
        rules
            .find_sets(&grid.cards(), usize::MAX)
            .into_iter()
            .map(|set| {
                let mut slots: Vec<Slot> = set.iter().filter_map(|&c| grid.slot_of(c)).collect();
                slots.sort_unstable();
                let cards: Vec<Card> = slots.iter().filter_map(|&s| grid.card_at(s)).collect();
                Hint {
                    slots,
                    features: rules.cards_to_features(&cards),
                }
            })
            .collect()
    }

    /// Block until players may place tokens.
    ///
    /// # Returns
    ///
    /// * `bool` - Whether the caller had to wait
    pub fn wait_for_placement(&self) -> bool {
        self.placement.wait_on()
    }

    /// Allow or forbid token placement and wake every waiting player.
    pub fn set_placement(&self, allowed: bool) {
        self.placement.set(allowed);
    }

    pub fn placement_allowed(&self) -> bool {
        self.placement.is_on()
    }

    pub fn snapshot(&self) -> TableSnapshot {
        let grid = self.grid.read();
        TableSnapshot {
            slot_to_card: grid.slot_to_card().to_vec(),
            card_to_slot: grid.card_to_slot().to_vec(),
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.grid.read().is_consistent()
    }

    fn simulate_delay(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("grid", &self.grid)
            .field("placement", &self.placement)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        rules::ClassicRules,
        ui::{RecordingUi, UiEvent},
    };

    fn config() -> GameConfig {
        GameConfig {
            human_players: 2,
            computer_players: 0,
            ..GameConfig::default()
        }
    }

    fn table_with(layout: &[Option<Card>]) -> (Table, Arc<RecordingUi>) {
        let ui = Arc::new(RecordingUi::new());
        (Table::with_layout(&config(), ui.clone(), layout), ui)
    }

    #[test]
    fn test_place_and_remove_card_round_trip() {
        let (table, ui) = table_with(&[]);
        let before = table.snapshot();

        table.place_card(17, 4);
        assert_eq!(table.card_at(4), Some(17));
        assert_eq!(table.remove_card(4), Some(17));

        assert_eq!(table.snapshot(), before);
        assert_eq!(
            ui.events(),
            vec![
                UiEvent::PlaceCard { card: 17, slot: 4 },
                UiEvent::RemoveCard { slot: 4 },
            ]
        );
    }

    #[test]
    fn test_remove_card_from_empty_slot_is_silent() {
        let (table, ui) = table_with(&[]);
        assert_eq!(table.remove_card(0), None);
        assert!(ui.events().is_empty());
    }

    #[test]
    fn test_token_needs_a_card() {
        let (table, _) = table_with(&[Some(0), None, Some(2)]);
        assert!(table.place_token_on_card(0, 0));
        assert!(!table.place_token_on_card(0, 1));
        assert!(table.has_token(0, 0));
        assert!(!table.has_token(0, 1));
    }

    #[test]
    fn test_remove_token_noop_leaves_matrix_unchanged() {
        let (table, ui) = table_with(&[Some(0)]);
        assert!(!table.remove_token(1, 0));
        assert!(!table.has_token(1, 0));
        assert!(ui.events().is_empty());
    }

    #[test]
    fn test_selection_snapshots_cards_and_slots() {
        let (table, _) = table_with(&[Some(10), Some(20), Some(30), Some(40)]);
        table.place_token_on_card(1, 3);
        table.place_token_on_card(1, 0);
        table.place_token_on_card(1, 2);

        let selection = table.selection(1).unwrap();
        assert_eq!(selection.player(), 1);
        assert_eq!(selection.slots(), &[0, 2, 3]);
        assert_eq!(selection.cards(), &[10, 30, 40]);
    }

    #[test]
    fn test_selection_is_stale_after_card_removed() {
        let (table, _) = table_with(&[Some(10), Some(20), Some(30)]);
        for slot in 0..3 {
            table.place_token_on_card(0, slot);
        }
        table.remove_card(1);
        assert_eq!(table.selection(0), None);
    }

    #[test]
    fn test_relevance_tracks_current_layout() {
        let (table, _) = table_with(&[Some(10), Some(20), Some(30)]);
        let submission = Submission::new(0, vec![10, 20, 30], vec![0, 1, 2]);
        assert!(table.is_relevant(&submission));

        table.remove_card(2);
        assert!(!table.is_relevant(&submission));

        table.place_card(31, 2);
        assert!(!table.is_relevant(&submission));
    }

    #[test]
    fn test_clear_tokens_reports_each_player() {
        let (table, _) = table_with(&[Some(5)]);
        table.place_token_on_card(0, 0);
        table.place_token_on_card(1, 0);

        let mut owners = Vec::new();
        assert_eq!(table.clear_tokens(0, |p| owners.push(p)), 2);
        assert_eq!(owners, vec![0, 1]);
        assert_eq!(table.clear_tokens(0, |_| panic!("no tokens left")), 0);
    }

    #[test]
    fn test_placement_callback_runs_only_when_placed() {
        let (table, ui) = table_with(&[Some(5), None]);
        let mut placed = 0;
        assert!(table.place_token_on_card_with(1, 0, || placed += 1));
        assert!(!table.place_token_on_card_with(1, 1, || placed += 1));
        assert!(!table.place_token_on_card_with(7, 0, || placed += 1));
        assert_eq!(placed, 1);
        assert_eq!(ui.count(|e| matches!(e, UiEvent::PlaceToken { .. })), 1);
    }

    #[test]
    fn test_clear_waits_for_placement_callback() {
        use std::sync::{
            Barrier,
            atomic::{AtomicUsize, Ordering},
        };

        let (table, _) = table_with(&[Some(5)]);
        let counted = AtomicUsize::new(0);
        let inside = Barrier::new(2);

        thread::scope(|s| {
            s.spawn(|| {
                table.place_token_on_card_with(0, 0, || {
                    inside.wait();
                    thread::sleep(Duration::from_millis(50));
                    counted.fetch_add(1, Ordering::SeqCst);
                });
            });
            inside.wait();
            // The clear cannot run until the callback above has counted.
            table.clear_tokens(0, |_| {
                assert_eq!(counted.fetch_sub(1, Ordering::SeqCst), 1);
            });
        });

        assert_eq!(counted.load(Ordering::SeqCst), 0);
        assert!(!table.has_token(0, 0));
    }

    #[test]
    fn test_return_cards_keeps_table_intact() {
        let (table, _) = table_with(&[Some(3), None, Some(8)]);
        let mut deck = vec![1];
        table.return_cards_to(&mut deck);
        assert_eq!(deck, vec![1, 3, 8]);
        assert_eq!(table.count_cards(), 2);
    }

    #[test]
    fn test_has_match_and_hints() {
        let rules = ClassicRules::default();
        let (table, _) = table_with(&[Some(2), Some(3), Some(0), Some(1)]);
        assert!(table.has_match(&rules));

        let hints = table.hints(&rules);
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].slots, vec![0, 2, 3]);
        assert_eq!(hints[0].features.len(), 3);

        let (empty, _) = table_with(&[Some(0), Some(1), Some(3)]);
        assert!(!empty.has_match(&rules));
        assert!(empty.hints(&rules).is_empty());
    }

    #[test]
    fn test_placement_switch() {
        let (table, _) = table_with(&[]);
        assert!(!table.placement_allowed());
        table.set_placement(true);
        assert!(table.placement_allowed());
        assert!(!table.wait_for_placement());
    }
}
