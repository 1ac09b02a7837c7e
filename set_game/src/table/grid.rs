//! Slot/card bijection and per-player token matrix.

use crate::game::entities::{Card, PlayerId, Slot};
use std::sync::atomic::{AtomicBool, Ordering};

/// Table contents guarded by the table's gate.
///
/// Cards move only through `&mut self` (the gate's writer). Token cells are
/// atomic so a player can flip cells in its own row while other players
/// hold the gate as readers too.
///
/// Invariant: `slot_to_card[s] == Some(c)` iff `card_to_slot[c] == Some(s)`.
#[derive(Debug)]
pub struct Grid {
    slot_to_card: Vec<Option<Card>>,
    card_to_slot: Vec<Option<Slot>>,
    tokens: Vec<Box<[AtomicBool]>>,
}

impl Grid {
    /// Empty table for `players` players.
    pub fn new(players: usize, table_size: usize, deck_size: usize) -> Self {
        Self {
            slot_to_card: vec![None; table_size],
            card_to_slot: vec![None; deck_size],
            tokens: (0..players)
                .map(|_| (0..table_size).map(|_| AtomicBool::new(false)).collect())
                .collect(),
        }
    }

    pub fn table_size(&self) -> usize {
        self.slot_to_card.len()
    }

    pub fn deck_size(&self) -> usize {
        self.card_to_slot.len()
    }

    pub fn players(&self) -> usize {
        self.tokens.len()
    }

    pub fn card_at(&self, slot: Slot) -> Option<Card> {
        self.slot_to_card.get(slot).copied().flatten()
    }

    pub fn slot_of(&self, card: Card) -> Option<Slot> {
        self.card_to_slot.get(card).copied().flatten()
    }

    /// Put `card` on `slot`, evicting whatever the slot held and lifting
    /// the card from any other slot first, so both mappings stay inverse.
    pub fn place_card(&mut self, card: Card, slot: Slot) {
        if let Some(previous) = self.remove_card(slot) {
            log::debug!("slot {slot} still held card {previous} when card {card} was placed");
        }
        if let Some(other) = self.slot_of(card) {
            self.slot_to_card[other] = None;
        }
        self.slot_to_card[slot] = Some(card);
        self.card_to_slot[card] = Some(slot);
    }

    /// Lift the card off `slot`, if there is one.
    pub fn remove_card(&mut self, slot: Slot) -> Option<Card> {
        let card = self.slot_to_card.get_mut(slot)?.take()?;
        self.card_to_slot[card] = None;
        Some(card)
    }

    fn token(&self, player: PlayerId, slot: Slot) -> Option<&AtomicBool> {
        self.tokens.get(player)?.get(slot)
    }

    // Relaxed is enough: the gate's mutex orders accesses across threads,
    // and within a read section each row is only touched by its owner.
    /// Returns whether the cell exists; out-of-range ids are ignored.
    pub fn place_token(&self, player: PlayerId, slot: Slot) -> bool {
        match self.token(player, slot) {
            Some(cell) => {
                cell.store(true, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// Returns whether a token was actually there.
    pub fn remove_token(&self, player: PlayerId, slot: Slot) -> bool {
        self.token(player, slot)
            .is_some_and(|cell| cell.swap(false, Ordering::Relaxed))
    }

    pub fn has_token(&self, player: PlayerId, slot: Slot) -> bool {
        self.token(player, slot)
            .is_some_and(|cell| cell.load(Ordering::Relaxed))
    }

    /// Slots holding a token of `player`, ascending. Empty for an unknown player.
    pub fn tokens_of(&self, player: PlayerId) -> impl Iterator<Item = Slot> + '_ {
        self.tokens
            .get(player)
            .into_iter()
            .flat_map(|row| row.iter().enumerate())
            .filter(|(_, cell)| cell.load(Ordering::Relaxed))
            .map(|(slot, _)| slot)
    }

    /// Cards on the table in slot order.
    pub fn cards(&self) -> Vec<Card> {
        self.slot_to_card.iter().flatten().copied().collect()
    }

    pub fn count_cards(&self) -> usize {
        self.slot_to_card.iter().flatten().count()
    }

    pub fn slot_to_card(&self) -> &[Option<Card>] {
        &self.slot_to_card
    }

    pub fn card_to_slot(&self) -> &[Option<Slot>] {
        &self.card_to_slot
    }

    /// Whether the two mappings are exact inverses.
    pub fn is_consistent(&self) -> bool {
        let forward = self
            .slot_to_card
            .iter()
            .enumerate()
            .all(|(slot, card)| card.is_none_or(|card| self.slot_of(card) == Some(slot)));
        let backward = self
            .card_to_slot
            .iter()
            .enumerate()
            .all(|(card, slot)| slot.is_none_or(|slot| self.card_at(slot) == Some(card)));
        forward && backward
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_and_remove_round_trip() {
        let mut grid = Grid::new(2, 12, 81);
        grid.place_card(40, 5);
        assert_eq!(grid.card_at(5), Some(40));
        assert_eq!(grid.slot_of(40), Some(5));

        assert_eq!(grid.remove_card(5), Some(40));
        assert_eq!(grid.card_at(5), None);
        assert_eq!(grid.slot_of(40), None);
        assert!(grid.is_consistent());
    }

    #[test]
    fn test_remove_from_empty_slot() {
        let mut grid = Grid::new(1, 12, 81);
        assert_eq!(grid.remove_card(3), None);
        assert_eq!(grid.remove_card(99), None);
    }

    #[test]
    fn test_place_over_occupied_slot_keeps_bijection() {
        let mut grid = Grid::new(1, 12, 81);
        grid.place_card(1, 0);
        grid.place_card(2, 0);
        assert_eq!(grid.card_at(0), Some(2));
        assert_eq!(grid.slot_of(1), None);
        assert!(grid.is_consistent());
    }

    #[test]
    fn test_moving_card_clears_old_slot() {
        let mut grid = Grid::new(1, 12, 81);
        grid.place_card(7, 0);
        grid.place_card(7, 4);
        assert_eq!(grid.card_at(0), None);
        assert_eq!(grid.slot_of(7), Some(4));
        assert!(grid.is_consistent());
    }

    #[test]
    fn test_remove_token_is_idempotent() {
        let grid = Grid::new(2, 12, 81);
        grid.place_token(1, 3);
        assert!(grid.remove_token(1, 3));
        assert!(!grid.remove_token(1, 3));
        assert!(!grid.has_token(1, 3));
        assert_eq!(grid.tokens_of(1).count(), 0);
    }

    #[test]
    fn test_tokens_are_per_player() {
        let grid = Grid::new(2, 12, 81);
        grid.place_token(0, 2);
        grid.place_token(0, 9);
        grid.place_token(1, 2);
        assert_eq!(grid.tokens_of(0).collect::<Vec<_>>(), vec![2, 9]);
        assert_eq!(grid.tokens_of(1).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_out_of_range_tokens_are_ignored() {
        let grid = Grid::new(2, 12, 81);
        assert!(!grid.place_token(2, 0));
        assert!(!grid.place_token(0, 12));
        assert!(!grid.remove_token(5, 3));
        assert!(!grid.remove_token(1, 40));
        assert!(!grid.has_token(9, 9));
        assert!(!grid.has_token(0, 12));
        assert_eq!(grid.tokens_of(7).count(), 0);
        assert!((0..2).all(|player| grid.tokens_of(player).count() == 0));
    }
}
