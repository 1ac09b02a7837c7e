//! Display collaborator driven by the actors.
//!
//! The core only fires display calls and never reads anything back, so a
//! display can be swapped without touching game logic. [`LogUi`] renders
//! every call as a log record; [`RecordingUi`] keeps them for inspection.

use super::entities::{Card, PlayerId, Score, Slot};
use parking_lot::Mutex;

/// Fire-and-forget display operations
pub trait Ui: Send + Sync {
    fn place_card(&self, card: Card, slot: Slot);
    fn remove_card(&self, slot: Slot);
    fn place_token(&self, player: PlayerId, slot: Slot);
    fn remove_token(&self, player: PlayerId, slot: Slot);
    fn set_score(&self, player: PlayerId, score: Score);
    /// Remaining freeze for `player`; 0 clears it.
    fn set_freeze(&self, player: PlayerId, millis: u64);
    fn set_countdown(&self, millis: u64, warn: bool);
    fn set_elapsed(&self, millis: u64);
    fn announce_winners(&self, players: &[PlayerId]);
    fn dispose(&self);
}

/// Display that writes through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogUi;

impl Ui for LogUi {
    fn place_card(&self, card: Card, slot: Slot) {
        log::trace!("card {card} placed on slot {slot}");
    }

    fn remove_card(&self, slot: Slot) {
        log::trace!("card removed from slot {slot}");
    }

    fn place_token(&self, player: PlayerId, slot: Slot) {
        log::trace!("player {player} placed a token on slot {slot}");
    }

    fn remove_token(&self, player: PlayerId, slot: Slot) {
        log::trace!("player {player} removed a token from slot {slot}");
    }

    fn set_score(&self, player: PlayerId, score: Score) {
        log::info!("player {player} score: {score}");
    }

    fn set_freeze(&self, player: PlayerId, millis: u64) {
        log::trace!("player {player} frozen for {millis}ms");
    }

    fn set_countdown(&self, millis: u64, warn: bool) {
        if warn {
            log::debug!("countdown: {millis}ms (hurry up)");
        } else {
            log::trace!("countdown: {millis}ms");
        }
    }

    fn set_elapsed(&self, millis: u64) {
        log::trace!("elapsed: {millis}ms");
    }

    fn announce_winners(&self, players: &[PlayerId]) {
        match players {
            [winner] => log::info!("player {winner} won"),
            _ => log::info!("tie between players {players:?}"),
        }
    }

    fn dispose(&self) {
        log::debug!("display disposed");
    }
}

/// One display call, as captured by [`RecordingUi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    PlaceCard { card: Card, slot: Slot },
    RemoveCard { slot: Slot },
    PlaceToken { player: PlayerId, slot: Slot },
    RemoveToken { player: PlayerId, slot: Slot },
    SetScore { player: PlayerId, score: Score },
    SetFreeze { player: PlayerId, millis: u64 },
    SetCountdown { millis: u64, warn: bool },
    SetElapsed { millis: u64 },
    AnnounceWinners { players: Vec<PlayerId> },
    Dispose,
}

/// Display that records every call in order
#[derive(Debug, Default)]
pub struct RecordingUi {
    events: Mutex<Vec<UiEvent>>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event recorded so far
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().clone()
    }

    /// Number of recorded events matching `predicate`
    pub fn count(&self, predicate: impl Fn(&UiEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| predicate(e)).count()
    }

    /// Winners from the last announcement, if any
    pub fn winners(&self) -> Option<Vec<PlayerId>> {
        self.events.lock().iter().rev().find_map(|event| match event {
            UiEvent::AnnounceWinners { players } => Some(players.clone()),
            _ => None,
        })
    }

    fn record(&self, event: UiEvent) {
        self.events.lock().push(event);
    }
}

impl Ui for RecordingUi {
    fn place_card(&self, card: Card, slot: Slot) {
        self.record(UiEvent::PlaceCard { card, slot });
    }

    fn remove_card(&self, slot: Slot) {
        self.record(UiEvent::RemoveCard { slot });
    }

    fn place_token(&self, player: PlayerId, slot: Slot) {
        self.record(UiEvent::PlaceToken { player, slot });
    }

    fn remove_token(&self, player: PlayerId, slot: Slot) {
        self.record(UiEvent::RemoveToken { player, slot });
    }

    fn set_score(&self, player: PlayerId, score: Score) {
        self.record(UiEvent::SetScore { player, score });
    }

    fn set_freeze(&self, player: PlayerId, millis: u64) {
        self.record(UiEvent::SetFreeze { player, millis });
    }

    fn set_countdown(&self, millis: u64, warn: bool) {
        self.record(UiEvent::SetCountdown { millis, warn });
    }

    fn set_elapsed(&self, millis: u64) {
        self.record(UiEvent::SetElapsed { millis });
    }

    fn announce_winners(&self, players: &[PlayerId]) {
        self.record(UiEvent::AnnounceWinners {
            players: players.to_vec(),
        });
    }

    fn dispose(&self) {
        self.record(UiEvent::Dispose);
    }
}
