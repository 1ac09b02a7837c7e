//! Round clock: countdown, count-up, or no clock at all.

use crate::game::ui::Ui;
use std::time::{Duration, Instant};

/// Poll interval while the countdown is far from the warning threshold, and
/// always in count-up mode.
const SLOW_POLL: Duration = Duration::from_secs(1);

/// Poll interval right after a reset and inside the warning window.
const FAST_POLL: Duration = Duration::from_millis(10);

/// How the round timeout configuration is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockMode {
    /// Rounds end when the timeout elapses.
    Countdown(Duration),
    /// Time since the last reset is displayed; rounds end when the table
    /// holds no match.
    CountUp,
    /// No display; rounds end when the table holds no match.
    Disabled,
}

impl ClockMode {
    /// Positive is a countdown, zero counts up, negative disables the clock.
    pub fn from_millis(millis: i64) -> Self {
        match millis {
            m if m > 0 => Self::Countdown(Duration::from_millis(m.unsigned_abs())),
            0 => Self::CountUp,
            _ => Self::Disabled,
        }
    }
}

/// Deadline tracking for one round.
#[derive(Debug)]
pub struct RoundClock {
    mode: ClockMode,
    warning: Duration,
    started: Instant,
    deadline: Option<Instant>,
    fresh: bool,
}

impl RoundClock {
    pub fn new(mode: ClockMode, warning: Duration) -> Self {
        let now = Instant::now();
        Self {
            mode,
            warning,
            started: now,
            deadline: None,
            fresh: true,
        }
    }

    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    /// Restart the round timer from now.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.started = now;
        self.deadline = match self.mode {
            ClockMode::Countdown(timeout) => Some(now + timeout),
            ClockMode::CountUp | ClockMode::Disabled => None,
        };
        self.fresh = true;
    }

    pub fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn in_warning(&self) -> bool {
        self.remaining().is_some_and(|r| r <= self.warning)
    }

    /// How long the dealer may sleep before refreshing the display.
    ///
    /// # Returns
    ///
    /// * `Option<Duration>` - `None` means sleep until woken by a submission
    pub fn next_poll(&mut self) -> Option<Duration> {
        let poll = match self.mode {
            ClockMode::Disabled => None,
            ClockMode::CountUp => Some(SLOW_POLL),
            ClockMode::Countdown(_) if self.fresh || self.in_warning() => Some(FAST_POLL),
            ClockMode::Countdown(_) => Some(SLOW_POLL),
        };
        self.fresh = false;
        poll
    }

    /// Show the full timeout, or zero elapsed time.
    pub fn display_reset(&self, ui: &dyn Ui) {
        match self.mode {
            ClockMode::Countdown(timeout) => ui.set_countdown(millis(timeout), false),
            ClockMode::CountUp => ui.set_elapsed(0),
            ClockMode::Disabled => {}
        }
    }

    /// Show the time left (with the warning flag) or the time elapsed.
    pub fn display(&self, ui: &dyn Ui) {
        match self.mode {
            ClockMode::Countdown(_) => {
                let remaining = self.remaining().unwrap_or_default();
                if remaining.is_zero() {
                    ui.set_countdown(0, true);
                } else {
                    ui.set_countdown(millis(remaining), remaining <= self.warning);
                }
            }
            ClockMode::CountUp => ui.set_elapsed(millis(self.elapsed())),
            ClockMode::Disabled => {}
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
