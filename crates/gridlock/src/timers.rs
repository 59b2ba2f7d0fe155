//! Single-shot deadlines owned by the controller.
//!
//! At most one timer of each kind is pending; scheduling replaces the
//! previous deadline of that kind.

use std::time::Instant;
use tracing::debug;

/// The deferred actions a match knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Clear the board after a result.
    AutoReset,
    /// Let the computer move.
    ComputerMove,
}

/// Pending deadlines.
#[derive(Debug, Clone, Default)]
pub struct Timers {
    auto_reset: Option<Instant>,
    computer_move: Option<Instant>,
}

impl Timers {
    fn slot(&mut self, kind: TimerKind) -> &mut Option<Instant> {
        match kind {
            TimerKind::AutoReset => &mut self.auto_reset,
            TimerKind::ComputerMove => &mut self.computer_move,
        }
    }

    /// Sets the deadline for `kind`, replacing any pending one.
    /// Returns true if one was replaced.
    pub fn schedule(&mut self, kind: TimerKind, at: Instant) -> bool {
        let replaced = self.slot(kind).replace(at).is_some();
        debug!(?kind, replaced, "Timer scheduled");
        replaced
    }

    /// Drops the pending deadline for `kind`.
    pub fn cancel(&mut self, kind: TimerKind) {
        if self.slot(kind).take().is_some() {
            debug!(?kind, "Timer cancelled");
        }
    }

    /// Drops every pending deadline.
    pub fn cancel_all(&mut self) {
        self.cancel(TimerKind::AutoReset);
        self.cancel(TimerKind::ComputerMove);
    }

    /// Pending deadline for `kind`.
    pub fn deadline(&self, kind: TimerKind) -> Option<Instant> {
        match kind {
            TimerKind::AutoReset => self.auto_reset,
            TimerKind::ComputerMove => self.computer_move,
        }
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.auto_reset, self.computer_move].into_iter().flatten().min()
    }

    /// Removes and returns the timers due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<TimerKind> {
        let mut due: Vec<(Instant, TimerKind)> = [TimerKind::AutoReset, TimerKind::ComputerMove]
            .into_iter()
            .filter_map(|kind| self.deadline(kind).map(|at| (at, kind)))
            .filter(|(at, _)| *at <= now)
            .collect();
        due.sort_by_key(|(at, _)| *at);
        for (_, kind) in &due {
            self.slot(*kind).take();
        }
        due.into_iter().map(|(_, kind)| kind).collect()
    }
}
