//! Phase timer: the sole time source for an active session.

use serde::{Deserialize, Serialize};

use crate::model::Phase;

/// Per-phase clock state.
///
/// Elapsed resets to 0 on every phase change. The target is only meaningful
/// in `Rest`, where it holds the current exercise's rest duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseState {
    /// Current phase.
    pub phase: Phase,
    /// Seconds elapsed within the current phase.
    pub elapsed: u32,
    /// Target seconds for the phase, if timed.
    pub target: Option<u32>,
    /// Whether the clock is accruing time.
    pub running: bool,
}

/// Tracks elapsed seconds within the current phase.
#[derive(Debug, Clone, Default)]
pub struct PhaseTimer {
    state: PhaseState,
}

impl PhaseTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase clock state.
    #[must_use]
    pub fn state(&self) -> PhaseState {
        self.state
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Whether the clock is accruing time.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Enter an untimed phase, resetting phase-elapsed to 0.
    pub fn set_phase(&mut self, phase: Phase) {
        tracing::debug!(from = ?self.state.phase, to = ?phase, "Phase transition");
        self.state.phase = phase;
        self.state.elapsed = 0;
        self.state.target = None;
    }

    /// Enter a timed rest phase with the given target duration.
    pub fn start_rest(&mut self, target_seconds: u32) {
        tracing::debug!(from = ?self.state.phase, target_seconds, "Entering rest");
        self.state.phase = Phase::Rest;
        self.state.elapsed = 0;
        self.state.target = Some(target_seconds);
    }

    /// Start or resume the clock. Idempotent.
    pub fn run(&mut self) {
        self.state.running = true;
    }

    /// Stop the clock without changing phase. Idempotent.
    pub fn pause(&mut self) {
        self.state.running = false;
    }

    /// Advance the phase clock by one second.
    ///
    /// Returns true if this tick reached or passed a timed phase's target.
    pub fn tick(&mut self) -> bool {
        if !self.state.running {
            return false;
        }
        self.state.elapsed = self.state.elapsed.saturating_add(1);
        self.state
            .target
            .is_some_and(|target| self.state.elapsed >= target)
    }
}
