//! Progress tracking over planned sets.

use crate::model::ProgressSnapshot;

/// Derives a completion percentage from processed sets vs. planned sets.
///
/// Both completions and skips count as processed: progress reflects session
/// advancement, not purely successful performance. The count never decreases,
/// so progress is monotonically non-decreasing for the session's lifetime.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    processed_sets: u32,
    total_sets: u32,
}

impl ProgressTracker {
    /// Create a tracker over the given planned-set total.
    #[must_use]
    pub fn new(total_sets: u32) -> Self {
        Self {
            processed_sets: 0,
            total_sets,
        }
    }

    /// Record one processed set.
    pub fn record_set(&mut self) {
        self.processed_sets = self.processed_sets.saturating_add(1);
    }

    /// Sets processed so far.
    #[must_use]
    pub fn processed_sets(&self) -> u32 {
        self.processed_sets
    }

    /// Current progress percentage, capped at 100.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total_sets == 0 {
            return 0.0;
        }
        (f64::from(self.processed_sets) / f64::from(self.total_sets) * 100.0).min(100.0)
    }

    /// Snapshot of the current progress state.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            processed_sets: self.processed_sets,
            total_sets: self.total_sets,
            percent: self.percent(),
        }
    }
}
