//! Exercise sequencer: owns the current exercise/set position and computes
//! what comes next after each processed set.

use crate::model::ExercisePlanEntry;

/// Outcome of advancing past a processed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the next set of the same exercise, entering a timed rest.
    NextSetWithRest {
        /// Rest duration for the current exercise.
        rest_seconds: u32,
    },
    /// Moved to the next set of the same exercise without rest.
    NextSet,
    /// Moved to the first set of the next exercise. Rest is never inserted
    /// between exercises.
    NextExercise,
    /// The last set of the last exercise was processed.
    PlanExhausted,
}

/// Owns `(exercise_index, set_number)` and the advance algorithm.
#[derive(Debug, Clone)]
pub struct ExerciseSequencer {
    exercise_index: usize,
    set_number: u32,
}

impl Default for ExerciseSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseSequencer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            exercise_index: 0,
            set_number: 1,
        }
    }

    /// Current exercise index (0-based).
    #[must_use]
    pub fn exercise_index(&self) -> usize {
        self.exercise_index
    }

    /// Current set number (1-based).
    #[must_use]
    pub fn set_number(&self) -> u32 {
        self.set_number
    }

    /// Advance past a just-processed set.
    ///
    /// A completed set opens a rest before the next set of the same exercise;
    /// a skipped set bypasses rest entirely. Crossing into the next exercise
    /// never inserts rest, regardless of the action.
    pub fn advance(&mut self, plan: &[ExercisePlanEntry], completed: bool) -> Advance {
        let entry = &plan[self.exercise_index];

        if self.set_number < entry.target_sets {
            self.set_number += 1;
            tracing::debug!(
                exercise = %entry.id,
                set = self.set_number,
                "Advanced to next set"
            );
            if completed {
                return Advance::NextSetWithRest {
                    rest_seconds: entry.rest_seconds,
                };
            }
            return Advance::NextSet;
        }

        if self.exercise_index < plan.len() - 1 {
            self.exercise_index += 1;
            self.set_number = 1;
            tracing::debug!(
                exercise = %plan[self.exercise_index].id,
                "Advanced to next exercise"
            );
            return Advance::NextExercise;
        }

        tracing::debug!("Plan exhausted");
        Advance::PlanExhausted
    }

    /// Move focus forward one exercise, clamped to the last entry.
    ///
    /// Always resets the set number to 1, clamped or not; only the index
    /// move itself is a no-op at the boundary. Returns true if the index
    /// changed.
    pub fn next_exercise(&mut self, plan: &[ExercisePlanEntry]) -> bool {
        self.set_number = 1;
        if self.exercise_index + 1 < plan.len() {
            self.exercise_index += 1;
            return true;
        }
        false
    }

    /// Move focus back one exercise, clamped to the first entry.
    ///
    /// Always resets the set number to 1, clamped or not; only the index
    /// move itself is a no-op at the boundary. Returns true if the index
    /// changed.
    pub fn previous_exercise(&mut self) -> bool {
        self.set_number = 1;
        if self.exercise_index > 0 {
            self.exercise_index -= 1;
            return true;
        }
        false
    }
}
