//! Set logging: turns completion/skip actions into immutable records.

use uuid::Uuid;

use crate::model::{ExercisePlanEntry, SetRecord};

/// Builds `SetRecord`s from the current exercise/set context.
///
/// The logger only constructs records; forwarding to the log sink happens
/// through the controller's notification channel after the transition
/// commits, and is never retried by the engine.
#[derive(Debug, Clone)]
pub struct SetLogger {
    session_id: Uuid,
}

impl SetLogger {
    /// Create a logger bound to one session.
    #[must_use]
    pub fn new(session_id: Uuid) -> Self {
        Self { session_id }
    }

    /// Build a record for a completed set.
    #[must_use]
    pub fn log_completion(
        &self,
        exercise: &ExercisePlanEntry,
        set_number: u32,
        reps: u32,
        weight: Option<f64>,
        notes: Option<String>,
    ) -> SetRecord {
        let mut builder = SetRecord::builder(self.session_id, &exercise.id, set_number).completed(reps);
        if let Some(weight) = weight {
            builder = builder.weight(weight);
        }
        if let Some(notes) = notes {
            builder = builder.notes(notes);
        }
        let record = builder.build();
        tracing::info!(
            exercise = %record.exercise_id,
            set = record.set_number,
            reps,
            weight = ?record.weight,
            "Set completed"
        );
        record
    }

    /// Build a record for a skipped set. Reps are absent by definition.
    #[must_use]
    pub fn log_skip(&self, exercise: &ExercisePlanEntry, set_number: u32) -> SetRecord {
        let record = SetRecord::builder(self.session_id, &exercise.id, set_number).build();
        tracing::info!(
            exercise = %record.exercise_id,
            set = record.set_number,
            "Set skipped"
        );
        record
    }
}
