//! Immutable performance records emitted by the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable log of one attempted set.
///
/// Exactly one record is emitted per complete/skip action. Records are never
/// retried, mutated, or deleted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetRecord {
    /// Unique record ID.
    pub id: Uuid,
    /// Session the record belongs to.
    pub session_id: Uuid,
    /// Exercise the set belongs to.
    pub exercise_id: String,
    /// Set number within the exercise (1-based).
    pub set_number: u32,
    /// Repetitions completed. Absent for a skipped set.
    pub reps: Option<u32>,
    /// Weight used in kilograms, if any.
    pub weight: Option<f64>,
    /// True for a logged completion, false for a skip.
    pub completed: bool,
    /// Free-text notes.
    pub notes: Option<String>,
    /// When the record was created.
    pub recorded_at: DateTime<Utc>,
}

impl SetRecord {
    /// Create a new builder for a set record.
    #[must_use]
    pub fn builder(session_id: Uuid, exercise_id: impl Into<String>, set_number: u32) -> SetRecordBuilder {
        SetRecordBuilder::new(session_id, exercise_id, set_number)
    }
}

/// Builder for creating set records.
#[derive(Debug, Clone)]
pub struct SetRecordBuilder {
    session_id: Uuid,
    exercise_id: String,
    set_number: u32,
    reps: Option<u32>,
    weight: Option<f64>,
    completed: bool,
    notes: Option<String>,
}

impl SetRecordBuilder {
    /// Create a new builder with required fields. Defaults to a skip.
    pub fn new(session_id: Uuid, exercise_id: impl Into<String>, set_number: u32) -> Self {
        Self {
            session_id,
            exercise_id: exercise_id.into(),
            set_number,
            reps: None,
            weight: None,
            completed: false,
            notes: None,
        }
    }

    /// Mark the set completed with the given rep count.
    #[must_use]
    pub fn completed(mut self, reps: u32) -> Self {
        self.completed = true;
        self.reps = Some(reps);
        self
    }

    /// Set the weight used.
    #[must_use]
    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Set free-text notes.
    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Build the record, stamping it with the current time.
    #[must_use]
    pub fn build(self) -> SetRecord {
        SetRecord {
            id: Uuid::new_v4(),
            session_id: self.session_id,
            exercise_id: self.exercise_id,
            set_number: self.set_number,
            reps: self.reps,
            weight: self.weight,
            completed: self.completed,
            notes: self.notes,
            recorded_at: Utc::now(),
        }
    }
}

/// End-of-session subjective ratings, captured exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    /// How hard the session felt, 1-5.
    pub difficulty: u8,
    /// Energy level during the session, 1-5.
    pub energy: u8,
    /// How enjoyable the session was, 1-5.
    pub enjoyment: u8,
    /// Free-text notes.
    pub notes: Option<String>,
    /// When the feedback was submitted.
    pub submitted_at: DateTime<Utc>,
}

impl Feedback {
    /// Create feedback with the given ratings, stamped with the current time.
    #[must_use]
    pub fn new(difficulty: u8, energy: u8, enjoyment: u8, notes: Option<String>) -> Self {
        Self {
            difficulty,
            energy,
            enjoyment,
            notes,
            submitted_at: Utc::now(),
        }
    }

    /// Whether all ratings fall within the 1-5 scale.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let in_range = |r: u8| (1..=5).contains(&r);
        in_range(self.difficulty) && in_range(self.energy) && in_range(self.enjoyment)
    }
}

/// Derived completion snapshot. Not stored; recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Sets processed so far (completed or skipped).
    pub processed_sets: u32,
    /// Total planned sets across the whole session.
    pub total_sets: u32,
    /// Processed over total, as a percentage capped at 100.
    pub percent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder_skip() {
        let session_id = Uuid::new_v4();
        let record = SetRecord::builder(session_id, "squat", 2).build();

        assert_eq!(record.session_id, session_id);
        assert_eq!(record.exercise_id, "squat");
        assert_eq!(record.set_number, 2);
        assert!(!record.completed);
        assert!(record.reps.is_none());
        assert!(record.weight.is_none());
        assert!(record.notes.is_none());
    }

    #[test]
    fn test_record_builder_completed() {
        let record = SetRecord::builder(Uuid::new_v4(), "bench", 1)
            .completed(8)
            .weight(62.5)
            .notes("felt heavy")
            .build();

        assert!(record.completed);
        assert_eq!(record.reps, Some(8));
        assert_eq!(record.weight, Some(62.5));
        assert_eq!(record.notes.as_deref(), Some("felt heavy"));
    }

    #[test]
    fn test_record_serialize() {
        let record = SetRecord::builder(Uuid::new_v4(), "row", 3)
            .completed(12)
            .build();

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"exercise_id\":\"row\""));
        assert!(json.contains("\"completed\":true"));

        let parsed: SetRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, record.id);
        assert_eq!(parsed.reps, Some(12));
    }

    #[test]
    fn test_feedback_valid_range() {
        assert!(Feedback::new(1, 5, 3, None).is_valid());
        assert!(!Feedback::new(0, 5, 3, None).is_valid());
        assert!(!Feedback::new(4, 6, 3, None).is_valid());
    }

    #[test]
    fn test_feedback_serialize() {
        let feedback = Feedback::new(4, 4, 5, Some("good session".to_string()));
        let json = serde_json::to_string(&feedback).unwrap();
        assert!(json.contains("\"difficulty\":4"));
        assert!(json.contains("\"notes\":\"good session\""));
    }
}
