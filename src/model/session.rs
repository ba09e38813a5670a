//! Session state and lifecycle types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ExercisePlanEntry;

/// Lifecycle status of a workout session.
///
/// Transitions are one-directional: `Scheduled -> InProgress -> {Completed |
/// Cancelled}`, plus `Scheduled -> Cancelled` for abandoning before start.
/// `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl SessionStatus {
    /// Returns the string representation for database storage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether this status admits no further transitions.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// Sub-state of an active session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Idle, waiting for the next action.
    #[default]
    Prepare,
    /// Working a set.
    Exercise,
    /// Timed pause between sets of the same exercise.
    Rest,
}

impl Phase {
    /// Returns the string representation for display and storage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prepare => "prepare",
            Self::Exercise => "exercise",
            Self::Rest => "rest",
        }
    }
}

/// A workout session over a fixed exercise plan.
///
/// The plan is snapshotted at construction and never mutated afterwards.
/// While `InProgress`, `exercise_index` stays within the plan and
/// `set_number` stays within `[1, target_sets]` of the current entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session ID.
    pub id: Uuid,
    /// Template the session was created from, if any.
    pub template_name: Option<String>,
    /// Ordered exercise plan, fixed for the session's lifetime.
    pub plan: Vec<ExercisePlanEntry>,
    /// Current lifecycle status.
    pub status: SessionStatus,
    /// Set when the session transitions to `InProgress`.
    pub started_at: Option<DateTime<Utc>>,
    /// Set when the session reaches a terminal status.
    pub ended_at: Option<DateTime<Utc>>,
    /// Index of the exercise currently in focus (0-based).
    pub exercise_index: usize,
    /// Set currently in focus within the exercise (1-based).
    pub set_number: u32,
    /// Cumulative running time in seconds, excluding paused time.
    pub elapsed_seconds: u64,
}

impl Session {
    /// Create a scheduled session over the given plan.
    #[must_use]
    pub fn new(plan: Vec<ExercisePlanEntry>) -> Self {
        Self {
            id: Uuid::new_v4(),
            template_name: None,
            plan,
            status: SessionStatus::Scheduled,
            started_at: None,
            ended_at: None,
            exercise_index: 0,
            set_number: 1,
            elapsed_seconds: 0,
        }
    }

    /// Create a scheduled session tagged with its template name.
    #[must_use]
    pub fn from_template(name: impl Into<String>, plan: Vec<ExercisePlanEntry>) -> Self {
        Self {
            template_name: Some(name.into()),
            ..Self::new(plan)
        }
    }

    /// The plan entry currently in focus.
    ///
    /// Returns `None` only if the plan is empty, which `start()` rejects.
    #[must_use]
    pub fn current_exercise(&self) -> Option<&ExercisePlanEntry> {
        self.plan.get(self.exercise_index)
    }

    /// Total number of planned sets across all entries.
    #[must_use]
    pub fn total_sets(&self) -> u32 {
        self.plan.iter().map(|e| e.target_sets).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_exercise_plan() -> Vec<ExercisePlanEntry> {
        vec![
            ExercisePlanEntry::new("a", 2, 10, 30),
            ExercisePlanEntry::new("b", 3, 8, 60),
        ]
    }

    #[test]
    fn test_status_as_str() {
        assert_eq!(SessionStatus::Scheduled.as_str(), "scheduled");
        assert_eq!(SessionStatus::InProgress.as_str(), "in_progress");
        assert_eq!(SessionStatus::Completed.as_str(), "completed");
        assert_eq!(SessionStatus::Cancelled.as_str(), "cancelled");
    }

    #[test]
    fn test_status_terminal() {
        assert!(!SessionStatus::Scheduled.is_terminal());
        assert!(!SessionStatus::InProgress.is_terminal());
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_phase_as_str() {
        assert_eq!(Phase::Prepare.as_str(), "prepare");
        assert_eq!(Phase::Exercise.as_str(), "exercise");
        assert_eq!(Phase::Rest.as_str(), "rest");
    }

    #[test]
    fn test_session_new() {
        let session = Session::new(two_exercise_plan());
        assert!(!session.id.is_nil());
        assert_eq!(session.status, SessionStatus::Scheduled);
        assert_eq!(session.exercise_index, 0);
        assert_eq!(session.set_number, 1);
        assert_eq!(session.elapsed_seconds, 0);
        assert!(session.started_at.is_none());
        assert!(session.ended_at.is_none());
    }

    #[test]
    fn test_session_total_sets() {
        let session = Session::new(two_exercise_plan());
        assert_eq!(session.total_sets(), 5);
    }

    #[test]
    fn test_session_current_exercise() {
        let session = Session::new(two_exercise_plan());
        assert_eq!(session.current_exercise().unwrap().id, "a");

        let empty = Session::new(Vec::new());
        assert!(empty.current_exercise().is_none());
    }

    #[test]
    fn test_session_from_template() {
        let session = Session::from_template("push-day", two_exercise_plan());
        assert_eq!(session.template_name.as_deref(), Some("push-day"));
    }

    #[test]
    fn test_session_serialize() {
        let session = Session::new(two_exercise_plan());
        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"status\":\"scheduled\""));

        let parsed: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, session.id);
        assert_eq!(parsed.plan.len(), 2);
    }
}
