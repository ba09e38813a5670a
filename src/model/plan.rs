//! Exercise plan entries consumed from a workout template.

use serde::{Deserialize, Serialize};

/// Section of a workout an exercise belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Warmup,
    #[default]
    Main,
    Cooldown,
}

impl Section {
    /// Returns the string representation for database storage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warmup => "warmup",
            Self::Main => "main",
            Self::Cooldown => "cooldown",
        }
    }
}

/// One exercise's configuration within a session's fixed sequence.
///
/// Snapshotted from the template at session start and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExercisePlanEntry {
    /// Stable exercise identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Which section of the workout this entry belongs to.
    #[serde(default)]
    pub section: Section,
    /// Number of sets to perform. Always at least 1.
    pub target_sets: u32,
    /// Target repetitions per set.
    pub target_reps: u32,
    /// Target weight in kilograms, if applicable.
    #[serde(default)]
    pub target_weight: Option<f64>,
    /// Rest duration between sets of this exercise, in seconds.
    #[serde(default)]
    pub rest_seconds: u32,
    /// Superset/circuit group tag, if the exercise is grouped.
    #[serde(default)]
    pub group: Option<String>,
    /// Instructional text shown during the exercise.
    #[serde(default)]
    pub instructions: Option<String>,
}

impl ExercisePlanEntry {
    /// Create a plain entry with the given sets/reps/rest configuration.
    #[must_use]
    pub fn new(id: impl Into<String>, target_sets: u32, target_reps: u32, rest_seconds: u32) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            section: Section::Main,
            target_sets,
            target_reps,
            target_weight: None,
            rest_seconds,
            group: None,
            instructions: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_as_str() {
        assert_eq!(Section::Warmup.as_str(), "warmup");
        assert_eq!(Section::Main.as_str(), "main");
        assert_eq!(Section::Cooldown.as_str(), "cooldown");
    }

    #[test]
    fn test_section_serialize() {
        let json = serde_json::to_string(&Section::Cooldown).unwrap();
        assert_eq!(json, "\"cooldown\"");

        let parsed: Section = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Section::Cooldown);
    }

    #[test]
    fn test_entry_new_defaults() {
        let entry = ExercisePlanEntry::new("squat", 3, 8, 90);
        assert_eq!(entry.id, "squat");
        assert_eq!(entry.name, "squat");
        assert_eq!(entry.section, Section::Main);
        assert_eq!(entry.target_sets, 3);
        assert_eq!(entry.target_reps, 8);
        assert_eq!(entry.rest_seconds, 90);
        assert!(entry.target_weight.is_none());
        assert!(entry.group.is_none());
    }

    #[test]
    fn test_entry_deserialize_minimal() {
        let toml = r#"
            id = "bench-press"
            name = "Bench Press"
            target_sets = 4
            target_reps = 6
        "#;
        let entry: ExercisePlanEntry = toml::from_str(toml).unwrap();
        assert_eq!(entry.id, "bench-press");
        assert_eq!(entry.section, Section::Main);
        assert_eq!(entry.rest_seconds, 0);
    }
}
