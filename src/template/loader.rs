//! Workout template file loader.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::{ExercisePlanEntry, Session};

/// Errors that can occur loading a workout template.
#[derive(thiserror::Error, Debug)]
pub enum TemplateError {
    /// Failed to read the template file.
    #[error("Failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the template TOML.
    #[error("Failed to parse template: {0}")]
    Parse(#[from] toml::de::Error),

    /// The template parsed but is not a usable workout.
    #[error("Invalid template: {0}")]
    Invalid(String),
}

/// A workout template: an ordered exercise plan plus display metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    /// Template name.
    pub name: String,
    /// Optional description shown before starting.
    #[serde(default)]
    pub description: Option<String>,
    /// Ordered exercise entries.
    #[serde(default, rename = "exercise")]
    pub exercises: Vec<ExercisePlanEntry>,
}

impl WorkoutTemplate {
    /// Load and validate a template from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `Read` if the file cannot be read, `Parse` for malformed
    /// TOML, or `Invalid` if the workout fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let template = Self::parse(&contents)?;
        tracing::debug!(
            template = %template.name,
            exercises = template.exercises.len(),
            "Loaded workout template"
        );
        Ok(template)
    }

    /// Parse and validate a template from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `Parse` for malformed TOML or `Invalid` for an unusable
    /// workout.
    pub fn parse(contents: &str) -> Result<Self, TemplateError> {
        let template: Self = toml::from_str(contents)?;
        template.validate()?;
        Ok(template)
    }

    /// Validate the template: at least one exercise, every entry with at
    /// least one set, and no duplicate exercise ids.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` naming the first offending entry.
    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.exercises.is_empty() {
            return Err(TemplateError::Invalid(
                "template has no exercises".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for entry in &self.exercises {
            if entry.id.is_empty() {
                return Err(TemplateError::Invalid(
                    "exercise with empty id".to_string(),
                ));
            }
            if entry.target_sets == 0 {
                return Err(TemplateError::Invalid(format!(
                    "exercise '{}' has zero target sets",
                    entry.id
                )));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(TemplateError::Invalid(format!(
                    "duplicate exercise id '{}'",
                    entry.id
                )));
            }
        }
        Ok(())
    }

    /// Total number of planned sets.
    #[must_use]
    pub fn total_sets(&self) -> u32 {
        self.exercises.iter().map(|e| e.target_sets).sum()
    }

    /// Snapshot the template into a scheduled session.
    #[must_use]
    pub fn into_session(self) -> Session {
        Session::from_template(self.name, self.exercises)
    }
}

/// Default directory for user workout templates.
///
/// This is `~/.config/workout-engine/templates` on Unix systems.
#[must_use]
pub fn default_template_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("workout-engine")
        .join("templates")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
        name = "Push Day"
        description = "Chest and triceps"

        [[exercise]]
        id = "bench-press"
        name = "Bench Press"
        section = "main"
        target_sets = 3
        target_reps = 8
        target_weight = 60.0
        rest_seconds = 90

        [[exercise]]
        id = "dips"
        name = "Dips"
        target_sets = 2
        target_reps = 12
        rest_seconds = 60
    "#;

    #[test]
    fn test_parse_sample() {
        let template = WorkoutTemplate::parse(SAMPLE).unwrap();
        assert_eq!(template.name, "Push Day");
        assert_eq!(template.exercises.len(), 2);
        assert_eq!(template.exercises[0].target_weight, Some(60.0));
        assert_eq!(template.total_sets(), 5);
    }

    #[test]
    fn test_parse_rejects_empty_template() {
        let result = WorkoutTemplate::parse("name = \"Empty\"");
        assert!(matches!(result, Err(TemplateError::Invalid(_))));
    }

    #[test]
    fn test_parse_rejects_zero_sets() {
        let toml = r#"
            name = "Bad"
            [[exercise]]
            id = "x"
            name = "X"
            target_sets = 0
            target_reps = 10
        "#;
        let result = WorkoutTemplate::parse(toml);
        assert!(matches!(result, Err(TemplateError::Invalid(_))));
    }

    #[test]
    fn test_parse_rejects_duplicate_ids() {
        let toml = r#"
            name = "Bad"
            [[exercise]]
            id = "x"
            name = "X"
            target_sets = 2
            target_reps = 10
            [[exercise]]
            id = "x"
            name = "X again"
            target_sets = 2
            target_reps = 10
        "#;
        let result = WorkoutTemplate::parse(toml);
        assert!(matches!(result, Err(TemplateError::Invalid(_))));
    }

    #[test]
    fn test_parse_rejects_malformed_toml() {
        let result = WorkoutTemplate::parse("not [ valid");
        assert!(matches!(result, Err(TemplateError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = WorkoutTemplate::load("/nonexistent/template.toml");
        assert!(matches!(result, Err(TemplateError::Read { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let template = WorkoutTemplate::load(file.path()).unwrap();
        assert_eq!(template.name, "Push Day");
    }

    #[test]
    fn test_into_session() {
        let template = WorkoutTemplate::parse(SAMPLE).unwrap();
        let session = template.into_session();
        assert_eq!(session.template_name.as_deref(), Some("Push Day"));
        assert_eq!(session.plan.len(), 2);
        assert_eq!(session.total_sets(), 5);
    }

    #[test]
    fn test_default_template_dir() {
        let dir = default_template_dir();
        assert!(dir.ends_with("workout-engine/templates"));
    }
}
