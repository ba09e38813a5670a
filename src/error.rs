//! Engine error types.
//!
//! Every error is a rejected event: it is raised synchronously from the
//! offending call and leaves session state entirely unchanged, so callers may
//! retry with corrected input.

use crate::model::{Phase, SessionStatus};

/// Errors raised by the session engine.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// The workout plan is empty or malformed at start.
    #[error("Invalid workout template: {0}")]
    InvalidTemplate(String),

    /// The event is not valid for the current session status and phase.
    #[error("{event} is not valid while {status:?} in {phase:?} phase")]
    IllegalState {
        /// The rejected event.
        event: &'static str,
        /// Session status at the time of the event.
        status: SessionStatus,
        /// Phase at the time of the event.
        phase: Phase,
    },

    /// The event payload is malformed.
    #[error("Invalid payload: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_template_display() {
        let err = EngineError::InvalidTemplate("plan has no exercises".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid workout template: plan has no exercises"
        );
    }

    #[test]
    fn test_illegal_state_display() {
        let err = EngineError::IllegalState {
            event: "complete_set",
            status: SessionStatus::Scheduled,
            phase: Phase::Prepare,
        };
        assert!(err.to_string().contains("complete_set"));
        assert!(err.to_string().contains("Scheduled"));
    }

    #[test]
    fn test_validation_display() {
        let err = EngineError::Validation("reps must be non-negative".to_string());
        assert!(err.to_string().contains("reps must be non-negative"));
    }
}
