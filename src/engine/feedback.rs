//! End-of-session feedback collection.

use crate::error::EngineError;
use crate::model::{Feedback, Phase, SessionStatus};

/// Accepts exactly one feedback submission per session.
///
/// The collector opens when the session completes. A second submission is a
/// hard `IllegalState` error rather than a silent no-op, so client bugs that
/// resubmit surface immediately.
#[derive(Debug, Clone, Default)]
pub struct FeedbackCollector {
    open: bool,
    submitted: Option<Feedback>,
}

impl FeedbackCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the collector for input. Called on transition to Completed.
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Whether the collector is accepting a submission.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open && self.submitted.is_none()
    }

    /// The submitted feedback, if any.
    #[must_use]
    pub fn submitted(&self) -> Option<&Feedback> {
        self.submitted.as_ref()
    }

    /// Submit feedback. Validates ratings and rejects resubmission.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if any rating falls outside 1-5, or
    /// `IllegalState` if the collector is not open or already holds a
    /// submission.
    pub fn submit(&mut self, feedback: Feedback) -> Result<(), EngineError> {
        if !self.is_open() {
            return Err(EngineError::IllegalState {
                event: "submit_feedback",
                status: if self.open {
                    SessionStatus::Completed
                } else {
                    SessionStatus::InProgress
                },
                phase: Phase::Prepare,
            });
        }
        if !feedback.is_valid() {
            return Err(EngineError::Validation(
                "feedback ratings must be between 1 and 5".to_string(),
            ));
        }
        tracing::info!(
            difficulty = feedback.difficulty,
            energy = feedback.energy,
            enjoyment = feedback.enjoyment,
            "Feedback submitted"
        );
        self.submitted = Some(feedback);
        Ok(())
    }
}
