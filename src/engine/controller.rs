//! Session controller: the top-level state machine.
//!
//! The controller is the sole entry point for every event (timer ticks and
//! user actions) and the only component that mutates session state. Each
//! event is validated against the current status and phase before any
//! mutation, so a rejected event leaves the session entirely unchanged.
//! Notifications go out only after the transition has committed.

use chrono::Utc;

use crate::error::EngineError;
use crate::model::{Feedback, Phase, ProgressSnapshot, Session, SessionStatus, SetRecord};
use crate::notify::{AudioCue, Notifier, SessionNotification};

use super::{Advance, ExerciseSequencer, FeedbackCollector, PhaseState, PhaseTimer, ProgressTracker, SetLogger};

/// Drives one workout session from `Scheduled` to a terminal status.
#[derive(Debug)]
pub struct SessionController {
    session: Session,
    timer: PhaseTimer,
    sequencer: ExerciseSequencer,
    progress: ProgressTracker,
    logger: SetLogger,
    feedback: FeedbackCollector,
    notifier: Notifier,
}

impl SessionController {
    /// Create a controller over a scheduled session.
    #[must_use]
    pub fn new(session: Session, notifier: Notifier) -> Self {
        let progress = ProgressTracker::new(session.total_sets());
        let logger = SetLogger::new(session.id);
        Self {
            session,
            timer: PhaseTimer::new(),
            sequencer: ExerciseSequencer::new(),
            progress,
            logger,
            feedback: FeedbackCollector::new(),
            notifier,
        }
    }

    /// Create a controller with no notification subscribers.
    #[must_use]
    pub fn detached(session: Session) -> Self {
        Self::new(session, Notifier::disconnected())
    }

    /// Start the session.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTemplate` if the plan is empty or an entry has zero
    /// target sets, or `IllegalState` if the session is not `Scheduled`.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.session.status != SessionStatus::Scheduled {
            return Err(self.illegal("start"));
        }
        if self.session.plan.is_empty() {
            return Err(EngineError::InvalidTemplate(
                "plan has no exercises".to_string(),
            ));
        }
        if let Some(entry) = self.session.plan.iter().find(|e| e.target_sets == 0) {
            return Err(EngineError::InvalidTemplate(format!(
                "exercise '{}' has zero target sets",
                entry.id
            )));
        }

        self.session.status = SessionStatus::InProgress;
        self.session.started_at = Some(Utc::now());
        self.timer.set_phase(Phase::Prepare);
        self.timer.run();
        tracing::info!(session = %self.session.id, "Session started");

        self.notify_status();
        self.notifier.send(SessionNotification::Cue(AudioCue::Start));
        Ok(())
    }

    /// Stop elapsed-time accrual without changing phase or status.
    ///
    /// Idempotent while in progress.
    ///
    /// # Errors
    ///
    /// Returns `IllegalState` unless the session is `InProgress`.
    pub fn pause(&mut self) -> Result<(), EngineError> {
        self.require_in_progress("pause")?;
        self.timer.pause();
        tracing::debug!(session = %self.session.id, "Session paused");
        Ok(())
    }

    /// Resume elapsed-time accrual. Idempotent while in progress.
    ///
    /// # Errors
    ///
    /// Returns `IllegalState` unless the session is `InProgress`.
    pub fn resume(&mut self) -> Result<(), EngineError> {
        self.require_in_progress("resume")?;
        self.timer.run();
        tracing::debug!(session = %self.session.id, "Session resumed");
        Ok(())
    }

    /// Log a completed set and advance the sequencer.
    ///
    /// Opens a rest before the next set of the same exercise. Completing the
    /// last planned set completes the session.
    ///
    /// # Errors
    ///
    /// Returns `IllegalState` unless the session is `InProgress` and the
    /// phase is not `Rest`, or `Validation` for negative reps or a
    /// non-finite/negative weight.
    pub fn complete_set(
        &mut self,
        reps: i32,
        weight: Option<f64>,
        notes: Option<String>,
    ) -> Result<(), EngineError> {
        self.require_active_set("complete_set")?;
        let reps = u32::try_from(reps)
            .map_err(|_| EngineError::Validation("reps must be non-negative".to_string()))?;
        if weight.is_some_and(|w| !w.is_finite() || w < 0.0) {
            return Err(EngineError::Validation(
                "weight must be a non-negative number".to_string(),
            ));
        }

        let exercise = self.current_exercise();
        let record = self
            .logger
            .log_completion(&exercise, self.sequencer.set_number(), reps, weight, notes);
        self.apply_processed_set(record, true);
        Ok(())
    }

    /// Log a skipped set and advance the sequencer.
    ///
    /// Skips never open a rest: the next set begins in `Prepare` directly.
    ///
    /// # Errors
    ///
    /// Returns `IllegalState` unless the session is `InProgress` and the
    /// phase is not `Rest`.
    pub fn skip_set(&mut self) -> Result<(), EngineError> {
        self.require_active_set("skip_set")?;

        let exercise = self.current_exercise();
        let record = self.logger.log_skip(&exercise, self.sequencer.set_number());
        self.apply_processed_set(record, false);
        Ok(())
    }

    /// Move focus to the next exercise, clamped at the end of the plan.
    ///
    /// Pure navigation: no record is emitted and progress is unaffected.
    ///
    /// # Errors
    ///
    /// Returns `IllegalState` unless the session is `InProgress`.
    pub fn next_exercise(&mut self) -> Result<(), EngineError> {
        self.require_in_progress("next_exercise")?;
        self.sequencer.next_exercise(&self.session.plan);
        self.timer.set_phase(Phase::Prepare);
        self.sync_position();
        Ok(())
    }

    /// Move focus to the previous exercise, clamped at the start of the plan.
    ///
    /// # Errors
    ///
    /// Returns `IllegalState` unless the session is `InProgress`.
    pub fn previous_exercise(&mut self) -> Result<(), EngineError> {
        self.require_in_progress("previous_exercise")?;
        self.sequencer.previous_exercise();
        self.timer.set_phase(Phase::Prepare);
        self.sync_position();
        Ok(())
    }

    /// End the workout early, freezing progress at its current value.
    ///
    /// # Errors
    ///
    /// Returns `IllegalState` unless the session is `InProgress`.
    pub fn finish(&mut self) -> Result<(), EngineError> {
        self.require_in_progress("finish")?;
        self.complete_session();
        Ok(())
    }

    /// Cancel the session. Already-emitted records are not retracted.
    ///
    /// # Errors
    ///
    /// Returns `IllegalState` if the session already reached a terminal
    /// status.
    pub fn cancel(&mut self) -> Result<(), EngineError> {
        if self.session.status.is_terminal() {
            return Err(self.illegal("cancel"));
        }
        self.session.status = SessionStatus::Cancelled;
        self.session.ended_at = Some(Utc::now());
        self.timer.pause();
        tracing::info!(session = %self.session.id, "Session cancelled");
        self.notify_status();
        Ok(())
    }

    /// Advance the clock by one second.
    ///
    /// No-op unless the session is in progress and the timer is running.
    /// Auto-expires a rest whose elapsed time reaches its target.
    pub fn tick(&mut self) {
        if self.session.status != SessionStatus::InProgress || !self.timer.is_running() {
            return;
        }
        let expired = self.timer.tick();
        self.session.elapsed_seconds += 1;

        if expired && self.timer.phase() == Phase::Rest {
            self.timer.set_phase(Phase::Prepare);
            tracing::debug!(session = %self.session.id, "Rest expired");
            self.notifier
                .send(SessionNotification::Cue(AudioCue::RestEnd));
        }
    }

    /// Cut a rest short, returning to `Prepare` immediately.
    ///
    /// # Errors
    ///
    /// Returns `IllegalState` unless the session is `InProgress` and the
    /// phase is `Rest`.
    pub fn skip_rest(&mut self) -> Result<(), EngineError> {
        self.require_in_progress("skip_rest")?;
        if self.timer.phase() != Phase::Rest {
            return Err(self.illegal("skip_rest"));
        }
        self.timer.set_phase(Phase::Prepare);
        self.notifier
            .send(SessionNotification::Cue(AudioCue::RestEnd));
        Ok(())
    }

    /// Submit the single end-of-session feedback.
    ///
    /// # Errors
    ///
    /// Returns `IllegalState` unless the session is `Completed` and no
    /// feedback has been submitted yet, or `Validation` for out-of-range
    /// ratings.
    pub fn submit_feedback(&mut self, feedback: Feedback) -> Result<(), EngineError> {
        if self.session.status != SessionStatus::Completed {
            return Err(self.illegal("submit_feedback"));
        }
        self.feedback.submit(feedback.clone())?;
        self.notifier.send(SessionNotification::FeedbackSubmitted {
            session_id: self.session.id,
            feedback,
        });
        Ok(())
    }

    /// The session being driven.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.session.status
    }

    /// Current phase clock state.
    #[must_use]
    pub fn phase_state(&self) -> PhaseState {
        self.timer.state()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.timer.phase()
    }

    /// Current progress snapshot.
    #[must_use]
    pub fn progress(&self) -> ProgressSnapshot {
        self.progress.snapshot()
    }

    /// The submitted feedback, if any.
    #[must_use]
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.submitted()
    }

    fn current_exercise(&self) -> crate::model::ExercisePlanEntry {
        // Guarded by start(): the plan is non-empty and the sequencer index
        // stays within it.
        self.session.plan[self.sequencer.exercise_index()].clone()
    }

    /// Commit a processed set: record, progress, advance, maybe complete.
    fn apply_processed_set(&mut self, record: SetRecord, completed: bool) {
        self.progress.record_set();
        let advance = self.sequencer.advance(&self.session.plan, completed);
        self.sync_position();
        self.notifier.send(SessionNotification::SetLogged(record));

        match advance {
            Advance::NextSetWithRest { rest_seconds } if rest_seconds > 0 => {
                self.timer.start_rest(rest_seconds);
                self.notifier
                    .send(SessionNotification::Cue(AudioCue::RestBegin));
            }
            Advance::NextSetWithRest { .. } | Advance::NextSet | Advance::NextExercise => {
                self.timer.set_phase(Phase::Prepare);
            }
            Advance::PlanExhausted => self.complete_session(),
        }
    }

    fn complete_session(&mut self) {
        self.session.status = SessionStatus::Completed;
        self.session.ended_at = Some(Utc::now());
        self.timer.pause();
        self.feedback.open();
        tracing::info!(
            session = %self.session.id,
            progress = self.progress.percent(),
            elapsed = self.session.elapsed_seconds,
            "Session completed"
        );
        self.notify_status();
        self.notifier
            .send(SessionNotification::Cue(AudioCue::Complete));
    }

    fn sync_position(&mut self) {
        self.session.exercise_index = self.sequencer.exercise_index();
        self.session.set_number = self.sequencer.set_number();
    }

    fn notify_status(&self) {
        self.notifier.send(SessionNotification::StatusChanged {
            session_id: self.session.id,
            status: self.session.status,
            started_at: self.session.started_at,
            ended_at: self.session.ended_at,
            progress: self.progress.snapshot(),
        });
    }

    fn require_in_progress(&self, event: &'static str) -> Result<(), EngineError> {
        if self.session.status == SessionStatus::InProgress {
            Ok(())
        } else {
            Err(self.illegal(event))
        }
    }

    fn require_active_set(&self, event: &'static str) -> Result<(), EngineError> {
        self.require_in_progress(event)?;
        if self.timer.phase() == Phase::Rest {
            return Err(self.illegal(event));
        }
        Ok(())
    }

    fn illegal(&self, event: &'static str) -> EngineError {
        EngineError::IllegalState {
            event,
            status: self.session.status,
            phase: self.timer.phase(),
        }
    }
}
