//! Async session driver.
//!
//! All events, the periodic tick included, funnel through a single command
//! channel processed one at a time, so no event handler ever observes a
//! half-applied transition. A tick that would auto-expire a rest cannot race
//! with a concurrently arriving `SkipRest`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::Receiver;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::model::{Feedback, ProgressSnapshot, SessionStatus};

use super::SessionController;

/// Cadence of the phase timer.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// A user action submitted to the driver.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    Start,
    Pause,
    Resume,
    CompleteSet {
        reps: i32,
        weight: Option<f64>,
        notes: Option<String>,
    },
    SkipSet,
    NextExercise,
    PreviousExercise,
    SkipRest,
    Finish,
    Cancel,
    SubmitFeedback(Feedback),
}

impl SessionCommand {
    /// Short name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::CompleteSet { .. } => "complete_set",
            Self::SkipSet => "skip_set",
            Self::NextExercise => "next_exercise",
            Self::PreviousExercise => "previous_exercise",
            Self::SkipRest => "skip_rest",
            Self::Finish => "finish",
            Self::Cancel => "cancel",
            Self::SubmitFeedback(_) => "submit_feedback",
        }
    }
}

/// Final state of a driven session.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    /// Session identifier.
    pub session_id: Uuid,
    /// Status the session ended in.
    pub status: SessionStatus,
    /// Progress at the end of the run.
    pub progress: ProgressSnapshot,
    /// Cumulative running seconds, excluding paused time.
    pub elapsed_seconds: u64,
    /// When the session started, if it did.
    pub started_at: Option<DateTime<Utc>>,
    /// When the session ended, if it did.
    pub ended_at: Option<DateTime<Utc>>,
}

/// Drives a controller from a command channel and a periodic tick.
pub struct SessionDriver {
    controller: SessionController,
    command_rx: Receiver<SessionCommand>,
    cancel: Option<CancellationToken>,
}

impl SessionDriver {
    /// Create a driver over a controller and its command channel.
    #[must_use]
    pub fn new(controller: SessionController, command_rx: Receiver<SessionCommand>) -> Self {
        Self {
            controller,
            command_rx,
            cancel: None,
        }
    }

    /// Attach a cancellation token for external shutdown.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Run until the command channel closes or the token is cancelled.
    ///
    /// A cancelled or closed run cancels the session if it has not already
    /// reached a terminal status.
    pub async fn run(mut self) -> SessionSummary {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first interval tick fires immediately; consume it so the clock
        // starts from zero.
        interval.tick().await;

        let cancel = self.cancel.clone().unwrap_or_default();

        loop {
            tokio::select! {
                biased;

                () = cancel.cancelled() => {
                    tracing::info!("Session driver cancelled via token");
                    self.abort_if_active();
                    return self.summary();
                }
                command = self.command_rx.recv() => {
                    match command {
                        Some(command) => self.handle_command(command),
                        None => {
                            tracing::debug!("Command channel closed");
                            self.abort_if_active();
                            return self.summary();
                        }
                    }
                }
                _ = interval.tick() => {
                    self.controller.tick();
                }
            }
        }
    }

    /// Access the controller, for inspection between runs in tests.
    #[must_use]
    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    fn handle_command(&mut self, command: SessionCommand) {
        let name = command.name();
        let result = match command {
            SessionCommand::Start => self.controller.start(),
            SessionCommand::Pause => self.controller.pause(),
            SessionCommand::Resume => self.controller.resume(),
            SessionCommand::CompleteSet { reps, weight, notes } => {
                self.controller.complete_set(reps, weight, notes)
            }
            SessionCommand::SkipSet => self.controller.skip_set(),
            SessionCommand::NextExercise => self.controller.next_exercise(),
            SessionCommand::PreviousExercise => self.controller.previous_exercise(),
            SessionCommand::SkipRest => self.controller.skip_rest(),
            SessionCommand::Finish => self.controller.finish(),
            SessionCommand::Cancel => self.controller.cancel(),
            SessionCommand::SubmitFeedback(feedback) => self.controller.submit_feedback(feedback),
        };
        if let Err(e) = result {
            tracing::warn!(command = name, error = %e, "Command rejected");
        }
    }

    /// Cancel the session if the run is ending before a terminal status.
    fn abort_if_active(&mut self) {
        if !self.controller.status().is_terminal() {
            let _ = self.controller.cancel();
        }
    }

    fn summary(&self) -> SessionSummary {
        let session = self.controller.session();
        SessionSummary {
            session_id: session.id,
            status: session.status,
            progress: self.controller.progress(),
            elapsed_seconds: session.elapsed_seconds,
            started_at: session.started_at,
            ended_at: session.ended_at,
        }
    }
}
