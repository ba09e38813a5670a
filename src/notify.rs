//! Notification boundary between the engine and external sinks.
//!
//! Notifications are pushed after a state transition commits, so sink
//! availability never affects engine correctness. Delivery is best-effort:
//! a dropped receiver is ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::model::{Feedback, ProgressSnapshot, SessionStatus, SetRecord};

/// Audio cue identifiers dispatched at phase and status transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AudioCue {
    /// Session started.
    Start,
    /// A rest period began.
    RestBegin,
    /// A rest period ended.
    RestEnd,
    /// Session completed.
    Complete,
}

impl AudioCue {
    /// Returns the cue identifier string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::RestBegin => "rest-begin",
            Self::RestEnd => "rest-end",
            Self::Complete => "complete",
        }
    }
}

/// Notification emitted by the engine after a committed transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionNotification {
    /// A set record was created (append-only log stream).
    SetLogged(SetRecord),
    /// The session changed lifecycle status.
    StatusChanged {
        session_id: Uuid,
        status: SessionStatus,
        started_at: Option<DateTime<Utc>>,
        ended_at: Option<DateTime<Utc>>,
        progress: ProgressSnapshot,
    },
    /// An audio cue should play.
    Cue(AudioCue),
    /// The single end-of-session feedback was submitted.
    FeedbackSubmitted { session_id: Uuid, feedback: Feedback },
}

/// Fire-and-forget sender for session notifications.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: Option<mpsc::UnboundedSender<SessionNotification>>,
}

impl Notifier {
    /// Create a notifier and the receiving end for sinks.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SessionNotification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A notifier with no subscribers. Sends are dropped.
    #[must_use]
    pub fn disconnected() -> Self {
        Self { tx: None }
    }

    /// Push a notification. A closed or absent receiver is not an error.
    pub fn send(&self, notification: SessionNotification) {
        if let Some(tx) = &self.tx {
            if tx.send(notification).is_err() {
                tracing::debug!("Notification receiver dropped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_as_str() {
        assert_eq!(AudioCue::Start.as_str(), "start");
        assert_eq!(AudioCue::RestBegin.as_str(), "rest-begin");
        assert_eq!(AudioCue::RestEnd.as_str(), "rest-end");
        assert_eq!(AudioCue::Complete.as_str(), "complete");
    }

    #[test]
    fn test_cue_serialize_kebab_case() {
        let json = serde_json::to_string(&AudioCue::RestBegin).unwrap();
        assert_eq!(json, "\"rest-begin\"");
    }

    #[tokio::test]
    async fn test_notifier_delivers() {
        let (notifier, mut rx) = Notifier::channel();
        notifier.send(SessionNotification::Cue(AudioCue::Start));

        let received = rx.recv().await.unwrap();
        assert!(matches!(
            received,
            SessionNotification::Cue(AudioCue::Start)
        ));
    }

    #[test]
    fn test_notifier_survives_dropped_receiver() {
        let (notifier, rx) = Notifier::channel();
        drop(rx);
        notifier.send(SessionNotification::Cue(AudioCue::Complete));
    }

    #[test]
    fn test_disconnected_notifier() {
        let notifier = Notifier::disconnected();
        notifier.send(SessionNotification::Cue(AudioCue::Start));
    }
}
