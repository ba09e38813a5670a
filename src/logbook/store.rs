//! Logbook store with async `SQLite` operations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::model::{Feedback, ProgressSnapshot, SessionStatus, SetRecord};
use crate::notify::SessionNotification;

use super::error::LogbookError;
use super::schema::SCHEMA;

/// Returns the default path for the logbook database.
///
/// This is `~/.local/share/workout-engine/logbook.db` on Unix systems.
#[must_use]
pub fn default_logbook_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("workout-engine")
        .join("logbook.db")
}

/// Stored session row, as read back from the database.
#[derive(Debug, Clone)]
pub struct SessionRow {
    pub id: Uuid,
    pub template_name: Option<String>,
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub processed_sets: u32,
    pub total_sets: u32,
    pub progress_percent: f64,
}

/// Persistent workout logbook.
///
/// Uses `SQLite` for storage with async operations via `spawn_blocking`.
/// The logbook sits outside the engine core: writes are driven by
/// notifications and their failures never reach the state machine.
#[derive(Debug, Clone)]
pub struct Logbook {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl Logbook {
    /// Open a logbook at the specified path.
    ///
    /// Creates parent directories if they don't exist and initializes the
    /// schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema
    /// cannot be applied.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, LogbookError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                tokio::fs::create_dir_all(parent).await.map_err(|source| {
                    LogbookError::CreateDir {
                        path: parent.to_path_buf(),
                        source,
                    }
                })?;
            }
        }

        let path_clone = path.clone();
        let conn = tokio::task::spawn_blocking(move || -> Result<Connection, LogbookError> {
            let conn =
                Connection::open(&path_clone).map_err(|source| LogbookError::Open {
                    path: path_clone,
                    source,
                })?;
            conn.execute_batch(SCHEMA)?;
            Ok(conn)
        })
        .await
        .map_err(|_| LogbookError::Interrupted)??;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path),
        })
    }

    /// Open an in-memory logbook for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created or the schema
    /// cannot be applied.
    pub async fn open_in_memory() -> Result<Self, LogbookError> {
        let conn = tokio::task::spawn_blocking(|| -> Result<Connection, LogbookError> {
            let conn = Connection::open_in_memory()?;
            conn.execute_batch(SCHEMA)?;
            Ok(conn)
        })
        .await
        .map_err(|_| LogbookError::Interrupted)??;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        })
    }

    /// Returns the path to the database, if opened from a file.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Register a session row before it starts, recording its template name.
    ///
    /// # Errors
    ///
    /// Returns an error if the row cannot be inserted.
    pub async fn register_session(
        &self,
        session_id: Uuid,
        template_name: Option<String>,
        total_sets: u32,
    ) -> Result<(), LogbookError> {
        let id = session_id.to_string();

        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || -> Result<(), LogbookError> {
            let conn = conn.blocking_lock();
            conn.execute(
                "INSERT INTO sessions (id, template_name, status, total_sets)
                 VALUES (?1, ?2, 'scheduled', ?3)
                 ON CONFLICT(id) DO UPDATE SET template_name = excluded.template_name",
                params![id, template_name, total_sets],
            )?;
            Ok(())
        })
        .await
        .map_err(|_| LogbookError::Interrupted)?
    }

    /// Record a session status transition with its timestamps and progress.
    ///
    /// # Errors
    ///
    /// Returns an error if the row cannot be written.
    pub async fn record_status(
        &self,
        session_id: Uuid,
        status: SessionStatus,
        started_at: Option<DateTime<Utc>>,
        ended_at: Option<DateTime<Utc>>,
        progress: ProgressSnapshot,
    ) -> Result<(), LogbookError> {
        let id = session_id.to_string();
        let status = status.as_str();
        let started_at = started_at.map(|t| t.to_rfc3339());
        let ended_at = ended_at.map(|t| t.to_rfc3339());

        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || -> Result<(), LogbookError> {
            let conn = conn.blocking_lock();
            conn.execute(
                "INSERT INTO sessions (id, status, started_at, ended_at, processed_sets, total_sets, progress_percent)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(id) DO UPDATE SET
                     status = excluded.status,
                     started_at = excluded.started_at,
                     ended_at = excluded.ended_at,
                     processed_sets = excluded.processed_sets,
                     total_sets = excluded.total_sets,
                     progress_percent = excluded.progress_percent",
                params![
                    id,
                    status,
                    started_at,
                    ended_at,
                    progress.processed_sets,
                    progress.total_sets,
                    progress.percent
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|_| LogbookError::Interrupted)?
    }

    /// Append a set record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be inserted.
    pub async fn log_set(&self, record: &SetRecord) -> Result<(), LogbookError> {
        let id = record.id.to_string();
        let session_id = record.session_id.to_string();
        let exercise_id = record.exercise_id.clone();
        let set_number = record.set_number;
        let reps = record.reps;
        let weight = record.weight;
        let completed = record.completed;
        let notes = record.notes.clone();
        let recorded_at = record.recorded_at.to_rfc3339();

        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || -> Result<(), LogbookError> {
            let conn = conn.blocking_lock();
            conn.execute(
                "INSERT INTO set_records (id, session_id, exercise_id, set_number, reps, weight, completed, notes, recorded_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![id, session_id, exercise_id, set_number, reps, weight, completed, notes, recorded_at],
            )?;
            Ok(())
        })
        .await
        .map_err(|_| LogbookError::Interrupted)?
    }

    /// Store the session's single feedback submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the feedback cannot be inserted.
    pub async fn log_feedback(
        &self,
        session_id: Uuid,
        feedback: &Feedback,
    ) -> Result<(), LogbookError> {
        let id = session_id.to_string();
        let difficulty = feedback.difficulty;
        let energy = feedback.energy;
        let enjoyment = feedback.enjoyment;
        let notes = feedback.notes.clone();
        let submitted_at = feedback.submitted_at.to_rfc3339();

        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || -> Result<(), LogbookError> {
            let conn = conn.blocking_lock();
            conn.execute(
                "INSERT INTO feedback (session_id, difficulty, energy, enjoyment, notes, submitted_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![id, difficulty, energy, enjoyment, notes, submitted_at],
            )?;
            Ok(())
        })
        .await
        .map_err(|_| LogbookError::Interrupted)?
    }

    /// Get a session row by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_session(&self, session_id: Uuid) -> Result<Option<SessionRow>, LogbookError> {
        let id = session_id.to_string();

        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || -> Result<Option<SessionRow>, LogbookError> {
            let conn = conn.blocking_lock();
            let row = conn
                .query_row(
                    "SELECT id, template_name, status, started_at, ended_at, processed_sets, total_sets, progress_percent
                     FROM sessions WHERE id = ?1",
                    params![id],
                    |row| {
                        let id: String = row.get(0)?;
                        let template_name: Option<String> = row.get(1)?;
                        let status: String = row.get(2)?;
                        let started_at: Option<String> = row.get(3)?;
                        let ended_at: Option<String> = row.get(4)?;
                        let processed_sets: u32 = row.get(5)?;
                        let total_sets: u32 = row.get(6)?;
                        let progress_percent: f64 = row.get(7)?;
                        Ok((id, template_name, status, started_at, ended_at, processed_sets, total_sets, progress_percent))
                    },
                )
                .optional()?;

            Ok(row.map(
                |(id, template_name, status, started_at, ended_at, processed_sets, total_sets, progress_percent)| {
                    SessionRow {
                        id: Uuid::parse_str(&id).unwrap_or_else(|_| Uuid::nil()),
                        template_name,
                        status,
                        started_at: started_at.as_deref().map(parse_timestamp),
                        ended_at: ended_at.as_deref().map(parse_timestamp),
                        processed_sets,
                        total_sets,
                        progress_percent,
                    }
                },
            ))
        })
        .await
        .map_err(|_| LogbookError::Interrupted)?
    }

    /// Get set records for a session, in the order they were recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_set_records(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<SetRecord>, LogbookError> {
        let session_id_str = session_id.to_string();

        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<SetRecord>, LogbookError> {
            let conn = conn.blocking_lock();
            let mut stmt = conn.prepare(
                "SELECT id, session_id, exercise_id, set_number, reps, weight, completed, notes, recorded_at
                 FROM set_records WHERE session_id = ?1 ORDER BY recorded_at ASC, id ASC",
            )?;

            let rows = stmt
                .query_map(params![session_id_str], |row| {
                    let id: String = row.get(0)?;
                    let session_id: String = row.get(1)?;
                    let exercise_id: String = row.get(2)?;
                    let set_number: u32 = row.get(3)?;
                    let reps: Option<u32> = row.get(4)?;
                    let weight: Option<f64> = row.get(5)?;
                    let completed: bool = row.get(6)?;
                    let notes: Option<String> = row.get(7)?;
                    let recorded_at: String = row.get(8)?;
                    Ok((id, session_id, exercise_id, set_number, reps, weight, completed, notes, recorded_at))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            let records = rows
                .into_iter()
                .map(
                    |(id, session_id, exercise_id, set_number, reps, weight, completed, notes, recorded_at)| {
                        SetRecord {
                            id: Uuid::parse_str(&id).unwrap_or_else(|_| Uuid::nil()),
                            session_id: Uuid::parse_str(&session_id).unwrap_or_else(|_| Uuid::nil()),
                            exercise_id,
                            set_number,
                            reps,
                            weight,
                            completed,
                            notes,
                            recorded_at: parse_timestamp(&recorded_at),
                        }
                    },
                )
                .collect();

            Ok(records)
        })
        .await
        .map_err(|_| LogbookError::Interrupted)?
    }

    /// Get the feedback stored for a session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_feedback(&self, session_id: Uuid) -> Result<Option<Feedback>, LogbookError> {
        let id = session_id.to_string();

        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || -> Result<Option<Feedback>, LogbookError> {
            let conn = conn.blocking_lock();
            let row = conn
                .query_row(
                    "SELECT difficulty, energy, enjoyment, notes, submitted_at
                     FROM feedback WHERE session_id = ?1",
                    params![id],
                    |row| {
                        let difficulty: u8 = row.get(0)?;
                        let energy: u8 = row.get(1)?;
                        let enjoyment: u8 = row.get(2)?;
                        let notes: Option<String> = row.get(3)?;
                        let submitted_at: String = row.get(4)?;
                        Ok((difficulty, energy, enjoyment, notes, submitted_at))
                    },
                )
                .optional()?;

            Ok(row.map(|(difficulty, energy, enjoyment, notes, submitted_at)| Feedback {
                difficulty,
                energy,
                enjoyment,
                notes,
                submitted_at: parse_timestamp(&submitted_at),
            }))
        })
        .await
        .map_err(|_| LogbookError::Interrupted)?
    }

    /// Count all set records in the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count_set_records(&self) -> Result<u64, LogbookError> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || -> Result<u64, LogbookError> {
            let conn = conn.blocking_lock();
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM set_records", [], |row| row.get(0))?;
            Ok(count.unsigned_abs())
        })
        .await
        .map_err(|_| LogbookError::Interrupted)?
    }

    /// Count a session's records by completion flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count_by_completion(
        &self,
        session_id: Uuid,
        completed: bool,
    ) -> Result<u64, LogbookError> {
        let id = session_id.to_string();

        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || -> Result<u64, LogbookError> {
            let conn = conn.blocking_lock();
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM set_records WHERE session_id = ?1 AND completed = ?2",
                params![id, completed],
                |row| row.get(0),
            )?;
            Ok(count.unsigned_abs())
        })
        .await
        .map_err(|_| LogbookError::Interrupted)?
    }
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}

/// Consumes engine notifications and persists them to a logbook.
///
/// Write failures are logged and dropped; the engine has already committed
/// its transition by the time a notification arrives.
pub struct LogbookWriter {
    logbook: Logbook,
    rx: UnboundedReceiver<SessionNotification>,
}

impl LogbookWriter {
    /// Create a writer over a logbook and a notification receiver.
    #[must_use]
    pub fn new(logbook: Logbook, rx: UnboundedReceiver<SessionNotification>) -> Self {
        Self { logbook, rx }
    }

    /// Run until the notification channel closes.
    pub async fn run(mut self) {
        while let Some(notification) = self.rx.recv().await {
            let result = match notification {
                SessionNotification::SetLogged(record) => self.logbook.log_set(&record).await,
                SessionNotification::StatusChanged {
                    session_id,
                    status,
                    started_at,
                    ended_at,
                    progress,
                } => {
                    self.logbook
                        .record_status(session_id, status, started_at, ended_at, progress)
                        .await
                }
                SessionNotification::FeedbackSubmitted {
                    session_id,
                    feedback,
                } => self.logbook.log_feedback(session_id, &feedback).await,
                SessionNotification::Cue(_) => Ok(()),
            };
            if let Err(e) = result {
                tracing::warn!(error = %e, "Logbook write failed");
            }
        }
        tracing::debug!("Logbook writer finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Notifier;

    #[tokio::test]
    async fn test_open_in_memory() {
        let logbook = Logbook::open_in_memory().await.unwrap();
        assert!(logbook.path().is_none());
    }

    #[tokio::test]
    async fn test_session_status_upsert() {
        let logbook = Logbook::open_in_memory().await.unwrap();
        let session_id = Uuid::new_v4();
        let progress = ProgressSnapshot {
            processed_sets: 0,
            total_sets: 4,
            percent: 0.0,
        };

        logbook
            .record_status(session_id, SessionStatus::InProgress, Some(Utc::now()), None, progress)
            .await
            .unwrap();

        let done = ProgressSnapshot {
            processed_sets: 4,
            total_sets: 4,
            percent: 100.0,
        };
        logbook
            .record_status(
                session_id,
                SessionStatus::Completed,
                Some(Utc::now()),
                Some(Utc::now()),
                done,
            )
            .await
            .unwrap();

        let row = logbook.get_session(session_id).await.unwrap().unwrap();
        assert_eq!(row.status, "completed");
        assert_eq!(row.processed_sets, 4);
        assert!((row.progress_percent - 100.0).abs() < f64::EPSILON);
        assert!(row.ended_at.is_some());
    }

    #[tokio::test]
    async fn test_register_preserves_template_name() {
        let logbook = Logbook::open_in_memory().await.unwrap();
        let session_id = Uuid::new_v4();

        logbook
            .register_session(session_id, Some("push-day".to_string()), 6)
            .await
            .unwrap();
        logbook
            .record_status(
                session_id,
                SessionStatus::InProgress,
                Some(Utc::now()),
                None,
                ProgressSnapshot {
                    processed_sets: 0,
                    total_sets: 6,
                    percent: 0.0,
                },
            )
            .await
            .unwrap();

        let row = logbook.get_session(session_id).await.unwrap().unwrap();
        assert_eq!(row.template_name.as_deref(), Some("push-day"));
        assert_eq!(row.status, "in_progress");
    }

    #[tokio::test]
    async fn test_log_and_get_set_records() {
        let logbook = Logbook::open_in_memory().await.unwrap();
        let session_id = Uuid::new_v4();
        logbook
            .register_session(session_id, None, 2)
            .await
            .unwrap();

        let completed = SetRecord::builder(session_id, "squat", 1)
            .completed(10)
            .weight(80.0)
            .build();
        let skipped = SetRecord::builder(session_id, "squat", 2).build();

        logbook.log_set(&completed).await.unwrap();
        logbook.log_set(&skipped).await.unwrap();

        let records = logbook.get_set_records(session_id).await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].completed);
        assert_eq!(records[0].reps, Some(10));
        assert_eq!(records[0].weight, Some(80.0));
        assert!(!records[1].completed);
        assert!(records[1].reps.is_none());

        assert_eq!(logbook.count_set_records().await.unwrap(), 2);
        assert_eq!(
            logbook.count_by_completion(session_id, true).await.unwrap(),
            1
        );
        assert_eq!(
            logbook.count_by_completion(session_id, false).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_log_and_get_feedback() {
        let logbook = Logbook::open_in_memory().await.unwrap();
        let session_id = Uuid::new_v4();
        logbook
            .register_session(session_id, None, 1)
            .await
            .unwrap();

        let feedback = Feedback::new(4, 3, 5, Some("good session".to_string()));
        logbook.log_feedback(session_id, &feedback).await.unwrap();

        let stored = logbook.get_feedback(session_id).await.unwrap().unwrap();
        assert_eq!(stored.difficulty, 4);
        assert_eq!(stored.energy, 3);
        assert_eq!(stored.enjoyment, 5);
        assert_eq!(stored.notes.as_deref(), Some("good session"));
    }

    #[tokio::test]
    async fn test_get_session_nonexistent() {
        let logbook = Logbook::open_in_memory().await.unwrap();
        let row = logbook.get_session(Uuid::new_v4()).await.unwrap();
        assert!(row.is_none());
    }

    #[tokio::test]
    async fn test_writer_persists_notifications() {
        let logbook = Logbook::open_in_memory().await.unwrap();
        let (notifier, rx) = Notifier::channel();
        let writer = LogbookWriter::new(logbook.clone(), rx);
        let handle = tokio::spawn(writer.run());

        let session_id = Uuid::new_v4();
        // Status arrives first in the real flow, creating the session row.
        notifier.send(SessionNotification::StatusChanged {
            session_id,
            status: SessionStatus::InProgress,
            started_at: Some(Utc::now()),
            ended_at: None,
            progress: ProgressSnapshot {
                processed_sets: 0,
                total_sets: 1,
                percent: 0.0,
            },
        });
        let record = SetRecord::builder(session_id, "row", 1).completed(12).build();
        notifier.send(SessionNotification::SetLogged(record));
        notifier.send(SessionNotification::FeedbackSubmitted {
            session_id,
            feedback: Feedback::new(3, 3, 3, None),
        });
        drop(notifier);

        handle.await.unwrap();

        assert_eq!(logbook.count_set_records().await.unwrap(), 1);
        assert!(logbook.get_feedback(session_id).await.unwrap().is_some());
    }

    #[test]
    fn test_default_logbook_path() {
        let path = default_logbook_path();
        assert!(path.ends_with("workout-engine/logbook.db"));
    }

    #[tokio::test]
    async fn test_open_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("deep").join("logbook.db");

        let logbook = Logbook::open(&db_path).await.unwrap();
        assert_eq!(logbook.path(), Some(db_path.as_path()));
        assert!(db_path.exists());
    }
}
