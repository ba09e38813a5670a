//! Integration tests for the async session driver wired to a logbook.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use workout_engine::engine::{SessionCommand, SessionController, SessionDriver};
use workout_engine::logbook::{Logbook, LogbookWriter};
use workout_engine::model::{ExercisePlanEntry, Feedback, Session, SessionStatus};
use workout_engine::notify::Notifier;

fn two_exercise_plan() -> Vec<ExercisePlanEntry> {
    vec![
        ExercisePlanEntry::new("press", 2, 10, 0),
        ExercisePlanEntry::new("row", 1, 12, 0),
    ]
}

async fn complete(tx: &mpsc::Sender<SessionCommand>, reps: i32) {
    tx.send(SessionCommand::CompleteSet {
        reps,
        weight: None,
        notes: None,
    })
    .await
    .unwrap();
}

/// A full command-driven session persists its records, final status, and
/// feedback through the notification pipeline.
#[tokio::test]
async fn test_driver_persists_full_session() {
    let logbook = Logbook::open_in_memory().await.unwrap();

    let session = Session::from_template("push-day", two_exercise_plan());
    let session_id = session.id;
    logbook
        .register_session(session_id, session.template_name.clone(), session.total_sets())
        .await
        .unwrap();

    let (notifier, notification_rx) = Notifier::channel();
    let writer = tokio::spawn(LogbookWriter::new(logbook.clone(), notification_rx).run());

    let controller = SessionController::new(session, notifier);
    let (tx, rx) = mpsc::channel(32);
    let driver = tokio::spawn(SessionDriver::new(controller, rx).run());

    tx.send(SessionCommand::Start).await.unwrap();
    complete(&tx, 10).await;
    complete(&tx, 8).await;
    tx.send(SessionCommand::SkipSet).await.unwrap();
    tx.send(SessionCommand::SubmitFeedback(Feedback::new(4, 3, 5, None)))
        .await
        .unwrap();
    drop(tx);

    let summary = driver.await.unwrap();
    assert_eq!(summary.status, SessionStatus::Completed);
    assert!((summary.progress.percent - 100.0).abs() < f64::EPSILON);

    // The driver dropped its notifier, so the writer drains and exits.
    writer.await.unwrap();

    let row = logbook.get_session(session_id).await.unwrap().unwrap();
    assert_eq!(row.status, "completed");
    assert_eq!(row.template_name.as_deref(), Some("push-day"));
    assert_eq!(row.processed_sets, 3);

    let records = logbook.get_set_records(session_id).await.unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(logbook.count_by_completion(session_id, true).await.unwrap(), 2);
    assert_eq!(logbook.count_by_completion(session_id, false).await.unwrap(), 1);

    let feedback = logbook.get_feedback(session_id).await.unwrap().unwrap();
    assert_eq!(feedback.enjoyment, 5);
}

/// Cancelling the driver's token mid-session records a cancelled status
/// without retracting already-written records.
#[tokio::test]
async fn test_driver_cancellation_persists_partial_session() {
    let logbook = Logbook::open_in_memory().await.unwrap();

    let session = Session::new(two_exercise_plan());
    let session_id = session.id;
    logbook
        .register_session(session_id, None, session.total_sets())
        .await
        .unwrap();

    let (notifier, notification_rx) = Notifier::channel();
    let writer = tokio::spawn(LogbookWriter::new(logbook.clone(), notification_rx).run());

    let controller = SessionController::new(session, notifier);
    let (tx, rx) = mpsc::channel(32);
    let cancel = CancellationToken::new();
    let driver = tokio::spawn(
        SessionDriver::new(controller, rx)
            .with_cancellation(cancel.clone())
            .run(),
    );

    tx.send(SessionCommand::Start).await.unwrap();
    complete(&tx, 10).await;

    // Let the driver drain the queued commands before cancelling: wait until
    // the completed set is visible in the logbook, since `yield_now` gives no
    // guarantee the driver task has run.
    while logbook.count_set_records().await.unwrap() < 1 {
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    cancel.cancel();

    let summary = driver.await.unwrap();
    assert_eq!(summary.status, SessionStatus::Cancelled);

    drop(tx);
    writer.await.unwrap();

    let row = logbook.get_session(session_id).await.unwrap().unwrap();
    assert_eq!(row.status, "cancelled");
    assert_eq!(logbook.count_set_records().await.unwrap(), 1);
}

/// Commands arriving in an illegal order are rejected individually without
/// derailing the session.
#[tokio::test]
async fn test_driver_survives_out_of_order_commands() {
    let controller = SessionController::detached(Session::new(two_exercise_plan()));
    let (tx, rx) = mpsc::channel(32);
    let driver = tokio::spawn(SessionDriver::new(controller, rx).run());

    // Everything before start is illegal.
    tx.send(SessionCommand::SkipRest).await.unwrap();
    tx.send(SessionCommand::Pause).await.unwrap();
    complete(&tx, 10).await;

    tx.send(SessionCommand::Start).await.unwrap();
    // skip_rest outside a rest phase is illegal but harmless.
    tx.send(SessionCommand::SkipRest).await.unwrap();
    complete(&tx, 10).await;
    tx.send(SessionCommand::Finish).await.unwrap();
    drop(tx);

    let summary = driver.await.unwrap();
    assert_eq!(summary.status, SessionStatus::Completed);
    assert_eq!(summary.progress.processed_sets, 1);
}
