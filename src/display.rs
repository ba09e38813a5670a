//! Colored CLI display utilities for the session runner.

use std::io::{self, Write};

use chrono::Utc;
use owo_colors::OwoColorize;

use crate::engine::SessionSummary;
use crate::model::{ExercisePlanEntry, SessionStatus, SetRecord};
use crate::notify::{AudioCue, SessionNotification};

/// Get current timestamp in the same format as tracing.
fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Print the template summary shown before a session starts.
pub fn print_template_summary(name: &str, description: Option<&str>, exercises: &[ExercisePlanEntry]) {
    println!("{} {}", "[TEMPLATE]".blue().bold(), name.cyan());
    if let Some(description) = description {
        println!("  {}", description.dimmed());
    }
    for entry in exercises {
        let weight = entry
            .target_weight
            .map_or(String::new(), |w| format!(" @ {w}kg"));
        println!(
            "  {} {} {}x{}{} rest={}s",
            "-".dimmed(),
            entry.name,
            entry.target_sets,
            entry.target_reps,
            weight,
            entry.rest_seconds
        );
    }
    let _ = io::stdout().flush();
}

/// Print a logged set record.
pub fn print_set_logged(record: &SetRecord) {
    if record.completed {
        println!(
            "{} {} {} set {} x{} reps{}",
            timestamp().dimmed(),
            "[SET]".green().bold(),
            record.exercise_id.cyan(),
            record.set_number,
            record.reps.unwrap_or(0),
            record
                .weight
                .map_or(String::new(), |w| format!(" @ {w}kg"))
        );
    } else {
        println!(
            "{} {} {} set {} skipped",
            timestamp().dimmed(),
            "[SET]".yellow().bold(),
            record.exercise_id.cyan(),
            record.set_number
        );
    }
    let _ = io::stdout().flush();
}

/// Print an audio cue marker.
pub fn print_cue(cue: AudioCue) {
    println!(
        "{} {} {}",
        timestamp().dimmed(),
        "[CUE]".magenta().bold(),
        cue.as_str()
    );
    let _ = io::stdout().flush();
}

/// Print a status transition.
pub fn print_status(status: SessionStatus, percent: f64) {
    let label = match status {
        SessionStatus::Scheduled => "scheduled".dimmed().to_string(),
        SessionStatus::InProgress => "in progress".blue().to_string(),
        SessionStatus::Completed => "completed".green().to_string(),
        SessionStatus::Cancelled => "cancelled".red().to_string(),
    };
    println!(
        "{} {} {} ({percent:.0}%)",
        timestamp().dimmed(),
        "[SESSION]".blue().bold(),
        label
    );
    let _ = io::stdout().flush();
}

/// Print a notification in its CLI form.
pub fn print_notification(notification: &SessionNotification) {
    match notification {
        SessionNotification::SetLogged(record) => print_set_logged(record),
        SessionNotification::StatusChanged { status, progress, .. } => {
            print_status(*status, progress.percent);
        }
        SessionNotification::Cue(cue) => print_cue(*cue),
        SessionNotification::FeedbackSubmitted { feedback, .. } => {
            println!(
                "{} {} difficulty={} energy={} enjoyment={}",
                timestamp().dimmed(),
                "[FEEDBACK]".green().bold(),
                feedback.difficulty,
                feedback.energy,
                feedback.enjoyment
            );
            let _ = io::stdout().flush();
        }
    }
}

/// Print the final session summary.
pub fn print_summary(summary: &SessionSummary) {
    let status = match summary.status {
        SessionStatus::Completed => "completed".green().bold().to_string(),
        SessionStatus::Cancelled => "cancelled".red().bold().to_string(),
        other => other.as_str().to_string(),
    };
    println!(
        "{} {} {} {}/{} sets ({:.0}%) in {}s",
        timestamp().dimmed(),
        "[DONE]".blue().bold(),
        status,
        summary.progress.processed_sets,
        summary.progress.total_sets,
        summary.progress.percent,
        summary.elapsed_seconds
    );
    let _ = io::stdout().flush();
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {} {}", timestamp().dimmed(), "[ERROR]".red().bold(), msg);
    let _ = io::stderr().flush();
}
