//! Workout Engine - guided workout session engine with real-time set tracking.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use workout_engine::display;
use workout_engine::engine::{SessionCommand, SessionController, SessionDriver};
use workout_engine::logbook::{default_logbook_path, Logbook, LogbookWriter};
use workout_engine::model::Feedback;
use workout_engine::notify::Notifier;
use workout_engine::template::WorkoutTemplate;

#[derive(Parser)]
#[command(
    name = "workout-engine",
    about = "Guided workout session engine with real-time set tracking",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a guided session from a workout template.
    Run {
        /// Path to the workout template TOML file.
        template: PathBuf,
        /// Path to the logbook database.
        #[arg(long)]
        logbook: Option<PathBuf>,
        /// Do not persist the session to a logbook.
        #[arg(long)]
        no_logbook: bool,
    },
    /// Validate a workout template and print its plan.
    Validate {
        /// Path to the workout template TOML file.
        template: PathBuf,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

/// Parse an interactive command line into a session command.
///
/// Supported forms: `start`, `pause`, `resume`, `done <reps> [weight]`,
/// `skip`, `next`, `prev`, `rest`, `finish`, `cancel`,
/// `feedback <difficulty> <energy> <enjoyment> [notes...]`.
fn parse_command(line: &str) -> Option<SessionCommand> {
    let mut parts = line.split_whitespace();
    let word = parts.next()?;
    match word {
        "start" => Some(SessionCommand::Start),
        "pause" => Some(SessionCommand::Pause),
        "resume" => Some(SessionCommand::Resume),
        "done" | "complete" => {
            let reps = parts.next()?.parse().ok()?;
            let weight = parts.next().and_then(|w| w.parse().ok());
            Some(SessionCommand::CompleteSet {
                reps,
                weight,
                notes: None,
            })
        }
        "skip" => Some(SessionCommand::SkipSet),
        "next" => Some(SessionCommand::NextExercise),
        "prev" | "previous" => Some(SessionCommand::PreviousExercise),
        "rest" => Some(SessionCommand::SkipRest),
        "finish" => Some(SessionCommand::Finish),
        "cancel" => Some(SessionCommand::Cancel),
        "feedback" => {
            let difficulty = parts.next()?.parse().ok()?;
            let energy = parts.next()?.parse().ok()?;
            let enjoyment = parts.next()?.parse().ok()?;
            let rest: Vec<&str> = parts.collect();
            let notes = if rest.is_empty() {
                None
            } else {
                Some(rest.join(" "))
            };
            Some(SessionCommand::SubmitFeedback(Feedback::new(
                difficulty, energy, enjoyment, notes,
            )))
        }
        _ => None,
    }
}

async fn run_session(
    template: PathBuf,
    logbook_path: Option<PathBuf>,
    no_logbook: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let template = WorkoutTemplate::load(&template)?;
    display::print_template_summary(
        &template.name,
        template.description.as_deref(),
        &template.exercises,
    );

    let session = template.into_session();
    let session_id = session.id;
    let template_name = session.template_name.clone();
    let total_sets = session.total_sets();

    let (notifier, mut notification_rx) = Notifier::channel();
    let controller = SessionController::new(session, notifier);

    // Fan notifications out to the terminal and, unless disabled, a logbook.
    let logbook_tx = if no_logbook {
        None
    } else {
        let path = logbook_path.unwrap_or_else(default_logbook_path);
        let logbook = Logbook::open(&path).await?;
        logbook
            .register_session(session_id, template_name, total_sets)
            .await?;
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(LogbookWriter::new(logbook, rx).run());
        Some(tx)
    };
    tokio::spawn(async move {
        while let Some(notification) = notification_rx.recv().await {
            display::print_notification(&notification);
            if let Some(tx) = &logbook_tx {
                let _ = tx.send(notification);
            }
        }
    });

    let (command_tx, command_rx) = mpsc::channel(32);
    let cancel = CancellationToken::new();
    let driver = SessionDriver::new(controller, command_rx).with_cancellation(cancel.clone());
    let driver_handle = tokio::spawn(driver.run());

    // Feed stdin commands into the driver until EOF or `quit`.
    let stdin_cancel = cancel.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            if line == "quit" || line == "exit" {
                stdin_cancel.cancel();
                break;
            }
            match parse_command(&line) {
                Some(command) => {
                    if command_tx.send(command).await.is_err() {
                        break;
                    }
                }
                None => display::print_error(&format!("unrecognized command: {line}")),
            }
        }
        drop(command_tx);
    });

    let summary = driver_handle.await?;
    display::print_summary(&summary);
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            template,
            logbook,
            no_logbook,
        } => run_session(template, logbook, no_logbook).await,
        Commands::Validate { template } => match WorkoutTemplate::load(&template) {
            Ok(template) => {
                display::print_template_summary(
                    &template.name,
                    template.description.as_deref(),
                    &template.exercises,
                );
                println!("{} sets total", template.total_sets());
                Ok(())
            }
            Err(e) => Err(e.into()),
        },
    };

    if let Err(e) = result {
        display::print_error(&e.to_string());
        std::process::exit(1);
    }
}
