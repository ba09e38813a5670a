//! Database schema for the workout logbook.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: u32 = 1;

/// SQL schema for the logbook database.
pub const SCHEMA: &str = r"
-- Enable WAL mode for better concurrent read/write performance
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Sessions table: one row per workout session
CREATE TABLE IF NOT EXISTS sessions (
    id TEXT PRIMARY KEY NOT NULL,
    template_name TEXT,
    status TEXT NOT NULL,
    started_at TEXT,
    ended_at TEXT,
    processed_sets INTEGER NOT NULL DEFAULT 0,
    total_sets INTEGER NOT NULL DEFAULT 0,
    progress_percent REAL NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Set records table: append-only performance log
CREATE TABLE IF NOT EXISTS set_records (
    id TEXT PRIMARY KEY NOT NULL,
    session_id TEXT NOT NULL,
    exercise_id TEXT NOT NULL,
    set_number INTEGER NOT NULL,
    reps INTEGER,
    weight REAL,
    completed INTEGER NOT NULL,
    notes TEXT,
    recorded_at TEXT NOT NULL,
    FOREIGN KEY (session_id) REFERENCES sessions(id) ON DELETE CASCADE
);

-- Feedback table: single subjective rating per session
CREATE TABLE IF NOT EXISTS feedback (
    session_id TEXT PRIMARY KEY NOT NULL,
    difficulty INTEGER NOT NULL,
    energy INTEGER NOT NULL,
    enjoyment INTEGER NOT NULL,
    notes TEXT,
    submitted_at TEXT NOT NULL,
    FOREIGN KEY (session_id) REFERENCES sessions(id) ON DELETE CASCADE
);

-- Schema version table for migrations
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_set_records_session_id ON set_records(session_id);
CREATE INDEX IF NOT EXISTS idx_set_records_exercise_id ON set_records(exercise_id);
CREATE INDEX IF NOT EXISTS idx_set_records_recorded_at ON set_records(recorded_at);
CREATE INDEX IF NOT EXISTS idx_sessions_started_at ON sessions(started_at);
";
