//! Logbook error types.

use std::path::PathBuf;

/// Errors raised by the logbook store.
///
/// All variants are write-side: readers of the notification stream treat
/// them as warnings, never as session failures.
#[derive(thiserror::Error, Debug)]
pub enum LogbookError {
    /// The logbook database could not be opened or created.
    #[error("Cannot open logbook at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A read or write against the logbook failed.
    #[error("Logbook storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// The blocking storage task was torn down mid-operation, typically
    /// during runtime shutdown.
    #[error("Logbook operation interrupted by shutdown")]
    Interrupted,

    /// The logbook's parent directory could not be created.
    #[error("Cannot create logbook directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
