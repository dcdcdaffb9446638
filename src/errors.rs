//! Error types for tilesweep
//!
//! This module defines the error types for all components of the crate.
//! Errors are designed to be actionable: transient filesystem races are
//! handled inside the components themselves, so everything surfaced here
//! is a genuine failure the caller must deal with.

use std::io;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

/// Directory swap errors
#[derive(Error, Debug)]
pub enum SwapError {
    /// Source directory missing or not a directory
    #[error("swap source is not a directory: {path}")]
    SourceMissing { path: PathBuf },

    /// Moving the previous destination aside failed
    #[error("failed to move previous contents of {path} to backup")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Destination stayed occupied through every rename attempt
    #[error("destination still occupied after {attempts} rename attempts")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: io::Error,
    },

    /// Any other I/O failure during the swap
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Directory cleanup errors
#[derive(Error, Debug)]
pub enum CleanupError {
    /// Reading a directory's entries failed
    #[error("failed to scan directory {path}")]
    Scan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other I/O failure during cleanup
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Atomic file write errors
#[derive(Error, Debug)]
pub enum WriteError {
    /// Writing or publishing the temp file failed; the target is untouched
    #[error("atomic write to {path} failed")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Creating the parent directory chain failed
    #[error("failed to create parent directory for {path}")]
    ParentDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Timestamp parsing errors
#[derive(Error, Debug)]
pub enum TimestampError {
    /// Input did not match the `YYYY-MM-DDTHH:MM:SS` shape
    #[error("invalid ISO date `{value}`, expected YYYY-MM-DDTHH:MM:SS")]
    InvalidFormat {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The wall-clock time does not exist in the local timezone (DST gap)
    #[error("datetime {datetime} does not exist in the local timezone")]
    NonexistentLocalTime { datetime: NaiveDateTime },
}

/// Top-level error that can represent any maintenance failure
#[derive(Error, Debug)]
pub enum MaintenanceError {
    /// Directory swap error
    #[error(transparent)]
    Swap(#[from] SwapError),

    /// Cleanup error
    #[error(transparent)]
    Cleanup(#[from] CleanupError),

    /// Atomic write error
    #[error(transparent)]
    Write(#[from] WriteError),

    /// Timestamp error
    #[error(transparent)]
    Timestamp(#[from] TimestampError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl MaintenanceError {
    /// Get error category for logging and metrics
    pub fn category(&self) -> &'static str {
        match self {
            MaintenanceError::Swap(_) => "swap",
            MaintenanceError::Cleanup(_) => "cleanup",
            MaintenanceError::Write(_) => "write",
            MaintenanceError::Timestamp(_) => "timestamp",
            MaintenanceError::Io(_) => "io",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MaintenanceError>;

/// Swap result type alias
pub type SwapResult<T> = std::result::Result<T, SwapError>;

/// Cleanup result type alias
pub type CleanupResult<T> = std::result::Result<T, CleanupError>;

/// Write result type alias
pub type WriteResult<T> = std::result::Result<T, WriteError>;

/// Timestamp result type alias
pub type TimestampResult<T> = std::result::Result<T, TimestampError>;
