//! Application constants for tilesweep
//!
//! This module centralizes all constants used throughout the crate,
//! organized by functional domain for maintainability and clarity.

/// Directory swap and rename-retry configuration
pub mod swap {
    /// Maximum rename attempts before giving up on an occupied destination
    pub const MAX_RENAME_ATTEMPTS: u32 = 10;

    /// Divisor for the exponential backoff curve (`2^n / BACKOFF_DIVISOR` seconds)
    pub const BACKOFF_DIVISOR: f64 = 100.0;

    /// Default suffix appended to a destination to form its backup path
    pub const DEFAULT_BACKUP_SUFFIX: &str = ".tmp";
}

/// File operation constants
pub mod files {
    /// Infix inserted between a target path and the random part of a temp name
    pub const TEMP_NAME_INFIX: &str = ".tmp-";

    /// Exclusive upper bound for the random integer in temp-file names
    pub const TEMP_NAME_RANDOM_MAX: u32 = 1_000_000;
}

/// Cleanup and expiry configuration
pub mod cleanup {
    /// Cutoff sentinel meaning "delete unconditionally, regardless of mtime"
    pub const DELETE_ALL: i64 = 0;
}

/// Timestamp parsing constants
pub mod time {
    /// The exact ISO-8601 shape accepted by `timestamp_from_isodate`
    pub const ISO_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
}

// Re-export commonly used constants for convenience
pub use cleanup::DELETE_ALL;
pub use swap::{DEFAULT_BACKUP_SUFFIX, MAX_RENAME_ATTEMPTS};
pub use time::ISO_DATETIME_FORMAT;
