//! Atomic directory publication
//!
//! Publishes a freshly built directory tree under a stable path with the
//! temp-dir + rename pattern: the previous destination is renamed aside to a
//! backup path first, so the stable path is missing only for the instant
//! between two renames. Both renames are atomic within one filesystem volume.
//!
//! Another process may recreate the destination name while the swap is in
//! flight (seeding and serving race on the same cache directories), so the
//! final rename treats "destination occupied" as a transient condition: it
//! clears the occupant and retries with exponential backoff rather than
//! failing outright.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::swap;
use crate::errors::{SwapError, SwapResult};

/// Configuration for directory swaps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapConfig {
    /// Keep the previous destination tree at the backup path after the swap
    pub keep_old: bool,
    /// Suffix appended to the destination to form the backup path
    pub backup_suffix: String,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            keep_old: false,
            backup_suffix: swap::DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }
}

impl SwapConfig {
    /// Keep or discard the previous destination tree
    pub fn with_keep_old(mut self, keep_old: bool) -> Self {
        self.keep_old = keep_old;
        self
    }

    /// Set the backup path suffix
    pub fn with_backup_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.backup_suffix = suffix.into();
        self
    }
}

/// Atomically replaces a destination directory with a freshly built source tree
///
/// Ownership of the source tree transfers at swap time: after a successful
/// [`swap`](Self::swap) the source path no longer exists and must not be reused.
#[derive(Debug, Clone, Default)]
pub struct AtomicDirectorySwapper {
    config: SwapConfig,
}

impl AtomicDirectorySwapper {
    /// Create a new swapper with the given configuration
    pub fn new(config: SwapConfig) -> Self {
        Self { config }
    }

    /// Get the swap configuration
    pub fn config(&self) -> &SwapConfig {
        &self.config
    }

    /// Rename `source` onto `destination`, displacing the previous contents
    ///
    /// The previous destination (if any) is first renamed to
    /// `destination + backup_suffix` and, unless `keep_old` is set, removed
    /// once the new tree is in place. Removal of the stale backup is
    /// best-effort: the swap has already succeeded at that point.
    ///
    /// # Errors
    ///
    /// Returns `SwapError` if the source is missing, if moving the previous
    /// destination aside fails, or if the destination stays occupied through
    /// every rename attempt. On retry exhaustion the destination is left in a
    /// transient state that a repeated call can recover.
    pub fn swap(&self, source: &Path, destination: &Path) -> SwapResult<()> {
        if !source.is_dir() {
            return Err(SwapError::SourceMissing {
                path: source.to_path_buf(),
            });
        }

        let backup = backup_path(destination, &self.config.backup_suffix);

        if destination.exists() {
            fs::rename(destination, &backup).map_err(|source| SwapError::BackupFailed {
                path: destination.to_path_buf(),
                source,
            })?;
            debug!(
                destination = %destination.display(),
                backup = %backup.display(),
                "Moved previous destination aside"
            );
        }

        force_rename(source, destination)?;
        debug!(
            source = %source.display(),
            destination = %destination.display(),
            "Published new directory tree"
        );

        if !self.config.keep_old && backup.exists() {
            if let Err(e) = fs::remove_dir_all(&backup) {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(
                        backup = %backup.display(),
                        error = %e,
                        "Failed to remove stale backup after swap"
                    );
                }
            }
        }

        Ok(())
    }
}

/// Build the backup path by appending the suffix to the destination name
fn backup_path(destination: &Path, suffix: &str) -> PathBuf {
    let mut path = destination.as_os_str().to_os_string();
    path.push(suffix);
    PathBuf::from(path)
}

/// Rename `source` onto `destination`, clearing any occupant that appears
///
/// Another actor may recreate the destination between removal and rename, so
/// occupancy failures are retried up to [`swap::MAX_RENAME_ATTEMPTS`] times
/// with exponential backoff. Any other failure kind propagates immediately.
pub(crate) fn force_rename(source: &Path, destination: &Path) -> SwapResult<()> {
    force_rename_with(
        source,
        destination,
        |src, dst| fs::rename(src, dst),
        |p| fs::remove_dir_all(p),
        thread::sleep,
    )
}

/// Retry loop behind [`force_rename`], with the filesystem operations
/// injectable so occupancy races can be exercised deterministically.
fn force_rename_with<R, D, S>(
    source: &Path,
    destination: &Path,
    mut rename: R,
    mut remove: D,
    mut sleep: S,
) -> SwapResult<()>
where
    R: FnMut(&Path, &Path) -> io::Result<()>,
    D: FnMut(&Path) -> io::Result<()>,
    S: FnMut(Duration),
{
    let mut failures = 0u32;
    loop {
        match rename(source, destination) {
            Ok(()) => return Ok(()),
            Err(err) if is_occupied(&err) => {
                failures += 1;
                if failures >= swap::MAX_RENAME_ATTEMPTS {
                    return Err(SwapError::RetriesExhausted {
                        attempts: failures,
                        source: err,
                    });
                }
                debug!(
                    destination = %destination.display(),
                    attempt = failures,
                    "Destination occupied during rename, clearing and retrying"
                );
                if failures > 1 {
                    sleep(backoff_delay(failures - 1));
                }
                match remove(destination) {
                    Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e.into()),
                    _ => {}
                }
            }
            Err(err) => return Err(err.into()),
        }
    }
}

/// Whether a rename failure means the destination name is (still) occupied
fn is_occupied(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::AlreadyExists | io::ErrorKind::DirectoryNotEmpty
    )
}

/// Backoff before the nth retry: `2^n / 100` seconds. Retries 2 through 9
/// sleep 20ms up to 2.56s; exhaustion returns before the curve's ~5s tail.
fn backoff_delay(n: u32) -> Duration {
    Duration::from_secs_f64(2f64.powi(n as i32) / swap::BACKOFF_DIVISOR)
}
