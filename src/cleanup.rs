//! Timestamp-based cache directory cleanup
//!
//! Walks a cache tree bottom-up and deletes files whose modification time
//! falls before a cutoff, optionally pruning directories left empty. The
//! delete behavior is injectable so callers can substitute their own
//! per-file handling (quarantine, accounting, dry runs) for the default
//! removal.
//!
//! Files routinely vanish mid-walk when another expiry run or the serving
//! process races on the same tree; those `NotFound` outcomes are treated as
//! success throughout.

use std::fs;
use std::io;
use std::path::Path;
use std::time::UNIX_EPOCH;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::constants::cleanup;
use crate::errors::{CleanupError, CleanupResult};

/// Per-file delete strategy used by [`DirectoryCleaner`]
pub type FileHandler = Box<dyn Fn(&Path) -> io::Result<()> + Send + Sync>;

/// Configuration for directory cleanup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupConfig {
    /// Prune directories left (or found) empty during the walk
    pub remove_empty_dirs: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            remove_empty_dirs: true,
        }
    }
}

impl CleanupConfig {
    /// Enable or disable pruning of empty directories
    pub fn with_remove_empty_dirs(mut self, enabled: bool) -> Self {
        self.remove_empty_dirs = enabled;
        self
    }
}

/// Deletes stale files from a cache tree based on their modification time
///
/// A cutoff of [`cleanup::DELETE_ALL`] (zero) deletes unconditionally;
/// otherwise only files with mtime strictly before the cutoff are removed.
pub struct DirectoryCleaner {
    config: CleanupConfig,
    file_handler: Option<FileHandler>,
}

impl DirectoryCleaner {
    /// Create a new cleaner with the given configuration and default
    /// delete-the-file handling
    pub fn new(config: CleanupConfig) -> Self {
        Self {
            config,
            file_handler: None,
        }
    }

    /// Replace the default per-file deletion with a custom handler
    ///
    /// Overriding the handler disables the whole-tree fast path: every
    /// candidate file is passed to the handler individually.
    pub fn with_file_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Path) -> io::Result<()> + Send + Sync + 'static,
    {
        self.file_handler = Some(Box::new(handler));
        self
    }

    /// Get the cleanup configuration
    pub fn config(&self) -> &CleanupConfig {
        &self.config
    }

    /// Delete files under `directory` with mtime strictly before
    /// `before_timestamp` (epoch seconds)
    ///
    /// When the cutoff is zero, pruning is on, and the default handler is in
    /// use, the entire tree is removed in one recursive deletion instead of
    /// being walked file by file.
    ///
    /// # Errors
    ///
    /// Returns `CleanupError` on any I/O failure other than a file or
    /// directory vanishing before it is touched.
    pub fn clean(&self, directory: &Path, before_timestamp: i64) -> CleanupResult<()> {
        if !directory.exists() {
            return Ok(());
        }

        if before_timestamp == cleanup::DELETE_ALL
            && self.config.remove_empty_dirs
            && self.file_handler.is_none()
        {
            debug!(directory = %directory.display(), "Removing entire tree");
            let _ = fs::remove_dir_all(directory);
            return Ok(());
        }

        self.clean_dir(directory, directory, before_timestamp)?;

        if self.config.remove_empty_dirs {
            remove_dir_if_empty(directory)?;
        }
        Ok(())
    }

    /// Process one directory after recursing into its subdirectories
    fn clean_dir(&self, dir: &Path, root: &Path, before_timestamp: i64) -> CleanupResult<()> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            // another actor removed the directory mid-walk
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(source) => {
                return Err(CleanupError::Scan {
                    path: dir.to_path_buf(),
                    source,
                })
            }
        };

        let mut files = Vec::new();
        let mut subdirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| CleanupError::Scan {
                path: dir.to_path_buf(),
                source,
            })?;
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                subdirs.push(entry.path());
            } else {
                files.push(entry.path());
            }
        }

        for subdir in &subdirs {
            self.clean_dir(subdir, root, before_timestamp)?;
        }

        if files.is_empty() {
            // Held no files to begin with; prune it unless it is the root,
            // which is handled once the walk is complete.
            if self.config.remove_empty_dirs && dir != root {
                remove_dir_if_empty(dir)?;
            }
            return Ok(());
        }

        for file in &files {
            let expired = if before_timestamp == cleanup::DELETE_ALL {
                true
            } else {
                match file_mtime(file) {
                    Ok(mtime) => mtime < before_timestamp,
                    // vanished before we could stat it
                    Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                    Err(e) => return Err(e.into()),
                }
            };

            if expired {
                trace!(file = %file.display(), "Deleting expired file");
                match self.handle_file(file) {
                    Ok(()) => {}
                    // vanished before we could delete it
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                }
            }
        }

        if self.config.remove_empty_dirs {
            remove_dir_if_empty(dir)?;
        }
        Ok(())
    }

    fn handle_file(&self, file: &Path) -> io::Result<()> {
        match &self.file_handler {
            Some(handler) => handler(file),
            None => fs::remove_file(file),
        }
    }
}

/// Remove a directory if it is empty, treating "not empty" and "already
/// gone" as success
pub fn remove_dir_if_empty(dir: &Path) -> io::Result<()> {
    match fs::remove_dir(dir) {
        Ok(()) => Ok(()),
        Err(e)
            if matches!(
                e.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::DirectoryNotEmpty
            ) =>
        {
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Last-modified time of a file as epoch seconds, without following symlinks
fn file_mtime(path: &Path) -> io::Result<i64> {
    let modified = fs::symlink_metadata(path)?.modified()?;
    Ok(match modified.duration_since(UNIX_EPOCH) {
        Ok(since) => since.as_secs() as i64,
        Err(before) => -(before.duration().as_secs() as i64),
    })
}
