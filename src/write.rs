//! Atomic single-file writes
//!
//! Writes go to a randomly named sibling temp file first and are published
//! with a rename, so readers never observe a partially written target. Rename
//! is atomic on POSIX filesystems; on Windows the implementation falls back
//! to a direct write and the atomicity guarantee is lost.

use std::fs;
use std::path::Path;
#[cfg(not(windows))]
use std::path::PathBuf;

use tracing::trace;

use crate::errors::{WriteError, WriteResult};

/// Write `data` to `path` so that readers see either the old content or the
/// complete new content, never a partial write
///
/// The temp file is created exclusively under `path + ".tmp-" + <random>`; a
/// collision with an existing temp file fails rather than retrying, which
/// callers may retry at a higher level. Two concurrent writers to the same
/// target use different temp names, and whichever rename lands last wins.
///
/// # Errors
///
/// Returns `WriteError` on any I/O failure. The temp file is removed
/// best-effort and `path` is left as it was before the call.
#[cfg(not(windows))]
pub fn write_atomic(path: &Path, data: &[u8]) -> WriteResult<()> {
    let temp_path = temp_sibling(path);
    trace!(path = %path.display(), temp = %temp_path.display(), "Atomic write");

    write_and_publish(&temp_path, path, data).map_err(|source| {
        let _ = fs::remove_file(&temp_path);
        WriteError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Direct write fallback; rename-over-existing is not atomic here
#[cfg(windows)]
pub fn write_atomic(path: &Path, data: &[u8]) -> WriteResult<()> {
    fs::write(path, data).map_err(|source| WriteError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(not(windows))]
fn write_and_publish(temp_path: &Path, final_path: &Path, data: &[u8]) -> std::io::Result<()> {
    use std::io::Write;

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(temp_path)?;
    file.write_all(data)?;
    drop(file);
    fs::rename(temp_path, final_path)
}

/// Sibling temp path: `<path>.tmp-<random 0..999999>`
#[cfg(not(windows))]
fn temp_sibling(path: &Path) -> PathBuf {
    use rand::Rng;

    use crate::constants::files;

    let n: u32 = rand::thread_rng().gen_range(0..files::TEMP_NAME_RANDOM_MAX);
    let mut temp = path.as_os_str().to_os_string();
    temp.push(format!("{}{}", files::TEMP_NAME_INFIX, n));
    PathBuf::from(temp)
}

/// Create the parent directory chain of a file path if it does not exist
///
/// Safe to call concurrently: a directory created by another actor between
/// the check and the create is not an error.
pub fn ensure_parent_dir(path: &Path) -> WriteResult<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent.exists() {
        return Ok(());
    }
    match fs::create_dir_all(parent) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(()),
        Err(source) => Err(WriteError::ParentDir {
            path: path.to_path_buf(),
            source,
        }),
    }
}
