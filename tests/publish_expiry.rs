//! Integration tests for the publish/expire lifecycle
//!
//! These tests drive the crate the way a tile server's seeding and expiry
//! jobs would: build a tree with atomic writes, publish it over the live
//! directory with a swap, then expire stale tiles by cutoff.

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use tempfile::TempDir;

use tilesweep::errors::SwapError;
use tilesweep::prelude::*;

/// Write a tile file and backdate its mtime by `age_secs`
fn write_aged_tile(path: &Path, content: &[u8], age_secs: u64) {
    ensure_parent_dir(path).unwrap();
    write_atomic(path, content).unwrap();
    let mtime = SystemTime::now() - Duration::from_secs(age_secs);
    filetime::set_file_mtime(path, filetime::FileTime::from_system_time(mtime)).unwrap();
}

#[test]
fn test_build_publish_republish_cycle() {
    let temp_dir = TempDir::new().unwrap();
    let live = temp_dir.path().join("tiles");
    let swapper = AtomicDirectorySwapper::new(SwapConfig::default());

    // first seeding run publishes into an absent live path
    let build = temp_dir.path().join("build-1");
    write_aged_tile(&build.join("0/0/0.png"), b"v1", 0);
    swapper.swap(&build, &live).unwrap();

    assert!(!build.exists());
    assert_eq!(fs::read(live.join("0/0/0.png")).unwrap(), b"v1");

    // second run displaces the first; no backup is left behind
    let build = temp_dir.path().join("build-2");
    write_aged_tile(&build.join("0/0/0.png"), b"v2", 0);
    write_aged_tile(&build.join("1/0/0.png"), b"new level", 0);
    swapper.swap(&build, &live).unwrap();

    assert_eq!(fs::read(live.join("0/0/0.png")).unwrap(), b"v2");
    assert_eq!(fs::read(live.join("1/0/0.png")).unwrap(), b"new level");
    assert!(!temp_dir.path().join("tiles.tmp").exists());
}

#[test]
fn test_publish_with_backup_retains_previous_version() {
    let temp_dir = TempDir::new().unwrap();
    let live = temp_dir.path().join("tiles");

    let build = temp_dir.path().join("build-1");
    write_aged_tile(&build.join("0/0/0.png"), b"v1", 0);
    AtomicDirectorySwapper::new(SwapConfig::default())
        .swap(&build, &live)
        .unwrap();

    let build = temp_dir.path().join("build-2");
    write_aged_tile(&build.join("0/0/0.png"), b"v2", 0);
    AtomicDirectorySwapper::new(SwapConfig::default().with_keep_old(true))
        .swap(&build, &live)
        .unwrap();

    let backup = temp_dir.path().join("tiles.tmp");
    assert_eq!(fs::read(live.join("0/0/0.png")).unwrap(), b"v2");
    assert_eq!(fs::read(backup.join("0/0/0.png")).unwrap(), b"v1");
}

#[test]
fn test_expiry_after_publish() {
    let temp_dir = TempDir::new().unwrap();
    let live = temp_dir.path().join("tiles");

    let build = temp_dir.path().join("build");
    write_aged_tile(&build.join("10/5/3.png"), b"stale", 3 * 24 * 3600);
    write_aged_tile(&build.join("10/5/4.png"), b"stale too", 3 * 24 * 3600);
    write_aged_tile(&build.join("10/6/1.png"), b"fresh", 60);
    AtomicDirectorySwapper::new(SwapConfig::default())
        .swap(&build, &live)
        .unwrap();

    let cutoff = timestamp_before(TimeOffset::default().days(1));
    DirectoryCleaner::new(CleanupConfig::default())
        .clean(&live, cutoff)
        .unwrap();

    // stale tiles and their emptied directory are gone, fresh tile survives
    assert!(!live.join("10/5").exists());
    assert_eq!(fs::read(live.join("10/6/1.png")).unwrap(), b"fresh");
    assert!(live.exists());
}

#[test]
fn test_full_purge_removes_live_tree() {
    let temp_dir = TempDir::new().unwrap();
    let live = temp_dir.path().join("tiles");
    write_aged_tile(&live.join("10/5/3.png"), b"tile", 0);

    DirectoryCleaner::new(CleanupConfig::default())
        .clean(&live, DELETE_ALL)
        .unwrap();

    assert!(!live.exists());
}

#[test]
fn test_stale_backup_blocks_next_publish() {
    // A previous keep_old publish (or a crash mid-swap) left a non-empty
    // backup behind; moving the live tree aside then fails and the error
    // surfaces to the caller rather than being papered over.
    let temp_dir = TempDir::new().unwrap();
    let live = temp_dir.path().join("tiles");
    write_aged_tile(&live.join("0/0/0.png"), b"live", 0);

    let stale_backup = temp_dir.path().join("tiles.tmp");
    write_aged_tile(&stale_backup.join("0/0/0.png"), b"stale", 0);

    let build = temp_dir.path().join("build");
    write_aged_tile(&build.join("0/0/0.png"), b"v2", 0);

    let err = AtomicDirectorySwapper::new(SwapConfig::default())
        .swap(&build, &live)
        .unwrap_err();
    assert!(matches!(err, SwapError::BackupFailed { .. }));

    // the live tree is untouched; clearing the backup lets the swap proceed
    assert_eq!(fs::read(live.join("0/0/0.png")).unwrap(), b"live");
    fs::remove_dir_all(&stale_backup).unwrap();
    AtomicDirectorySwapper::new(SwapConfig::default())
        .swap(&build, &live)
        .unwrap();
    assert_eq!(fs::read(live.join("0/0/0.png")).unwrap(), b"v2");
}
