//! Tilesweep
//!
//! Filesystem maintenance primitives for tile cache servers. A seeding
//! process builds a new tile tree off to the side and publishes it with an
//! atomic directory swap; an expiry process deletes tiles older than a
//! cutoff and prunes the directories they leave behind. Both sides tolerate
//! the other running concurrently on the same paths.
//!
//! All operations are synchronous, blocking filesystem calls. The crate
//! creates no threads and takes no locks: every atomicity guarantee derives
//! from rename being atomic within one filesystem volume, and transient
//! races are absorbed by bounded retries.
//!
//! # Components
//!
//! - [`swap`] - atomic publication of a directory tree under a stable path
//! - [`cleanup`] - timestamp-based deletion of stale cache files
//! - [`write`] - atomic single-file writes via temp file + rename
//! - [`timestamp`] - cutoff computation from offsets and ISO dates

pub mod cleanup;
pub mod constants;
pub mod errors;
pub mod prelude;
pub mod swap;
pub mod timestamp;
pub mod write;

// Re-export commonly used types for convenience
pub use cleanup::{CleanupConfig, DirectoryCleaner};
pub use errors::{MaintenanceError, Result};
pub use swap::{AtomicDirectorySwapper, SwapConfig};
pub use timestamp::{timestamp_before, timestamp_from_isodate, TimeOffset};
pub use write::{ensure_parent_dir, write_atomic};
