//! Prelude module for tilesweep
//!
//! Re-exports the most commonly used items from the crate, providing a
//! convenient way to import everything needed for typical usage with a
//! single `use tilesweep::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use tilesweep::prelude::*;
//!
//! fn publish(build_dir: &Path, live_dir: &Path) -> Result<()> {
//!     let swapper = AtomicDirectorySwapper::new(SwapConfig::default());
//!     swapper.swap(build_dir, live_dir)?;
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{MaintenanceError, Result};

// Maintenance components
pub use crate::cleanup::{CleanupConfig, DirectoryCleaner, remove_dir_if_empty};
pub use crate::swap::{AtomicDirectorySwapper, SwapConfig};
pub use crate::timestamp::{
    TimeOffset, timestamp_before, timestamp_from_datetime, timestamp_from_isodate,
};
pub use crate::write::{ensure_parent_dir, write_atomic};

// Commonly used constants
pub use crate::constants::{DEFAULT_BACKUP_SUFFIX, DELETE_ALL, MAX_RENAME_ATTEMPTS};

// Standard library re-exports that are commonly needed
pub use std::path::{Path, PathBuf};
