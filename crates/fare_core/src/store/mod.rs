//! Local persistence: calibration, favourite routes and recent searches in a
//! single versioned JSON document.
//!
//! The file is rewritten atomically (temp file + rename) on every change. A
//! missing file reads as an empty document; a malformed one is reported as
//! [`StoreError::InvalidFormat`] and callers fall back to defaults. Writes leave
//! a malformed file in place, except an explicit [`save_calibration`].

mod file;
mod model;
mod operations;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::catalog::CatalogError;

pub const STORE_FILE_NAME: &str = "fare_compare_store.json";
pub(crate) const STORE_FILE_VERSION: u32 = 1;

/// Recent searches kept, newest first.
pub const MAX_RECENT_SEARCHES: usize = 5;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    InvalidFormat(String),
    #[error("refusing to save calibration: {0}")]
    InvalidCatalog(#[from] CatalogError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveFavoriteOutcome {
    Removed,
    NotFound,
}

/// Location of the store file inside `data_dir`.
pub fn store_file_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STORE_FILE_NAME)
}

pub use model::{default_favorites, Favorite, RecentSearch, StoredProfile};
pub use operations::{
    add_favorite, clear_calibration, load_calibration, load_favorites, load_recent_searches,
    push_recent_search, remove_favorite, save_calibration,
};
