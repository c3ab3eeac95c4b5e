//! Catalog configuration.

use std::path::PathBuf;
use vecmeta_storage::StoreConfig;

/// Name of the database that always exists after initialization.
pub const DEFAULT_DB_NAME: &str = "default";

/// Configuration for opening a catalog.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory of the object store.
    pub root_path: PathBuf,

    /// Whether to hold an advisory exclusive lock on the root.
    pub exclusive_lock: bool,

    /// Whether to fsync the parent directory after each record write.
    pub sync_directory: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_path: PathBuf::from("vecmeta_data"),
            exclusive_lock: false,
            sync_directory: true,
        }
    }
}

impl Config {
    /// Creates a configuration rooted at `root_path`.
    #[must_use]
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
            ..Self::default()
        }
    }

    /// Sets whether to take the advisory lock.
    #[must_use]
    pub const fn exclusive_lock(mut self, value: bool) -> Self {
        self.exclusive_lock = value;
        self
    }

    /// Sets whether to fsync directories after writes.
    #[must_use]
    pub const fn sync_directory(mut self, value: bool) -> Self {
        self.sync_directory = value;
        self
    }

    /// Storage-level flags derived from this configuration.
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new()
            .exclusive_lock(self.exclusive_lock)
            .sync_directory(self.sync_directory)
    }
}
