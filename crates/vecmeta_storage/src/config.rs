//! Object store configuration.

/// Options for opening a [`crate::FileObjectStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Take an advisory exclusive lock on `<root>/LOCK`.
    pub exclusive_lock: bool,

    /// Fsync the parent directory after each rename.
    pub sync_directory: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            exclusive_lock: false,
            sync_directory: true,
        }
    }
}

impl StoreConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to lock the storage root.
    #[must_use]
    pub const fn exclusive_lock(mut self, value: bool) -> Self {
        self.exclusive_lock = value;
        self
    }

    /// Sets whether to fsync directories after renames.
    #[must_use]
    pub const fn sync_directory(mut self, value: bool) -> Self {
        self.sync_directory = value;
        self
    }
}
