//! File-based object store for persistent records.
//!
//! Layout under the root directory:
//!
//! ```text
//! <root>/
//! ├─ LOCK                      # Advisory lock (only with exclusive_lock)
//! ├─ databases/<id>            # One file per key
//! └─ collections/<db>/<id>
//! ```

use crate::config::StoreConfig;
use crate::error::{StorageError, StorageResult};
use crate::store::{validate_key, ObjectStore, TEMP_SUFFIX};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

const LOCK_FILE: &str = "LOCK";

/// A file-based object store.
///
/// Every key maps to one file below the root directory. Records survive
/// process restarts.
///
/// # Durability
///
/// `put` never overwrites a record in place. It writes a temporary sibling,
/// calls `File::sync_all()`, renames it over the target and (on Unix) fsyncs
/// the parent directory. A crash at any point leaves either the old record or
/// the new one visible, never a truncated file.
///
/// # Thread Safety
///
/// Each write uses its own uniquely named temporary file, so concurrent
/// writers never share one. Two writers racing on the same key end with one
/// of the two complete records.
///
/// # Example
///
/// ```no_run
/// use vecmeta_storage::{FileObjectStore, ObjectStore, StoreConfig};
/// use std::path::Path;
///
/// let store = FileObjectStore::open(Path::new("catalog"), StoreConfig::default()).unwrap();
/// store.ensure_namespace("databases").unwrap();
/// store.put("databases/1", b"record").unwrap();
/// assert_eq!(store.get("databases/1").unwrap(), b"record");
/// ```
#[derive(Debug)]
pub struct FileObjectStore {
    root: PathBuf,
    config: StoreConfig,
    /// Held for the store's lifetime when locking is enabled.
    _lock_file: Option<File>,
}

impl FileObjectStore {
    /// Opens or creates a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The root cannot be created or is not a directory
    /// - Locking is enabled and another process holds the lock (`Locked`)
    pub fn open(root: &Path, config: StoreConfig) -> StorageResult<Self> {
        fs::create_dir_all(root)?;
        if !root.is_dir() {
            return Err(StorageError::Corrupted(format!(
                "storage root is not a directory: {}",
                root.display()
            )));
        }

        let lock_file = if config.exclusive_lock {
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(root.join(LOCK_FILE))?;
            if file.try_lock_exclusive().is_err() {
                return Err(StorageError::Locked);
            }
            Some(file)
        } else {
            None
        };

        Ok(Self {
            root: root.to_path_buf(),
            config,
            _lock_file: lock_file,
        })
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        key.split('/').fold(self.root.clone(), |path, seg| path.join(seg))
    }

    fn write_atomic(&self, target: &Path, value: &[u8]) -> StorageResult<()> {
        let parent = target
            .parent()
            .ok_or_else(|| StorageError::Corrupted("key resolves to the root".into()))?;
        fs::create_dir_all(parent)?;

        let file_name = target
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StorageError::Corrupted("key has no file name".into()))?;
        let temp = parent.join(format!(".{file_name}.{}{TEMP_SUFFIX}", Uuid::new_v4().simple()));

        let result = (|| -> io::Result<()> {
            let mut file = File::create(&temp)?;
            file.write_all(value)?;
            file.sync_all()?;
            drop(file);
            fs::rename(&temp, target)
        })();

        if let Err(e) = result {
            // The target is untouched; only the temporary may be left behind.
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }

        if self.config.sync_directory {
            sync_directory(parent)?;
        }
        Ok(())
    }
}

impl ObjectStore for FileObjectStore {
    fn ensure_namespace(&self, namespace: &str) -> StorageResult<()> {
        validate_key(namespace)?;
        let path = self.path_for(namespace);
        fs::create_dir_all(&path)?;
        if self.config.sync_directory {
            sync_directory(&self.root)?;
        }
        Ok(())
    }

    fn put(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        validate_key(key)?;
        let target = self.path_for(key);
        if target.is_dir() {
            return Err(StorageError::invalid_key(key, "key names a namespace"));
        }
        self.write_atomic(&target, value)
    }

    fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        validate_key(key)?;
        let path = self.path_for(key);
        if path.is_dir() {
            return Err(StorageError::not_found(key));
        }
        match fs::read(&path) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StorageError::not_found(key)),
            Err(e) => Err(e.into()),
        }
    }

    fn list_all(&self, namespace: &str) -> StorageResult<Vec<(String, Vec<u8>)>> {
        validate_key(namespace)?;
        let base = self.path_for(namespace);
        if !base.is_dir() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        let mut pending = vec![(base, namespace.to_string())];
        while let Some((dir, prefix)) = pending.pop() {
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                let name = entry.file_name();
                let name = name.to_str().ok_or_else(|| {
                    StorageError::Corrupted(format!(
                        "non UTF-8 file name below {}",
                        dir.display()
                    ))
                })?;
                // Temporary files of in-flight or crashed writes.
                if name.starts_with('.') {
                    continue;
                }
                let key = format!("{prefix}/{name}");
                if entry.file_type()?.is_dir() {
                    pending.push((entry.path(), key));
                } else {
                    records.push((key, fs::read(entry.path())?));
                }
            }
        }

        records.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(records)
    }
}

/// Syncs a directory so that renames and creations inside it are durable.
#[cfg(unix)]
fn sync_directory(dir: &Path) -> StorageResult<()> {
    File::open(dir)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_directory(_dir: &Path) -> StorageResult<()> {
    // NTFS journals metadata; directory handles cannot be fsynced.
    Ok(())
}
