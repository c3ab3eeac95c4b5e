//! Verify command implementation.

use std::path::Path;
use std::sync::Arc;
use vecmeta_core::MetaStore;
use vecmeta_storage::{FileObjectStore, StoreConfig};

/// Runs the verify command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying catalog at {:?}", path);
    println!();

    if !path.exists() {
        return Err(format!("No catalog found at {:?}", path).into());
    }
    // Scan the raw records; loading the cache would stop at the first bad one.
    let store = FileObjectStore::open(path, StoreConfig::new().exclusive_lock(true))?;
    let report = MetaStore::open(Arc::new(store))?.scan()?;
    println!("  Databases:   {}", report.databases);
    println!("  Collections: {}", report.collections);

    if report.is_clean() {
        println!();
        println!("✓ All records decode");
        return Ok(());
    }

    println!("  Failures:    {}", report.failures.len());
    for failure in &report.failures {
        println!("    - {}: {}", failure.key, failure.error);
    }
    Err(format!("{} records failed to decode", report.failures.len()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn fresh_catalog_is_clean() {
        let dir = tempdir().unwrap();
        super::super::init::run(dir.path()).unwrap();
        run(dir.path()).unwrap();
    }

    #[test]
    fn corrupt_record_fails() {
        let dir = tempdir().unwrap();
        super::super::init::run(dir.path()).unwrap();
        fs::create_dir_all(dir.path().join("collections/1")).unwrap();
        fs::write(dir.path().join("collections/1/2"), b"garbage").unwrap();
        assert!(run(dir.path()).is_err());
    }
}
