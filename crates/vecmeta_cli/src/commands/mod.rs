//! CLI command implementations.

pub mod create_collection;
pub mod init;
pub mod inspect;
pub mod verify;

use std::path::Path;
use vecmeta_core::{Config, Coordinator};

/// Opens the catalog at `path`, holding the directory lock.
pub fn open_catalog(path: &Path) -> Result<Coordinator, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("No catalog found at {:?}", path).into());
    }
    Ok(Coordinator::open(&Config::new(path).exclusive_lock(true))?)
}
