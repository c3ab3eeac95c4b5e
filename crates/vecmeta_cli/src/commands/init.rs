//! Init command implementation.

use std::path::Path;
use tracing::info;
use vecmeta_core::{CatalogService, Config, Coordinator};

/// Runs the init command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    info!("Initializing catalog at {:?}", path);
    let coordinator = Coordinator::open(&Config::new(path).exclusive_lock(true))?;

    let databases = coordinator.list_databases();
    if !databases.status.is_success() {
        return Err(databases.status.reason.into());
    }

    println!("✓ Catalog ready at {:?}", path);
    for db in &databases.databases {
        println!("  Database: {} ({})", db.name, db.id);
    }
    Ok(())
}
