//! Read-only catalog commands.

use super::open_catalog;
use std::path::Path;
use vecmeta_core::{CatalogService, Collection, ErrorCode};

/// Runs the has-collection command.
pub fn has_collection(path: &Path, db: &str, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let response = open_catalog(path)?.has_collection(db, name);
    if !matches!(response.status.code, ErrorCode::Success | ErrorCode::NotFound) {
        return Err(response.status.reason.into());
    }
    println!("{}", response.value);
    Ok(())
}

/// Runs the describe command.
pub fn describe(
    path: &Path,
    db: &str,
    name: &str,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = open_catalog(path)?.describe_collection(db, name);
    let collection = response
        .collection
        .ok_or_else(|| format!("{:?}: {}", response.status.code, response.status.reason))?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&collection)?),
        _ => print_collection(&collection),
    }
    Ok(())
}

/// Runs the list command.
pub fn list(path: &Path, db: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = open_catalog(path)?;

    let databases = match db {
        Some(name) => vec![name.to_string()],
        None => {
            let response = coordinator.list_databases();
            if !response.status.is_success() {
                return Err(response.status.reason.into());
            }
            response.databases.into_iter().map(|d| d.name).collect()
        }
    };

    for name in databases {
        let response = coordinator.show_collections(&name);
        if !response.status.is_success() {
            return Err(format!("{:?}: {}", response.status.code, response.status.reason).into());
        }
        println!("{} ({} collections)", name, response.collections.len());
        for collection in &response.collections {
            println!(
                "  {:<24} {}  partitions={}",
                collection.name,
                collection.collection_id,
                collection.partitions.len()
            );
        }
    }
    Ok(())
}

fn print_collection(collection: &Collection) {
    println!("Collection: {}", collection.name);
    println!("  ID: {}", collection.collection_id);
    println!("  Database: {}", collection.db_id);
    println!("  State: {:?}", collection.state);
    println!("  Shards: {}", collection.shards_num);
    println!("  Consistency: {:?}", collection.consistency_level);
    println!("  Created: {}", collection.create_time);
    if !collection.description.is_empty() {
        println!("  Description: {}", collection.description);
    }
    println!();
    println!("Fields:");
    for field in &collection.fields {
        let mut flags = Vec::new();
        if field.is_primary_key {
            flags.push("primary");
        }
        if field.auto_id {
            flags.push("auto_id");
        }
        if field.is_partition_key {
            flags.push("partition_key");
        }
        if field.is_dynamic {
            flags.push("dynamic");
        }
        println!(
            "  {:>4}  {:<16} {:?} {}",
            field.field_id.as_i64(),
            field.name,
            field.data_type,
            flags.join(",")
        );
    }
    println!();
    println!("Partitions:");
    for partition in &collection.partitions {
        println!("  {}  {}", partition.id, partition.name);
    }
    if !collection.properties.is_empty() {
        println!();
        println!("Properties:");
        for kv in &collection.properties {
            println!("  {} = {}", kv.key, kv.value);
        }
    }
}
