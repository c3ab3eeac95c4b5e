//! Create-collection command implementation.

use super::open_catalog;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use vecmeta_codec::encode_record;
use vecmeta_core::{
    CatalogService, CollectionSchema, ConsistencyLevel, CreateCollectionRequest, KeyValue,
};

/// Arguments of the create-collection command.
#[derive(Debug, Clone)]
pub struct CreateArgs {
    /// Owning database.
    pub db: String,
    /// Collection name.
    pub name: String,
    /// JSON schema file.
    pub schema: PathBuf,
    /// Number of shards.
    pub shards: i32,
    /// Partition count for partition-key schemas.
    pub partitions: i64,
    /// Consistency level name.
    pub consistency: String,
    /// Properties as `key=value`.
    pub properties: Vec<String>,
}

/// Runs the create-collection command.
pub fn run(path: &Path, args: &CreateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let request = build_request(args)?;
    let coordinator = open_catalog(path)?;

    info!("Creating collection {} from {:?}", args.name, args.schema);
    let status = coordinator.create_collection(request);
    if !status.is_success() {
        return Err(format!("{:?}: {}", status.code, status.reason).into());
    }

    println!("✓ Collection {} created", args.name);
    Ok(())
}

/// Reads the schema file and assembles the request.
///
/// A schema without a name takes the collection name.
pub fn build_request(args: &CreateArgs) -> Result<CreateCollectionRequest, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(&args.schema)?;
    let mut schema: CollectionSchema = serde_json::from_str(&json)?;
    if schema.name.is_empty() {
        schema.name = args.name.clone();
    }

    Ok(CreateCollectionRequest {
        db_name: args.db.clone(),
        collection_name: args.name.clone(),
        schema: encode_record(&schema)?,
        shards_num: args.shards,
        consistency_level: args.consistency.parse::<ConsistencyLevel>()?,
        num_partitions: args.partitions,
        properties: parse_properties(&args.properties)?,
    })
}

fn parse_properties(raw: &[String]) -> Result<Vec<KeyValue>, Box<dyn std::error::Error>> {
    raw.iter()
        .map(|entry| {
            entry
                .split_once('=')
                .map(|(k, v)| KeyValue::new(k.trim(), v.trim()))
                .ok_or_else(|| format!("Invalid property {entry:?}, expected key=value").into())
        })
        .collect()
}
