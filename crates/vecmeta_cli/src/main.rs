//! VecMeta CLI
//!
//! Command-line tools for a VecMeta catalog directory.
//!
//! # Commands
//!
//! - `init` - Create a catalog with its default database
//! - `create-collection` - Create a collection from a JSON schema file
//! - `has-collection` - Check whether a collection exists
//! - `describe-collection` - Print a collection record
//! - `list` - List databases and collections
//! - `verify` - Check that every stored record decodes

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// VecMeta catalog tools.
#[derive(Parser)]
#[command(name = "vecmeta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the catalog directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a catalog with its default database
    Init,

    /// Create a collection from a JSON schema file
    CreateCollection {
        /// Owning database (default database if omitted)
        #[arg(long, default_value = "")]
        db: String,

        /// Collection name
        #[arg(short, long)]
        name: String,

        /// JSON file holding the collection schema
        #[arg(short, long)]
        schema: PathBuf,

        /// Number of shards
        #[arg(long, default_value = "1")]
        shards: i32,

        /// Number of partitions when the schema has a partition key
        #[arg(long, default_value = "0")]
        partitions: i64,

        /// Consistency level (strong, session, bounded, eventually, customized)
        #[arg(short, long, default_value = "bounded")]
        consistency: String,

        /// Collection property as key=value, repeatable
        #[arg(long = "property")]
        properties: Vec<String>,
    },

    /// Check whether a collection exists
    HasCollection {
        /// Owning database (default database if omitted)
        #[arg(long, default_value = "")]
        db: String,

        /// Collection name
        #[arg(short, long)]
        name: String,
    },

    /// Print a collection record
    DescribeCollection {
        /// Owning database (default database if omitted)
        #[arg(long, default_value = "")]
        db: String,

        /// Collection name
        #[arg(short, long)]
        name: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List databases, or the collections of one database
    List {
        /// Only list collections of this database
        #[arg(long)]
        db: Option<String>,
    },

    /// Check that every stored record decodes
    Verify,

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Init => {
            let path = cli.path.ok_or("Catalog path required for init")?;
            commands::init::run(&path)?;
        }
        Commands::CreateCollection {
            db,
            name,
            schema,
            shards,
            partitions,
            consistency,
            properties,
        } => {
            let path = cli.path.ok_or("Catalog path required for create-collection")?;
            let args = commands::create_collection::CreateArgs {
                db,
                name,
                schema,
                shards,
                partitions,
                consistency,
                properties,
            };
            commands::create_collection::run(&path, &args)?;
        }
        Commands::HasCollection { db, name } => {
            let path = cli.path.ok_or("Catalog path required for has-collection")?;
            commands::inspect::has_collection(&path, &db, &name)?;
        }
        Commands::DescribeCollection { db, name, format } => {
            let path = cli.path.ok_or("Catalog path required for describe-collection")?;
            commands::inspect::describe(&path, &db, &name, &format)?;
        }
        Commands::List { db } => {
            let path = cli.path.ok_or("Catalog path required for list")?;
            commands::inspect::list(&path, db.as_deref())?;
        }
        Commands::Verify => {
            let path = cli.path.ok_or("Catalog path required for verify")?;
            commands::verify::run(&path)?;
        }
        Commands::Version => {
            println!("VecMeta CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("VecMeta Core v{}", vecmeta_core::VERSION);
        }
    }

    Ok(())
}
