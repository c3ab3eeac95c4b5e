//! # VecMeta Testkit
//!
//! Test utilities for the VecMeta catalog.
//!
//! This crate provides:
//! - Fixtures: reopenable temp-dir catalogs, schemas and requests
//! - Property-based generators using proptest
//! - Fault injection for the object store
//! - Concurrency stress helpers
//! - Cross-crate integration helpers
//!
//! ## Usage
//!
//! ```rust
//! use vecmeta_core::CatalogService;
//! use vecmeta_testkit::prelude::*;
//!
//! with_temp_catalog(|catalog| {
//!     let status = catalog.create_collection(create_request(&schemas::films()));
//!     assert!(status.is_success());
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod crash;
pub mod fixtures;
pub mod generators;
pub mod integration;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::crash::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
    pub use crate::stress::*;
}

pub use crash::*;
pub use fixtures::*;
pub use generators::*;
pub use integration::*;
pub use stress::*;
