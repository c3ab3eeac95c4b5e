//! Database records.

use crate::config::DEFAULT_DB_NAME;
use crate::types::{DatabaseId, Timestamp};
use serde::{Deserialize, Serialize};

/// Identifier of the default database.
pub const DEFAULT_DB_ID: DatabaseId = DatabaseId::new(1);

/// Lifecycle state of a database.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseState {
    /// Being created.
    Creating,
    /// Ready for use.
    #[default]
    Created,
    /// Being dropped.
    Dropping,
    /// Dropped.
    Dropped,
}

/// A named namespace of collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    /// Tenant owning the database.
    pub tenant_id: String,
    /// Numeric id.
    pub id: DatabaseId,
    /// Globally unique name.
    pub name: String,
    /// Lifecycle state.
    pub state: DatabaseState,
    /// Creation time, seconds since the epoch.
    pub created_time: Timestamp,
}

impl Database {
    /// The database bootstrapped on first start.
    #[must_use]
    pub fn default_database(created_time: Timestamp) -> Self {
        Self {
            tenant_id: String::new(),
            id: DEFAULT_DB_ID,
            name: DEFAULT_DB_NAME.to_string(),
            state: DatabaseState::Created,
            created_time,
        }
    }
}
