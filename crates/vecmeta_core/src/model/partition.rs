//! Partition records.

use crate::types::{CollectionId, PartitionId, Timestamp};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartitionState {
    /// Ready for use.
    #[default]
    Created,
    /// Being dropped.
    Dropping,
    /// Dropped.
    Dropped,
}

/// A named subdivision of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// Allocated id.
    pub id: PartitionId,
    /// Partition name.
    pub name: String,
    /// Owning collection.
    pub collection_id: CollectionId,
    /// Creation time, seconds since the epoch.
    pub created_time: Timestamp,
    /// Lifecycle state.
    pub state: PartitionState,
}
