//! Initial partition planning.

use crate::allocator::IdAllocator;
use crate::error::{CoreError, CoreResult};
use crate::model::{CollectionSchema, Partition, PartitionState};
use crate::types::{CollectionId, PartitionId, Timestamp};
use tracing::info;

/// Name of the single partition, and prefix of partition-key partitions.
pub const DEFAULT_PARTITION_NAME: &str = "default";

/// Upper bound on the partitions of one collection.
pub const MAX_PARTITION_NUM: u32 = 4096;

/// Computes the initial partitions of a new collection.
///
/// A schema with a partition-key field gets `num_partitions` partitions
/// named `default_0` upward; any other schema gets one partition named
/// `default`. Identifiers come from one contiguous allocation.
///
/// # Errors
///
/// Returns [`CoreError::InvalidArgument`] if a partition key is declared and
/// `num_partitions` is not in `1..=MAX_PARTITION_NUM`, and
/// [`CoreError::Unavailable`] if the allocator fails.
pub fn assign_partitions(
    allocator: &dyn IdAllocator,
    num_partitions: i64,
    schema: &CollectionSchema,
    collection_id: CollectionId,
    created_time: Timestamp,
) -> CoreResult<Vec<Partition>> {
    let names: Vec<String> = if schema.partition_key_field().is_some() {
        if num_partitions <= 0 {
            return Err(CoreError::invalid_argument(
                "the specified partitions should be greater than 0 if partition key is used",
            ));
        }
        let count = u32::try_from(num_partitions)
            .ok()
            .filter(|n| *n <= MAX_PARTITION_NUM)
            .ok_or_else(|| {
                CoreError::invalid_argument(format!(
                    "partition number {num_partitions} exceeds {MAX_PARTITION_NUM}"
                ))
            })?;
        (0..count)
            .map(|i| format!("{DEFAULT_PARTITION_NAME}_{i}"))
            .collect()
    } else {
        vec![DEFAULT_PARTITION_NAME.to_string()]
    };

    let count = u32::try_from(names.len()).map_err(|_| CoreError::IdExhausted)?;
    let (start, _) = allocator
        .alloc(count)
        .map_err(|e| CoreError::unavailable(format!("failed to allocate partition ids: {e}")))?;

    let partitions: Vec<Partition> = (start..)
        .zip(names)
        .map(|(id, name)| Partition {
            id: PartitionId::new(id),
            name,
            collection_id,
            created_time,
            state: PartitionState::Created,
        })
        .collect();

    info!(
        collection = %schema.name,
        partitions = ?partitions.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
        "assigned partitions"
    );
    Ok(partitions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::LocalIdAllocator;
    use crate::model::{DataType, FieldSchema};
    use crate::types::UniqueId;

    struct FailingAllocator;

    impl IdAllocator for FailingAllocator {
        fn alloc(&self, _count: u32) -> CoreResult<(UniqueId, UniqueId)> {
            Err(CoreError::IdExhausted)
        }

        fn advance_past(&self, _id: UniqueId) {}
    }

    fn keyed() -> CollectionSchema {
        CollectionSchema::new("films")
            .field(FieldSchema::new("id", DataType::Int64).primary_key(false))
            .field(FieldSchema::new("genre", DataType::Int64).partition_key())
    }

    fn plain() -> CollectionSchema {
        CollectionSchema::new("films")
            .field(FieldSchema::new("id", DataType::Int64).primary_key(false))
    }

    #[test]
    fn partition_key_yields_numbered_partitions() {
        let alloc = LocalIdAllocator::sequential(500);
        let parts = assign_partitions(&alloc, 4, &keyed(), CollectionId::new(9), 77).unwrap();

        let names: Vec<_> = parts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["default_0", "default_1", "default_2", "default_3"]);
        let ids: Vec<_> = parts.iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, vec![500, 501, 502, 503]);
        assert!(parts.iter().all(|p| p.collection_id == CollectionId::new(9)
            && p.created_time == 77
            && p.state == PartitionState::Created));
    }

    #[test]
    fn no_partition_key_yields_default() {
        let alloc = LocalIdAllocator::sequential(500);
        let parts = assign_partitions(&alloc, 16, &plain(), CollectionId::new(9), 0).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].name, "default");
        assert_eq!(parts[0].id.as_i64(), 500);
    }

    #[test]
    fn non_positive_count_rejected() {
        let alloc = LocalIdAllocator::sequential(1);
        for count in [0, -3] {
            assert!(matches!(
                assign_partitions(&alloc, count, &keyed(), CollectionId::new(1), 0),
                Err(CoreError::InvalidArgument { .. })
            ));
        }
        // Nothing was allocated by the rejected calls.
        assert_eq!(alloc.alloc_one().unwrap(), 1);
    }

    #[test]
    fn oversized_count_rejected() {
        let alloc = LocalIdAllocator::sequential(1);
        let too_many = i64::from(MAX_PARTITION_NUM) + 1;
        assert!(matches!(
            assign_partitions(&alloc, too_many, &keyed(), CollectionId::new(1), 0),
            Err(CoreError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn allocator_failure_is_unavailable() {
        assert!(matches!(
            assign_partitions(&FailingAllocator, 1, &plain(), CollectionId::new(1), 0),
            Err(CoreError::Unavailable { .. })
        ));
    }
}
