//! Concurrency stress helpers for the catalog.
//!
//! These runs hammer one coordinator from many threads and report how many
//! creations succeeded, so tests can check the cache's compare-on-write.

use crate::fixtures::create_request;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use vecmeta_core::{CatalogService, CollectionSchema, Coordinator, DataType, FieldSchema};

/// Result of a stress run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total requests issued.
    pub total_ops: usize,
    /// Requests answered with success.
    pub successful_ops: usize,
    /// Requests answered with an error status.
    pub failed_ops: usize,
    /// Wall time of the run.
    pub duration: Duration,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        Self {
            total_ops: successful + failed,
            successful_ops: successful,
            failed_ops: failed,
            duration,
        }
    }

    /// Prints a summary of the run.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {name} ===");
        println!("Total requests: {}", self.total_ops);
        println!("Successful: {}", self.successful_ops);
        println!("Failed: {}", self.failed_ops);
        println!("Duration: {:?}", self.duration);
    }
}

/// Configuration for stress runs.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Requests per thread.
    pub operations: usize,
    /// Number of threads.
    pub threads: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 50,
            threads: 4,
        }
    }
}

fn run_threads<F>(config: &StressConfig, op: F) -> StressTestResult
where
    F: Fn(usize, usize) -> bool + Send + Sync + 'static,
{
    let op = Arc::new(op);
    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let start = Instant::now();

    let handles: Vec<_> = (0..config.threads)
        .map(|t| {
            let op = Arc::clone(&op);
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);
            let operations = config.operations;
            thread::spawn(move || {
                for i in 0..operations {
                    if op(t, i) {
                        successful.fetch_add(1, Ordering::Relaxed);
                    } else {
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

/// Every thread creates the same collection over and over.
///
/// All requests are identical, so every one should succeed.
pub fn stress_identical_creates(
    coordinator: Arc<Coordinator>,
    schema: &CollectionSchema,
    config: &StressConfig,
) -> StressTestResult {
    let request = create_request(schema);
    run_threads(config, move |_, _| {
        coordinator.create_collection(request.clone()).is_success()
    })
}

/// Every thread creates its own collections, `c_<thread>_<i>`.
pub fn stress_distinct_creates(
    coordinator: Arc<Coordinator>,
    config: &StressConfig,
) -> StressTestResult {
    run_threads(config, move |t, i| {
        let schema = CollectionSchema::new(format!("c_{t}_{i}"))
            .field(FieldSchema::new("id", DataType::Int64).primary_key(false));
        coordinator.create_collection(create_request(&schema)).is_success()
    })
}

/// Threads race to create one name with a definition that differs by
/// thread; exactly one definition may win.
pub fn stress_conflicting_creates(
    coordinator: Arc<Coordinator>,
    config: &StressConfig,
) -> StressTestResult {
    run_threads(config, move |t, _| {
        let mut request = create_request(
            &CollectionSchema::new("contested")
                .field(FieldSchema::new("id", DataType::Int64).primary_key(false)),
        );
        request.shards_num = i32::try_from(t + 1).unwrap_or(i32::MAX);
        coordinator.create_collection(request).is_success()
    })
}

/// Readers query a collection while writers create others.
pub fn stress_mixed_reads(coordinator: Arc<Coordinator>, config: &StressConfig) -> StressTestResult {
    run_threads(config, move |t, i| {
        if t % 2 == 0 {
            let schema = CollectionSchema::new(format!("m_{t}_{i}"))
                .field(FieldSchema::new("id", DataType::Int64).primary_key(false));
            coordinator.create_collection(create_request(&schema)).is_success()
        } else {
            coordinator.list_databases().status.is_success()
                && coordinator.show_collections("").status.is_success()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{memory_coordinator, schemas};

    fn coordinator() -> Arc<Coordinator> {
        Arc::new(memory_coordinator(1_000).1)
    }

    #[test]
    fn identical_creates_all_succeed() {
        let coordinator = coordinator();
        let config = StressConfig::default();
        let result = stress_identical_creates(coordinator.clone(), &schemas::films(), &config);
        assert_eq!(result.failed_ops, 0);
        assert_eq!(result.successful_ops, config.threads * config.operations);
        assert_eq!(coordinator.cache().collection_count(), 1);
    }

    #[test]
    fn distinct_creates_all_land() {
        let coordinator = coordinator();
        let config = StressConfig {
            operations: 25,
            threads: 4,
        };
        let result = stress_distinct_creates(coordinator.clone(), &config);
        assert_eq!(result.failed_ops, 0);
        assert_eq!(coordinator.cache().collection_count(), 100);
    }

    #[test]
    fn conflicting_creates_have_one_winner() {
        let coordinator = coordinator();
        let config = StressConfig {
            operations: 10,
            threads: 4,
        };
        let result = stress_conflicting_creates(coordinator.clone(), &config);

        let winner = coordinator
            .describe_collection("", "contested")
            .collection
            .unwrap();
        // The winning thread succeeds on every attempt; all others fail.
        assert_eq!(result.successful_ops, config.operations);
        assert_eq!(result.failed_ops, (config.threads - 1) * config.operations);
        assert!((1..=4).contains(&winner.shards_num));
    }

    #[test]
    fn mixed_reads_never_fail() {
        let coordinator = coordinator();
        let result = stress_mixed_reads(coordinator, &StressConfig::default());
        assert_eq!(result.failed_ops, 0);
    }
}
