//! Identifier allocation.
//!
//! Identifiers are strictly increasing for the lifetime of an allocator and
//! seeded from a clock, so a restarted process keeps issuing larger values
//! than the previous one as long as the clock does not jump backwards across
//! the restart. [`IdAllocator::advance_past`] closes that gap from
//! persisted state.

use crate::error::{CoreError, CoreResult};
use crate::types::UniqueId;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Issues unique identifiers, singly or in contiguous blocks.
pub trait IdAllocator: Send + Sync {
    /// Allocates one identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::IdExhausted`] when no identifier is left.
    fn alloc_one(&self) -> CoreResult<UniqueId> {
        self.alloc(1).map(|(start, _)| start)
    }

    /// Allocates the half-open range `[start, end)` with `end - start == count`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::IdExhausted`] when the range does not fit and
    /// [`CoreError::InvalidArgument`] when `count` is zero.
    fn alloc(&self, count: u32) -> CoreResult<(UniqueId, UniqueId)>;

    /// Ensures every future identifier is greater than `id`.
    fn advance_past(&self, id: UniqueId);
}

/// Source of the lower bound for new identifiers.
pub trait TimestampOracle: Send + Sync {
    /// Current reading. Need not be monotonic.
    fn now(&self) -> UniqueId;
}

/// Wall clock in nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimestampOracle for SystemClock {
    fn now(&self) -> UniqueId {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .and_then(|d| UniqueId::try_from(d.as_nanos()).ok())
            .unwrap_or(0)
    }
}

/// A clock that always reads the same value.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub UniqueId);

impl TimestampOracle for FixedClock {
    fn now(&self) -> UniqueId {
        self.0
    }
}

/// In-process allocator: `start = max(last_end, clock)` under a CAS loop.
pub struct LocalIdAllocator {
    last_end: AtomicI64,
    clock: Box<dyn TimestampOracle>,
}

impl LocalIdAllocator {
    /// Creates an allocator seeded from the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Creates an allocator reading the given clock.
    pub fn with_clock(clock: impl TimestampOracle + 'static) -> Self {
        Self {
            last_end: AtomicI64::new(0),
            clock: Box::new(clock),
        }
    }

    /// Creates an allocator counting up from `start`.
    #[must_use]
    pub fn sequential(start: UniqueId) -> Self {
        Self::with_clock(FixedClock(start))
    }
}

impl Default for LocalIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LocalIdAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalIdAllocator")
            .field("last_end", &self.last_end.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

impl IdAllocator for LocalIdAllocator {
    fn alloc(&self, count: u32) -> CoreResult<(UniqueId, UniqueId)> {
        if count == 0 {
            return Err(CoreError::invalid_argument(
                "cannot allocate an empty identifier range",
            ));
        }
        let mut last = self.last_end.load(Ordering::Acquire);
        loop {
            let start = last.max(self.clock.now());
            let end = start
                .checked_add(UniqueId::from(count))
                .ok_or(CoreError::IdExhausted)?;
            match self
                .last_end
                .compare_exchange_weak(last, end, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return Ok((start, end)),
                Err(current) => last = current,
            }
        }
    }

    fn advance_past(&self, id: UniqueId) {
        self.last_end
            .fetch_max(id.saturating_add(1), Ordering::AcqRel);
    }
}
