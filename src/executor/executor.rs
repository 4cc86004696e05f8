//! Paginated fetch and aggregation
//!
//! Runs one predicate through a store twice and reconciles the reads.
//!
//! Execution flow (strict order):
//! 1. Validate the page window
//! 2. Pin a snapshot, if snapshot reads are enabled
//! 3. Windowed read: ordered page rows plus the full match count
//! 4. Aggregate read: amount sums over the full match set
//! 5. Derive discount and page count
//!
//! Either read failing fails the whole execution. No partial result is
//! ever returned.

use tracing::debug;

use crate::planner::{OrderSpec, Predicate};
use crate::storage::{SalesStore, StorageError, StoreRead, Window};

use super::errors::{ExecutorError, ExecutorResult};
use super::result::{page_count, QueryResult};

/// Executes predicates against a sales store
pub struct QueryExecutor<'a, S: SalesStore + ?Sized> {
    store: &'a S,
    snapshot_reads: bool,
}

impl<'a, S: SalesStore + ?Sized> QueryExecutor<'a, S> {
    /// Creates an executor issuing both reads directly against the store
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            snapshot_reads: false,
        }
    }

    /// Issues both reads against a single store snapshot when enabled
    pub fn with_snapshot_reads(mut self, enabled: bool) -> Self {
        self.snapshot_reads = enabled;
        self
    }

    /// Executes one paginated query.
    ///
    /// `page` is 1-based. Both `page` and `page_size` must be positive.
    pub fn execute(
        &self,
        predicate: &Predicate,
        order: &OrderSpec,
        page: u64,
        page_size: u64,
    ) -> ExecutorResult<QueryResult> {
        if page == 0 {
            return Err(ExecutorError::invalid_window("page must be at least 1"));
        }
        if page_size == 0 {
            return Err(ExecutorError::invalid_window("page size must be at least 1"));
        }

        let window = Window::for_page(page, page_size);

        if self.snapshot_reads {
            let snapshot = self
                .store
                .snapshot()
                .map_err(|e| ExecutorError::storage_failure("snapshot", e))?;
            Self::run(&*snapshot, predicate, order, window, page, page_size)
        } else {
            Self::run(self.store, predicate, order, window, page, page_size)
        }
    }

    fn run<R: StoreRead + ?Sized>(
        reader: &R,
        predicate: &Predicate,
        order: &OrderSpec,
        window: Window,
        page: u64,
        page_size: u64,
    ) -> ExecutorResult<QueryResult> {
        let windowed = reader
            .fetch_window(predicate, order, window)
            .map_err(|e| ExecutorError::storage_failure("windowed", e))?;

        let totals = reader
            .aggregate(predicate)
            .map_err(|e| ExecutorError::storage_failure("aggregate", e))?;

        let total_discount = totals
            .total_amount
            .checked_sub(totals.final_amount)
            .ok_or_else(|| {
                ExecutorError::storage_failure(
                    "aggregate",
                    StorageError::read_failed("Discount total overflowed"),
                )
            })?;

        debug!(
            rows = windowed.rows.len(),
            total_count = windowed.total_count,
            offset = window.offset,
            "query executed"
        );

        Ok(QueryResult {
            rows: windowed.rows,
            total_count: windowed.total_count,
            total_final_amount: totals.final_amount,
            total_discount,
            current_page: page,
            total_pages: page_count(windowed.total_count, page_size),
        })
    }
}
