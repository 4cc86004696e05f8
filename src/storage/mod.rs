//! Row store boundary for the sales query engine
//!
//! The engine needs exactly two reads from a store:
//!
//! - a windowed read: matching rows in order, skipped and limited, plus
//!   the count of all matching rows
//! - an aggregate read: sums of `finalAmount` and `totalAmount` over all
//!   matching rows
//!
//! `MemoryStore` serves both in process. `PgStore` serves them from the
//! PostgreSQL `"Sales"` table using the statements `SqlCompiler` builds.

mod errors;
mod filters;
mod memory;
mod postgres;
mod sorter;
pub mod sql;

pub use errors::{StorageError, StorageErrorCode, StorageResult};
pub use filters::PredicateFilter;
pub use memory::{MemorySnapshot, MemoryStore};
pub use postgres::{PgSnapshot, PgStore, DEFAULT_MAX_CONNECTIONS};
pub use sorter::ResultSorter;
pub use sql::{CompiledQuery, SqlCompiler, SqlParam, SqlStatement};

use rust_decimal::Decimal;

use crate::planner::{OrderSpec, Predicate};
use crate::schema::SaleRecord;

/// Offset/limit window over an ordered match set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

impl Window {
    /// Window for a 1-based page. The offset saturates rather than overflow.
    pub fn for_page(page: u64, page_size: u64) -> Self {
        Self {
            offset: page.saturating_sub(1).saturating_mul(page_size),
            limit: page_size,
        }
    }
}

/// Rows of one window plus the size of the whole match set
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedRows {
    pub rows: Vec<SaleRecord>,
    pub total_count: u64,
}

/// Sums over the whole match set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub final_amount: Decimal,
    pub total_amount: Decimal,
}

/// Read operations a store must serve
pub trait StoreRead {
    /// Matching rows ordered by `order`, windowed, with the unwindowed count.
    fn fetch_window(
        &self,
        predicate: &Predicate,
        order: &OrderSpec,
        window: Window,
    ) -> StorageResult<WindowedRows>;

    /// Sums over every matching row.
    fn aggregate(&self, predicate: &Predicate) -> StorageResult<Totals>;
}

/// A shared store that can also pin a consistent view for several reads
pub trait SalesStore: StoreRead + Send + Sync {
    /// Returns a reader that observes one fixed state of the store.
    fn snapshot(&self) -> StorageResult<Box<dyn StoreRead + Send + '_>>;

    /// Number of stored records
    fn len(&self) -> StorageResult<usize>;

    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_for_page() {
        assert_eq!(
            Window::for_page(1, 10),
            Window {
                offset: 0,
                limit: 10
            }
        );
        assert_eq!(
            Window::for_page(3, 25),
            Window {
                offset: 50,
                limit: 25
            }
        );
    }

    #[test]
    fn test_window_offset_saturates() {
        let window = Window::for_page(u64::MAX, u64::MAX);
        assert_eq!(window.offset, u64::MAX);
    }
}
