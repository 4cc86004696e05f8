//! Paginated fetch and aggregation for sales queries
//!
//! The executor consumes a built predicate and a resolved ordering and
//! produces one `QueryResult`: a page of rows plus totals computed over the
//! entire match set.
//!
//! # Execution Flow (strict order)
//!
//! 1. Compute the offset window for the requested page
//! 2. Windowed read (rows + total count)
//! 3. Aggregate read over the same predicate, unwindowed
//! 4. Combine into the result
//!
//! # Invariants
//!
//! - Totals never depend on page number or page size
//! - A failed read fails the whole query
//! - No matches means zero pages

mod errors;
mod executor;
mod result;

pub use errors::{ExecutorError, ExecutorErrorCode, ExecutorResult};
pub use executor::QueryExecutor;
pub use result::{page_count, QueryResult};
