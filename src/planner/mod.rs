//! Query planning for sales queries
//!
//! Turns a validated `QueryRequest` into the two inputs the executor needs:
//!
//! - a `Predicate`, built by `PredicateBuilder` from the search string and
//!   the `FilterSet`
//! - an `OrderSpec`, resolved by `OrderingResolver` from the allow-listed
//!   sort key and a direction
//!
//! # Design Principles
//!
//! - Deterministic: the same request always yields the same predicate
//! - Storage-agnostic: the predicate is evaluated in memory or compiled to SQL
//! - Closed: column names come from fixed tables, never from the caller

mod ast;
mod builder;
mod errors;
mod ordering;
mod request;

pub use ast::{Clause, Condition, OrderSpec, Predicate, SortDirection, SortKey};
pub use builder::PredicateBuilder;
pub use errors::{PlannerError, PlannerErrorCode, PlannerResult};
pub use ordering::OrderingResolver;
pub use request::{AgeRange, DateRange, Dimension, FilterSet, QueryRequest};
