//! salesquery - filtered, sorted and paginated queries over sales transactions
//!
//! A request flows through three stages:
//! - `planner`: free-text search and filters become a `Predicate`, the sort
//!   parameter becomes an `OrderSpec`
//! - `executor`: one windowed read for the page, one aggregate read for
//!   the totals
//! - `rest_api` / `http_server` / `cli`: the outer surfaces

pub mod cli;
pub mod engine;
pub mod executor;
pub mod http_server;
pub mod observability;
pub mod planner;
pub mod rest_api;
pub mod schema;
pub mod storage;
