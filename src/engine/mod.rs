//! Query engine for salesquery
//!
//! `QueryEngine` is what the transports call. It owns the store handle and
//! the engine settings and runs one `QueryRequest` at a time per call;
//! concurrent calls share nothing but the store.
//!
//! `ExplainPlan` describes what a request would run, including the SQL,
//! without touching any store.

mod config;
mod errors;
mod explain;
mod query_engine;

pub use config::EngineConfig;
pub use errors::{EngineError, EngineResult};
pub use explain::ExplainPlan;
pub use query_engine::QueryEngine;
