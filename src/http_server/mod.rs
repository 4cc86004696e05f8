//! # Sales HTTP Server Module
//!
//! Axum server exposing the query engine.
//!
//! # Endpoints
//!
//! - `/` - Banner
//! - `/health` - Health check
//! - `/api/sales` - Paginated, filtered, sorted sales query with totals

pub mod config;
pub mod observability_routes;
pub mod sales_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use server::HttpServer;
