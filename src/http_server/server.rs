//! # HTTP Server
//!
//! Main HTTP server combining the endpoint routers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::Method;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::engine::QueryEngine;
use crate::observability::Event;

use super::config::HttpServerConfig;
use super::observability_routes::health_routes;
use super::sales_routes::{sales_routes, SalesState};

/// HTTP server for the sales API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server serving `engine`
    pub fn new(engine: QueryEngine, config: HttpServerConfig) -> Self {
        let router = Self::build_router(engine, &config);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    pub fn build_router(engine: QueryEngine, config: &HttpServerConfig) -> Router {
        let sales_state = Arc::new(SalesState::new(engine));

        Router::new()
            // Banner and health check at root level
            .merge(health_routes())
            // Sales query under /api
            .nest("/api", sales_routes(sales_state))
            .layer(Self::cors_layer(config))
            .layer(TraceLayer::new_for_http())
    }

    fn cors_layer(config: &HttpServerConfig) -> CorsLayer {
        let origin = if config.cors_origins.is_empty() {
            AllowOrigin::from(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();
            AllowOrigin::list(origins)
        };

        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        info!(event = %Event::Serving, %addr, "sales API listening");

        axum::serve(listener, self.router).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::storage::MemoryStore;

    fn engine() -> QueryEngine {
        QueryEngine::new(Arc::new(MemoryStore::empty()), EngineConfig::default())
    }

    #[test]
    fn test_server_with_custom_port() {
        let server = HttpServer::new(engine(), HttpServerConfig::with_port(8080));
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_router_builds_with_origin_list() {
        let config = HttpServerConfig {
            cors_origins: vec!["http://localhost:5173".to_string()],
            ..Default::default()
        };
        let _router = HttpServer::new(engine(), config).router();
    }
}
