//! Sales HTTP Routes
//!
//! `GET /api/sales`: validates the query string, runs the query on the
//! blocking pool and returns the page with its totals. Repeated keys in
//! the query string are read as lists.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use tracing::warn;

use crate::engine::QueryEngine;
use crate::observability::Event;
use crate::rest_api::{RestError, RestResult, SalesQueryParams, SalesResponse};

// ==================
// Shared State
// ==================

/// Sales state shared across handlers
pub struct SalesState {
    pub engine: QueryEngine,
}

impl SalesState {
    pub fn new(engine: QueryEngine) -> Self {
        Self { engine }
    }
}

/// Create sales routes, mounted under `/api`
pub fn sales_routes(state: Arc<SalesState>) -> Router {
    Router::new()
        .route("/sales", get(get_sales_handler))
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn get_sales_handler(
    State(state): State<Arc<SalesState>>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> RestResult<Json<SalesResponse>> {
    let Query(pairs) = pairs.map_err(|e| reject(RestError::InvalidQueryParam(e.body_text())))?;
    let params = SalesQueryParams::from_pairs(pairs).map_err(reject)?;

    let request = params
        .validate(state.engine.config().max_page_size)
        .map_err(reject)?;

    let engine = state.engine.clone();
    let result = tokio::task::spawn_blocking(move || engine.run(&request))
        .await
        .map_err(|e| RestError::Internal(format!("query task failed: {}", e)))??;

    Ok(Json(SalesResponse::from(result)))
}

fn reject(err: RestError) -> RestError {
    warn!(event = %Event::QueryRejected, code = err.code(), "{}", err);
    err
}
