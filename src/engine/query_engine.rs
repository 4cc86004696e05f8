//! Query engine facade
//!
//! Wires the three steps of a sales query together: build the predicate,
//! resolve the ordering, execute against the store. Each run gets its own
//! tracing span keyed by a fresh query id.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::executor::{QueryExecutor, QueryResult};
use crate::observability::Event;
use crate::planner::{OrderingResolver, PlannerError, PredicateBuilder, QueryRequest};
use crate::storage::SalesStore;

use super::config::EngineConfig;
use super::errors::{EngineError, EngineResult};

/// Shared entry point for running sales queries
#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<dyn SalesStore>,
    config: EngineConfig,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn SalesStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn SalesStore {
        self.store.as_ref()
    }

    /// Runs one query request end to end.
    pub fn run(&self, request: &QueryRequest) -> EngineResult<QueryResult> {
        let query_id = Uuid::new_v4();
        let span = info_span!("query", %query_id);
        let _guard = span.enter();

        info!(
            event = %Event::QueryReceived,
            page = request.page,
            page_size = request.page_size,
            search_len = request.search.chars().count(),
            sort = %request.sort_key,
            "query received"
        );

        if request.page_size > self.config.max_page_size {
            let err = PlannerError::query_invalid(format!(
                "pageSize {} exceeds the maximum of {}",
                request.page_size, self.config.max_page_size
            ));
            warn!(event = %Event::QueryRejected, code = err.code().code(), "{}", err.message());
            return Err(err.into());
        }

        let predicate = PredicateBuilder::build(&request.search, &request.filters);
        let order = OrderingResolver::resolve(&request.sort_key, request.sort_direction.as_deref())
            .map_err(|err| {
                warn!(event = %Event::QueryRejected, code = err.code().code(), "{}", err.message());
                EngineError::from(err)
            })?;

        debug!(
            event = %Event::QueryPlanned,
            clauses = predicate.clauses().len(),
            order = %order,
            "query planned"
        );

        let result = QueryExecutor::new(self.store.as_ref())
            .with_snapshot_reads(self.config.snapshot_reads)
            .execute(&predicate, &order, request.page, request.page_size)
            .map_err(|err| {
                error!(event = %Event::QueryFailed, code = err.code().code(), "{}", err);
                EngineError::from(err)
            })?;

        if result.total_count == 0 && request.has_criteria() {
            info!(event = %Event::QueryEmpty, "No results found for current criteria");
        }

        info!(
            event = %Event::QueryExecuted,
            rows = result.rows.len(),
            total_count = result.total_count,
            total_pages = result.total_pages,
            "query executed"
        );

        Ok(result)
    }
}

impl fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
