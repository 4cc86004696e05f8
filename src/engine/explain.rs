//! Explain plan output
//!
//! Produces deterministic, human-readable explain output for a query
//! request: the predicate clauses, the resolved ordering, the page window
//! and the SQL a PostgreSQL-backed store would run.

use std::fmt;

use crate::planner::{
    OrderSpec, OrderingResolver, Predicate, PlannerError, PredicateBuilder, QueryRequest,
};
use crate::storage::{CompiledQuery, SqlCompiler, Window};

/// Explain plan output
#[derive(Debug)]
pub struct ExplainPlan {
    /// Whether planning succeeded
    pub accepted: bool,
    /// Rendered clauses, in evaluation order
    pub clauses: Vec<String>,
    /// Resolved ordering
    pub order: Option<String>,
    pub window: Option<Window>,
    /// Compiled statements
    pub sql: Option<CompiledQuery>,
    /// Rejection reason (if rejected)
    pub rejection_reason: Option<String>,
    /// Rejection error code (if rejected)
    pub rejection_code: Option<String>,
}

impl ExplainPlan {
    /// Plans `request` and explains the outcome. Never fails: a rejected
    /// request yields a REJECTED plan.
    pub fn for_request(request: &QueryRequest) -> Self {
        let predicate = PredicateBuilder::build(&request.search, &request.filters);

        match OrderingResolver::resolve(&request.sort_key, request.sort_direction.as_deref()) {
            Ok(order) => Self::from_plan(
                &predicate,
                &order,
                Window::for_page(request.page, request.page_size),
            ),
            Err(err) => Self::from_error(&err),
        }
    }

    /// Creates an explain plan from a built predicate and ordering
    pub fn from_plan(predicate: &Predicate, order: &OrderSpec, window: Window) -> Self {
        Self {
            accepted: true,
            clauses: predicate.clauses().iter().map(|c| c.to_string()).collect(),
            order: Some(order.to_string()),
            window: Some(window),
            sql: Some(SqlCompiler::compile(predicate, order, window)),
            rejection_reason: None,
            rejection_code: None,
        }
    }

    /// Creates an explain plan from a planning error
    pub fn from_error(err: &PlannerError) -> Self {
        Self {
            accepted: false,
            clauses: Vec::new(),
            order: None,
            window: None,
            sql: None,
            rejection_reason: Some(err.message().to_string()),
            rejection_code: Some(err.code().code().to_string()),
        }
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PLAN ===")?;

        if self.accepted {
            writeln!(f, "Status: ACCEPTED")?;
            if self.clauses.is_empty() {
                writeln!(f, "Predicate: all records")?;
            } else {
                writeln!(f, "Predicate (all of):")?;
                for clause in &self.clauses {
                    writeln!(f, "  - {}", clause)?;
                }
            }
            if let Some(order) = &self.order {
                writeln!(f, "Order: {}", order)?;
            }
            if let Some(window) = &self.window {
                writeln!(f, "Window: offset {} limit {}", window.offset, window.limit)?;
            }
            if let Some(sql) = &self.sql {
                writeln!(f, "Page SQL:")?;
                write!(f, "  {}", sql.page)?;
                writeln!(f, "Count SQL:")?;
                write!(f, "  {}", sql.count)?;
                writeln!(f, "Totals SQL:")?;
                write!(f, "  {}", sql.totals)?;
            }
        } else {
            writeln!(f, "Status: REJECTED")?;
            if let Some(code) = &self.rejection_code {
                writeln!(f, "Error Code: {}", code)?;
            }
            if let Some(reason) = &self.rejection_reason {
                writeln!(f, "Reason: {}", reason)?;
            }
        }

        Ok(())
    }
}
