//! # REST API Errors
//!
//! Error types for the sales REST API. Client errors map to 400 with a
//! stable code; storage failures map to 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::engine::EngineError;
use crate::planner::PlannerError;

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

/// Message returned for every storage failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error while processing sales query.";

/// REST API errors
#[derive(Debug, Clone, Error)]
pub enum RestError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Page or page size missing a positive integer
    #[error("Invalid pagination parameters. Page and pageSize must be positive integers.")]
    InvalidPagination,

    /// Page size above the configured maximum
    #[error("pageSize {0} exceeds the maximum of {1}")]
    PageSizeExceeded(u64, u64),

    /// Non-numeric age bound
    #[error("Invalid age range. Age values must be numeric.")]
    InvalidAge,

    /// ageMin above ageMax
    #[error("Invalid age range: Minimum age cannot be greater than maximum age.")]
    InvalidAgeRange,

    /// Date bound not in YYYY-MM-DD form
    #[error("Invalid date for {0}. Dates must be formatted YYYY-MM-DD.")]
    InvalidDate(String),

    /// dateMin after dateMax
    #[error("Invalid date range: Start date cannot be after end date.")]
    InvalidDateRange,

    /// Parameter of the wrong shape
    #[error("Invalid query parameter: {0}")]
    InvalidQueryParam(String),

    /// Rejected while planning
    #[error("{}", .0.message())]
    Rejected(PlannerError),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Store failure while serving the query
    #[error("Internal Server Error while processing sales query.")]
    Internal(String),
}

impl RestError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            RestError::InvalidPagination | RestError::PageSizeExceeded(_, _) => {
                "SALES_INVALID_PAGINATION"
            }
            RestError::InvalidAge | RestError::InvalidAgeRange => "SALES_INVALID_AGE_RANGE",
            RestError::InvalidDate(_) | RestError::InvalidDateRange => "SALES_INVALID_DATE_RANGE",
            RestError::InvalidQueryParam(_) => "SALES_QUERY_INVALID",
            RestError::Rejected(e) => e.code().code(),
            RestError::Internal(_) => "SALES_STORAGE_FAILURE",
        }
    }

    /// Extra context, only for server errors
    pub fn details(&self) -> Option<&str> {
        match self {
            RestError::Internal(details) => Some(details),
            _ => None,
        }
    }
}

impl From<PlannerError> for RestError {
    fn from(err: PlannerError) -> Self {
        RestError::Rejected(err)
    }
}

impl From<EngineError> for RestError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Rejected(e) => RestError::Rejected(e),
            EngineError::Failed(e) => RestError::Internal(e.to_string()),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<RestError> for ErrorResponse {
    fn from(err: RestError) -> Self {
        Self {
            error: err.to_string(),
            code: err.code(),
            details: err.details().map(str::to_string),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ExecutorError;
    use crate::storage::StorageError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            RestError::InvalidPagination.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RestError::InvalidDate("dateMin".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RestError::Internal("test".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_engine_error_mapping() {
        let rejected: RestError = EngineError::from(PlannerError::unknown_sort_key("age")).into();
        assert_eq!(rejected.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(rejected.code(), "SALES_UNKNOWN_SORT_KEY");

        let failed: RestError = EngineError::from(ExecutorError::storage_failure(
            "aggregate",
            StorageError::unavailable("down"),
        ))
        .into();
        assert_eq!(failed.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(failed.to_string(), INTERNAL_ERROR_MESSAGE);
        assert!(failed.details().unwrap().contains("down"));
    }

    #[test]
    fn test_error_body() {
        let body = ErrorResponse::from(RestError::InvalidAgeRange);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], "SALES_INVALID_AGE_RANGE");
        assert!(json.get("details").is_none());
    }
}
