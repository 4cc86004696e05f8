//! Planner error types
//!
//! Error codes:
//! - SALES_QUERY_INVALID
//! - SALES_UNKNOWN_SORT_KEY
//!
//! Every planner error rejects the request; none is retried.

use std::fmt;

/// Planner-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerErrorCode {
    /// Malformed query structure
    SalesQueryInvalid,
    /// Sort key outside the allow-list
    SalesUnknownSortKey,
}

impl PlannerErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            PlannerErrorCode::SalesQueryInvalid => "SALES_QUERY_INVALID",
            PlannerErrorCode::SalesUnknownSortKey => "SALES_UNKNOWN_SORT_KEY",
        }
    }
}

impl fmt::Display for PlannerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Planner error type with full context
#[derive(Debug, Clone)]
pub struct PlannerError {
    code: PlannerErrorCode,
    message: String,
    /// Offending field or key, if any
    field: Option<String>,
}

impl PlannerError {
    /// Create a query invalid error
    pub fn query_invalid(reason: impl Into<String>) -> Self {
        Self {
            code: PlannerErrorCode::SalesQueryInvalid,
            message: reason.into(),
            field: None,
        }
    }

    /// Create an unknown sort key error
    pub fn unknown_sort_key(key: impl Into<String>) -> Self {
        let k = key.into();
        Self {
            code: PlannerErrorCode::SalesUnknownSortKey,
            message: format!(
                "Sort key '{}' is not one of customerName, finalAmount, date",
                k
            ),
            field: Some(k),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> PlannerErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the field name if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)?;
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for PlannerError {}

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            PlannerErrorCode::SalesQueryInvalid.code(),
            "SALES_QUERY_INVALID"
        );
        assert_eq!(
            PlannerErrorCode::SalesUnknownSortKey.code(),
            "SALES_UNKNOWN_SORT_KEY"
        );
    }

    #[test]
    fn test_unknown_sort_key_display() {
        let err = PlannerError::unknown_sort_key("age");
        assert_eq!(err.field(), Some("age"));

        let display = err.to_string();
        assert!(display.starts_with("SALES_UNKNOWN_SORT_KEY: "));
        assert!(display.contains("age"));
    }
}
