//! Executor error types
//!
//! Error codes:
//! - SALES_STORAGE_FAILURE
//! - SALES_INVALID_WINDOW

use std::fmt;

use crate::storage::StorageError;

/// Executor-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorErrorCode {
    /// A store read failed
    SalesStorageFailure,
    /// Page or page size out of range
    SalesInvalidWindow,
}

impl ExecutorErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorErrorCode::SalesStorageFailure => "SALES_STORAGE_FAILURE",
            ExecutorErrorCode::SalesInvalidWindow => "SALES_INVALID_WINDOW",
        }
    }
}

impl fmt::Display for ExecutorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Executor error type with full context
#[derive(Debug)]
pub struct ExecutorError {
    code: ExecutorErrorCode,
    message: String,
    /// Store error that caused the failure
    source: Option<StorageError>,
}

impl ExecutorError {
    /// Wraps a failed store read. `stage` names the read that failed.
    pub fn storage_failure(stage: &str, source: StorageError) -> Self {
        Self {
            code: ExecutorErrorCode::SalesStorageFailure,
            message: format!("{} read failed", stage),
            source: Some(source),
        }
    }

    /// Create an invalid window error
    pub fn invalid_window(reason: impl Into<String>) -> Self {
        Self {
            code: ExecutorErrorCode::SalesInvalidWindow,
            message: reason.into(),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ExecutorErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the underlying store error, if any
    pub fn storage_error(&self) -> Option<&StorageError> {
        self.source.as_ref()
    }
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)?;
        if let Some(source) = &self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExecutorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;
