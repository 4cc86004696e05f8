//! Storage error types
//!
//! Error codes:
//! - SALES_STORAGE_IO_ERROR: dataset could not be read
//! - SALES_STORAGE_INVALID_DATASET: dataset parsed but violates the record invariants
//! - SALES_STORAGE_READ_FAILED: a query read could not be served
//! - SALES_STORAGE_UNAVAILABLE: the store is not reachable

use std::error::Error as StdError;
use std::fmt;
use std::io;

/// Storage-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Disk I/O failure
    SalesStorageIoError,
    /// Dataset contents rejected
    SalesStorageInvalidDataset,
    /// Query read failed
    SalesStorageReadFailed,
    /// Store not reachable
    SalesStorageUnavailable,
}

impl StorageErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::SalesStorageIoError => "SALES_STORAGE_IO_ERROR",
            StorageErrorCode::SalesStorageInvalidDataset => "SALES_STORAGE_INVALID_DATASET",
            StorageErrorCode::SalesStorageReadFailed => "SALES_STORAGE_READ_FAILED",
            StorageErrorCode::SalesStorageUnavailable => "SALES_STORAGE_UNAVAILABLE",
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Storage error type with context
#[derive(Debug)]
pub struct StorageError {
    code: StorageErrorCode,
    message: String,
    /// Optional details about the error context
    details: Option<String>,
    /// Underlying I/O or database error if applicable
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl StorageError {
    /// Create a new storage I/O error
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::SalesStorageIoError,
            message: message.into(),
            details: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a read failed error caused by the database
    pub fn query_failed(message: impl Into<String>, source: sqlx::Error) -> Self {
        Self {
            code: StorageErrorCode::SalesStorageReadFailed,
            message: message.into(),
            details: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create an unavailable error caused by the database connection
    pub fn connect_failed(message: impl Into<String>, source: sqlx::Error) -> Self {
        Self {
            code: StorageErrorCode::SalesStorageUnavailable,
            message: message.into(),
            details: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid dataset error
    pub fn invalid_dataset(message: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::SalesStorageInvalidDataset,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Create an invalid dataset error naming the offending transaction
    pub fn duplicate_transaction(transaction_id: &str) -> Self {
        Self {
            code: StorageErrorCode::SalesStorageInvalidDataset,
            message: "Duplicate transaction id".into(),
            details: Some(format!("transaction_id: {}", transaction_id)),
            source: None,
        }
    }

    /// Create a read failed error
    pub fn read_failed(message: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::SalesStorageReadFailed,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::SalesStorageUnavailable,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StorageErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl StdError for StorageError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
