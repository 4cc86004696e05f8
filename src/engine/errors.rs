//! Engine error type
//!
//! Splits failures into the two outcomes a caller must tell apart: the
//! request was rejected, or the store failed while serving it.

use thiserror::Error;

use crate::executor::ExecutorError;
use crate::planner::PlannerError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The request cannot be planned
    #[error("{0}")]
    Rejected(#[from] PlannerError),

    /// A store read failed during execution
    #[error("{0}")]
    Failed(#[from] ExecutorError),
}

impl EngineError {
    /// Stable error code of the underlying error
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Rejected(e) => e.code().code(),
            EngineError::Failed(e) => e.code().code(),
        }
    }

    /// Returns true if the caller sent a request that can never succeed
    pub fn is_rejection(&self) -> bool {
        matches!(self, EngineError::Rejected(_))
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
