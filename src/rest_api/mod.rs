//! # Sales REST API Module
//!
//! Caller-facing request validation, response bodies and error mapping
//! for the sales endpoints. Routing lives in `http_server`.

pub mod errors;
pub mod params;
pub mod response;

pub use errors::{ErrorResponse, RestError, RestResult, INTERNAL_ERROR_MESSAGE};
pub use params::{SalesQueryParams, Scalar, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, DEFAULT_SORT};
pub use response::{MessageResponse, SalesResponse};
