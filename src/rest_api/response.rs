//! # Response Formatting
//!
//! Response bodies of the sales REST API. Field names are camelCase and
//! monetary totals serialize as JSON numbers, matching the record shape.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::executor::QueryResult;
use crate::schema::SaleRecord;

/// Body of a successful `GET /api/sales`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesResponse {
    pub data: Vec<SaleRecord>,
    pub total_count: u64,
    pub current_page: u64,
    pub total_pages: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_final_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_discount: Decimal,
}

impl From<QueryResult> for SalesResponse {
    fn from(result: QueryResult) -> Self {
        Self {
            data: result.rows,
            total_count: result.total_count,
            current_page: result.current_page,
            total_pages: result.total_pages,
            total_final_amount: result.total_final_amount,
            total_discount: result.total_discount,
        }
    }
}

/// Body of `GET /`
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
