//! Result types for query execution

use rust_decimal::Decimal;

use crate::schema::SaleRecord;

/// One page of matching records plus totals over the whole match set
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Records of the requested page, in order
    pub rows: Vec<SaleRecord>,
    /// Number of matching records across all pages
    pub total_count: u64,
    /// Sum of `finalAmount` over all matching records
    pub total_final_amount: Decimal,
    /// Sum of `totalAmount - finalAmount` over all matching records
    pub total_discount: Decimal,
    /// 1-based page that was requested
    pub current_page: u64,
    pub total_pages: u64,
}

impl QueryResult {
    /// Returns true if the page holds no records
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of records on the page
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Number of pages needed for `total_count` records. No records means no pages.
pub fn page_count(total_count: u64, page_size: u64) -> u64 {
    if total_count == 0 || page_size == 0 {
        return 0;
    }
    total_count.div_ceil(page_size)
}
