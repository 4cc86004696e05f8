//! Schema of the sales table
//!
//! - `SaleRecord`: the stored row shape
//! - `TextColumn` and the column constants: the only names storage
//!   backends may reference

pub mod columns;
mod record;

pub use columns::TextColumn;
pub use record::SaleRecord;
