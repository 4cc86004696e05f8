//! Fixed column table for the `Sales` relation
//!
//! Every column the query engine can filter or sort on is enumerated here.
//! Storage backends resolve names only through this table, so no caller
//! supplied string ever becomes a field reference.

use super::record::SaleRecord;

/// Table name as stored
pub const TABLE: &str = "Sales";

/// Stored column name of the age attribute
pub const AGE: &str = "age";

/// Stored column name of the sale date
pub const DATE: &str = "date";

/// Stored column name of the discounted amount
pub const FINAL_AMOUNT: &str = "finalAmount";

/// Stored column name of the undiscounted amount
pub const TOTAL_AMOUNT: &str = "totalAmount";

/// Text columns usable in equality and substring conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextColumn {
    CustomerName,
    PhoneNumber,
    CustomerRegion,
    Gender,
    ProductCategory,
    PaymentMethod,
    Tags,
}

impl TextColumn {
    /// Stored column name
    pub fn name(&self) -> &'static str {
        match self {
            TextColumn::CustomerName => "customerName",
            TextColumn::PhoneNumber => "phoneNumber",
            TextColumn::CustomerRegion => "customerRegion",
            TextColumn::Gender => "gender",
            TextColumn::ProductCategory => "productCategory",
            TextColumn::PaymentMethod => "paymentMethod",
            TextColumn::Tags => "tags",
        }
    }

    /// Reads the column from a record. Null columns yield `None`.
    pub fn read<'a>(&self, record: &'a SaleRecord) -> Option<&'a str> {
        match self {
            TextColumn::CustomerName => Some(record.customer_name.as_str()),
            TextColumn::PhoneNumber => record.phone_number.as_deref(),
            TextColumn::CustomerRegion => record.customer_region.as_deref(),
            TextColumn::Gender => record.gender.as_deref(),
            TextColumn::ProductCategory => record.product_category.as_deref(),
            TextColumn::PaymentMethod => record.payment_method.as_deref(),
            TextColumn::Tags => record.tags.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_column_names_are_stored_names() {
        assert_eq!(TextColumn::CustomerRegion.name(), "customerRegion");
        assert_eq!(TextColumn::ProductCategory.name(), "productCategory");
        assert_eq!(TextColumn::PaymentMethod.name(), "paymentMethod");
    }

    #[test]
    fn test_read_null_column() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let record = SaleRecord::new(1, "T-1", date).with_region("North");

        assert_eq!(TextColumn::CustomerRegion.read(&record), Some("North"));
        assert_eq!(TextColumn::Gender.read(&record), None);
        assert_eq!(TextColumn::CustomerName.read(&record), Some(""));
    }
}
