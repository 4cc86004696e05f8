//! Sales record shape
//!
//! One row of the `Sales` table. Records are written by an external load
//! and are read-only to the query engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single sales transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    /// Surrogate row id
    pub id: i64,
    /// Unique transaction identifier
    pub transaction_id: String,
    /// Calendar day of the sale
    pub date: NaiveDate,

    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub order_status: Option<String>,
    #[serde(default)]
    pub delivery_type: Option<String>,
    #[serde(default)]
    pub store_id: Option<String>,
    #[serde(default)]
    pub store_location: Option<String>,
    #[serde(default)]
    pub salesperson_id: Option<String>,
    #[serde(default)]
    pub employee_name: Option<String>,

    pub customer_id: String,
    pub customer_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub customer_region: Option<String>,
    #[serde(default)]
    pub customer_type: Option<String>,

    pub product_id: String,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub product_category: Option<String>,
    /// Comma-joined tag list, matched by substring
    #[serde(default)]
    pub tags: Option<String>,

    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_per_unit: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub discount_percentage: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_amount: Decimal,
}

impl SaleRecord {
    /// Creates a record with the required identifiers and zeroed amounts.
    ///
    /// Optional attributes start as `None`; use the `with_*` setters to fill
    /// in the fields a caller cares about.
    pub fn new(id: i64, transaction_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id,
            transaction_id: transaction_id.into(),
            date,
            payment_method: None,
            order_status: None,
            delivery_type: None,
            store_id: None,
            store_location: None,
            salesperson_id: None,
            employee_name: None,
            customer_id: format!("CUST-{}", id),
            customer_name: String::new(),
            phone_number: None,
            gender: None,
            age: None,
            customer_region: None,
            customer_type: None,
            product_id: format!("PROD-{}", id),
            product_name: None,
            brand: None,
            product_category: None,
            tags: None,
            quantity: 1,
            price_per_unit: Decimal::ZERO,
            discount_percentage: None,
            total_amount: Decimal::ZERO,
            final_amount: Decimal::ZERO,
        }
    }

    /// Sets customer name and phone number
    pub fn with_customer(mut self, name: impl Into<String>, phone: impl Into<String>) -> Self {
        self.customer_name = name.into();
        self.phone_number = Some(phone.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.customer_region = Some(region.into());
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.product_category = Some(category.into());
        self
    }

    pub fn with_payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = Some(method.into());
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    pub fn with_age(mut self, age: i64) -> Self {
        self.age = Some(age);
        self
    }

    /// Sets total and final amount; price per unit follows total / quantity.
    pub fn with_amounts(mut self, total_amount: Decimal, final_amount: Decimal) -> Self {
        self.total_amount = total_amount;
        self.final_amount = final_amount;
        self.price_per_unit = if self.quantity > 0 {
            total_amount / Decimal::from(self.quantity)
        } else {
            total_amount
        };
        self
    }
}
