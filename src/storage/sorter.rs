//! Result sorting for in-process stores
//!
//! Single-key, stable: records with equal keys keep their input order, in
//! either direction.

use std::cmp::Ordering;

use crate::planner::{OrderSpec, SortDirection, SortKey};
use crate::schema::SaleRecord;

/// Sorts records by an `OrderSpec`
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts record references in place, leaving the records untouched.
    pub fn sort(records: &mut [&SaleRecord], order: &OrderSpec) {
        records.sort_by(|a, b| {
            let ordering = Self::compare(a, b, order.key);

            match order.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    fn compare(a: &SaleRecord, b: &SaleRecord, key: SortKey) -> Ordering {
        match key {
            SortKey::CustomerName => a.customer_name.cmp(&b.customer_name),
            SortKey::FinalAmount => a.final_amount.cmp(&b.final_amount),
            SortKey::Date => a.date.cmp(&b.date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn make(id: i64, name: &str, amount: i64, day: u32) -> SaleRecord {
        let date = NaiveDate::from_ymd_opt(2023, 5, day).unwrap();
        SaleRecord::new(id, format!("T-{}", id), date)
            .with_customer(name, "000")
            .with_amounts(Decimal::from(amount), Decimal::from(amount))
    }

    fn sorted(records: &[SaleRecord], order: OrderSpec) -> Vec<i64> {
        let mut refs: Vec<&SaleRecord> = records.iter().collect();
        ResultSorter::sort(&mut refs, &order);
        refs.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_sort_by_amount_descending() {
        let records = vec![make(1, "a", 50, 1), make(2, "b", 200, 2), make(3, "c", 100, 3)];
        assert_eq!(
            sorted(&records, OrderSpec::desc(SortKey::FinalAmount)),
            vec![2, 3, 1]
        );
    }

    #[test]
    fn test_sort_by_date_ascending() {
        let records = vec![make(1, "a", 1, 9), make(2, "b", 1, 3), make(3, "c", 1, 5)];
        assert_eq!(sorted(&records, OrderSpec::asc(SortKey::Date)), vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_by_name() {
        let records = vec![
            make(1, "Charu", 1, 1),
            make(2, "Aarav", 1, 1),
            make(3, "Bina", 1, 1),
        ];
        assert_eq!(
            sorted(&records, OrderSpec::asc(SortKey::CustomerName)),
            vec![2, 3, 1]
        );
    }

    #[test]
    fn test_ties_keep_input_order_both_directions() {
        let records = vec![make(1, "a", 10, 1), make(2, "b", 10, 1), make(3, "c", 10, 1)];
        assert_eq!(
            sorted(&records, OrderSpec::asc(SortKey::FinalAmount)),
            vec![1, 2, 3]
        );
        assert_eq!(
            sorted(&records, OrderSpec::desc(SortKey::FinalAmount)),
            vec![1, 2, 3]
        );
    }
}
