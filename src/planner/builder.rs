//! Predicate builder
//!
//! Turns a search string and a `FilterSet` into a `Predicate`.
//!
//! Clause order is fixed (search, region, gender, category, payment
//! method, tags, age, date), so the same input always yields the same
//! predicate. Absent or empty dimensions contribute no clause.

use chrono::NaiveDate;

use crate::schema::TextColumn;

use super::ast::{Clause, Condition, Predicate};
use super::request::{AgeRange, DateRange, Dimension, FilterSet};

/// Builds predicates from validated filter input
pub struct PredicateBuilder;

impl PredicateBuilder {
    /// Builds the conjunction of every active clause.
    pub fn build(search: &str, filters: &FilterSet) -> Predicate {
        let mut predicate = Predicate::always();

        if let Some(clause) = Self::search_clause(search) {
            predicate = predicate.and(clause);
        }

        for dimension in Dimension::ALL {
            if let Some(clause) = Self::membership_clause(dimension, filters.values(dimension)) {
                predicate = predicate.and(clause);
            }
        }

        if let Some(clause) = Self::tag_clause(&filters.tags) {
            predicate = predicate.and(clause);
        }

        if let Some(clause) = Self::age_clause(&filters.age) {
            predicate = predicate.and(clause);
        }

        if let Some(clause) = Self::date_clause(&filters.date) {
            predicate = predicate.and(clause);
        }

        predicate
    }

    /// Name or phone number contains the search text
    fn search_clause(search: &str) -> Option<Clause> {
        if search.is_empty() {
            return None;
        }

        Some(Clause::any(vec![
            Condition::Contains {
                column: TextColumn::CustomerName,
                needle: search.to_string(),
            },
            Condition::Contains {
                column: TextColumn::PhoneNumber,
                needle: search.to_string(),
            },
        ]))
    }

    fn membership_clause(dimension: Dimension, values: &[String]) -> Option<Clause> {
        if values.is_empty() {
            return None;
        }

        Some(Clause::single(Condition::OneOf {
            column: dimension.column(),
            values: values.to_vec(),
        }))
    }

    /// Tag column contains any requested tag
    fn tag_clause(tags: &[String]) -> Option<Clause> {
        if tags.is_empty() {
            return None;
        }

        let conditions = tags
            .iter()
            .map(|tag| Condition::Contains {
                column: TextColumn::Tags,
                needle: tag.clone(),
            })
            .collect();

        Some(Clause::any(conditions))
    }

    fn age_clause(age: &AgeRange) -> Option<Clause> {
        if age.is_unbounded() {
            return None;
        }

        Some(Clause::single(Condition::AgeBetween {
            min: age.min,
            max: age.max,
        }))
    }

    /// The max day is included by bounding strictly below the following day.
    fn date_clause(date: &DateRange) -> Option<Clause> {
        if date.is_unbounded() {
            return None;
        }

        let before = date.max.and_then(Self::day_after);
        if date.min.is_none() && before.is_none() {
            // max is the last representable day, so nothing is excluded
            return None;
        }

        Some(Clause::single(Condition::DateWithin {
            from: date.min,
            before,
        }))
    }

    fn day_after(day: NaiveDate) -> Option<NaiveDate> {
        day.succ_opt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_no_filters_is_always() {
        let predicate = PredicateBuilder::build("", &FilterSet::new());
        assert!(predicate.is_always());
    }

    #[test]
    fn test_search_clause_covers_name_and_phone() {
        let predicate = PredicateBuilder::build("ann", &FilterSet::new());
        assert_eq!(predicate.clauses().len(), 1);

        let conditions = predicate.clauses()[0].conditions();
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[0].column_name(), "customerName");
        assert_eq!(conditions[1].column_name(), "phoneNumber");
    }

    #[test]
    fn test_membership_renames_columns() {
        let filters = FilterSet::new()
            .with_values(Dimension::Region, &["East", "West"])
            .with_values(Dimension::Category, &["Beauty"]);
        let predicate = PredicateBuilder::build("", &filters);

        assert_eq!(predicate.clauses().len(), 2);
        assert_eq!(
            predicate.clauses()[0].conditions()[0],
            Condition::OneOf {
                column: TextColumn::CustomerRegion,
                values: vec!["East".into(), "West".into()],
            }
        );
        assert_eq!(
            predicate.clauses()[1].conditions()[0].column_name(),
            "productCategory"
        );
    }

    #[test]
    fn test_tags_become_one_disjunction() {
        let filters = FilterSet::new().with_tags(&["organic", "gift"]);
        let predicate = PredicateBuilder::build("", &filters);

        assert_eq!(predicate.clauses().len(), 1);
        assert_eq!(predicate.clauses()[0].conditions().len(), 2);
    }

    #[test]
    fn test_age_bounds() {
        let predicate = PredicateBuilder::build("", &FilterSet::new().with_age(Some(20), None));
        assert_eq!(
            predicate.clauses()[0].conditions()[0],
            Condition::AgeBetween {
                min: Some(20),
                max: None
            }
        );
    }

    #[test]
    fn test_date_max_becomes_exclusive_next_day() {
        let filters = FilterSet::new().with_date(Some(day(2023, 1, 1)), Some(day(2023, 1, 31)));
        let predicate = PredicateBuilder::build("", &filters);

        assert_eq!(
            predicate.clauses()[0].conditions()[0],
            Condition::DateWithin {
                from: Some(day(2023, 1, 1)),
                before: Some(day(2023, 2, 1)),
            }
        );
    }

    #[test]
    fn test_date_max_at_end_of_calendar() {
        let filters = FilterSet::new().with_date(None, Some(NaiveDate::MAX));
        assert!(PredicateBuilder::build("", &filters).is_always());
    }

    #[test]
    fn test_clause_order_is_deterministic() {
        let filters = FilterSet::new()
            .with_date(Some(day(2023, 1, 1)), None)
            .with_age(Some(18), Some(60))
            .with_tags(&["eco"])
            .with_values(Dimension::PaymentMethod, &["UPI"])
            .with_values(Dimension::Gender, &["Female"]);

        let first = PredicateBuilder::build("raj", &filters);
        let second = PredicateBuilder::build("raj", &filters);
        assert_eq!(first, second);

        let columns: Vec<&str> = first
            .clauses()
            .iter()
            .map(|c| c.conditions()[0].column_name())
            .collect();
        assert_eq!(
            columns,
            vec!["customerName", "gender", "paymentMethod", "tags", "age", "date"]
        );
    }
}
