//! Predicate evaluation for in-process stores
//!
//! Evaluates a `Predicate` against a `SaleRecord`. Null columns never
//! match. Substring tests fold case on both sides.

use crate::planner::{Condition, Predicate};
use crate::schema::SaleRecord;

/// Evaluates predicates against records
pub struct PredicateFilter;

impl PredicateFilter {
    /// Checks if a record matches every clause (AND), where a clause
    /// matches if any of its conditions does (OR).
    pub fn matches(record: &SaleRecord, predicate: &Predicate) -> bool {
        predicate.clauses().iter().all(|clause| {
            clause
                .conditions()
                .iter()
                .any(|condition| Self::matches_condition(record, condition))
        })
    }

    fn matches_condition(record: &SaleRecord, condition: &Condition) -> bool {
        match condition {
            Condition::OneOf { column, values } => match column.read(record) {
                Some(actual) => values.iter().any(|v| v == actual),
                None => false,
            },
            Condition::Contains { column, needle } => match column.read(record) {
                Some(actual) => contains_ignore_case(actual, needle),
                None => false,
            },
            Condition::AgeBetween { min, max } => match record.age {
                Some(age) => {
                    min.map_or(true, |min| age >= min) && max.map_or(true, |max| age <= max)
                }
                None => false,
            },
            Condition::DateWithin { from, before } => {
                from.map_or(true, |from| record.date >= from)
                    && before.map_or(true, |before| record.date < before)
            }
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Clause;
    use crate::schema::TextColumn;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record() -> SaleRecord {
        SaleRecord::new(1, "T-1", day(2023, 6, 15))
            .with_customer("Priya Nair", "+91 98450 12345")
            .with_region("East")
            .with_tags("Organic,Skincare")
            .with_age(34)
    }

    fn single(condition: Condition) -> Predicate {
        Predicate::always().and(Clause::single(condition))
    }

    #[test]
    fn test_always_matches() {
        assert!(PredicateFilter::matches(&record(), &Predicate::always()));
    }

    #[test]
    fn test_one_of_is_exact() {
        let pred = single(Condition::OneOf {
            column: TextColumn::CustomerRegion,
            values: vec!["West".into(), "East".into()],
        });
        assert!(PredicateFilter::matches(&record(), &pred));

        let pred = single(Condition::OneOf {
            column: TextColumn::CustomerRegion,
            values: vec!["east".into()],
        });
        assert!(!PredicateFilter::matches(&record(), &pred));
    }

    #[test]
    fn test_contains_ignores_case() {
        let pred = single(Condition::Contains {
            column: TextColumn::Tags,
            needle: "skinCARE".into(),
        });
        assert!(PredicateFilter::matches(&record(), &pred));
    }

    #[test]
    fn test_null_column_never_matches() {
        let pred = single(Condition::OneOf {
            column: TextColumn::Gender,
            values: vec!["Female".into()],
        });
        assert!(!PredicateFilter::matches(&record(), &pred));

        let no_age = SaleRecord::new(2, "T-2", day(2023, 6, 15));
        let pred = single(Condition::AgeBetween {
            min: None,
            max: Some(100),
        });
        assert!(!PredicateFilter::matches(&no_age, &pred));
    }

    #[test]
    fn test_age_bounds_inclusive() {
        let exact = single(Condition::AgeBetween {
            min: Some(34),
            max: Some(34),
        });
        assert!(PredicateFilter::matches(&record(), &exact));

        let above = single(Condition::AgeBetween {
            min: Some(35),
            max: None,
        });
        assert!(!PredicateFilter::matches(&record(), &above));
    }

    #[test]
    fn test_date_upper_bound_exclusive() {
        let pred = single(Condition::DateWithin {
            from: Some(day(2023, 6, 15)),
            before: Some(day(2023, 6, 16)),
        });
        assert!(PredicateFilter::matches(&record(), &pred));

        let pred = single(Condition::DateWithin {
            from: None,
            before: Some(day(2023, 6, 15)),
        });
        assert!(!PredicateFilter::matches(&record(), &pred));
    }

    #[test]
    fn test_clause_or_then_and() {
        let pred = Predicate::always()
            .and(Clause::any(vec![
                Condition::Contains {
                    column: TextColumn::CustomerName,
                    needle: "12345".into(),
                },
                Condition::Contains {
                    column: TextColumn::PhoneNumber,
                    needle: "12345".into(),
                },
            ]))
            .and(Clause::single(Condition::OneOf {
                column: TextColumn::CustomerRegion,
                values: vec!["East".into()],
            }));
        assert!(PredicateFilter::matches(&record(), &pred));

        let pred = pred.and(Clause::single(Condition::AgeBetween {
            min: Some(40),
            max: None,
        }));
        assert!(!PredicateFilter::matches(&record(), &pred));
    }
}
