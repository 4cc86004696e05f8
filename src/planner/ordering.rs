//! Ordering resolver
//!
//! Maps a requested sort key and direction onto an `OrderSpec`. Only keys
//! on the allow-list resolve; anything else is rejected so that no caller
//! string reaches storage as a column name.

use super::ast::{OrderSpec, SortDirection, SortKey};
use super::errors::{PlannerError, PlannerResult};

/// Resolves sort requests
pub struct OrderingResolver;

impl OrderingResolver {
    /// Resolves a key and an optional direction.
    ///
    /// Direction is case-insensitive and falls back to ascending.
    pub fn resolve(sort_key: &str, direction: Option<&str>) -> PlannerResult<OrderSpec> {
        let key = SortKey::parse(sort_key.trim())
            .ok_or_else(|| PlannerError::unknown_sort_key(sort_key))?;

        Ok(OrderSpec {
            key,
            direction: SortDirection::parse_or_default(direction),
        })
    }

    /// Resolves a `field:direction` sort parameter.
    pub fn resolve_param(sort: &str) -> PlannerResult<OrderSpec> {
        let (key, direction) = Self::split_param(sort);
        Self::resolve(key, direction)
    }

    /// Splits `field:direction` at the first colon.
    pub fn split_param(sort: &str) -> (&str, Option<&str>) {
        match sort.split_once(':') {
            Some((key, direction)) => (key, Some(direction)),
            None => (sort, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_allowed_keys() {
        let spec = OrderingResolver::resolve("finalAmount", Some("desc")).unwrap();
        assert_eq!(spec, OrderSpec::desc(SortKey::FinalAmount));

        let spec = OrderingResolver::resolve("customerName", None).unwrap();
        assert_eq!(spec, OrderSpec::asc(SortKey::CustomerName));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = OrderingResolver::resolve("\"age\" desc; --", Some("asc")).unwrap_err();
        assert_eq!(err.code().code(), "SALES_UNKNOWN_SORT_KEY");
    }

    #[test]
    fn test_resolve_param() {
        assert_eq!(
            OrderingResolver::resolve_param("date:DESC").unwrap(),
            OrderSpec::desc(SortKey::Date)
        );
        assert_eq!(
            OrderingResolver::resolve_param("date").unwrap(),
            OrderSpec::asc(SortKey::Date)
        );
        assert_eq!(
            OrderingResolver::resolve_param("date:up").unwrap(),
            OrderSpec::asc(SortKey::Date)
        );
        assert!(OrderingResolver::resolve_param("quantity:asc").is_err());
    }

    #[test]
    fn test_split_param() {
        assert_eq!(
            OrderingResolver::split_param("finalAmount:desc"),
            ("finalAmount", Some("desc"))
        );
        assert_eq!(OrderingResolver::split_param("date"), ("date", None));
    }
}
