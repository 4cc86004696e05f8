//! Validated query request and filter set
//!
//! These are built by the caller-facing validation layer; by the time a
//! `QueryRequest` exists its pagination is positive and its ranges ordered.

use chrono::NaiveDate;

use crate::schema::TextColumn;

/// Set-membership filter dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Region,
    Gender,
    Category,
    PaymentMethod,
}

impl Dimension {
    /// Every dimension, in clause order
    pub const ALL: [Dimension; 4] = [
        Dimension::Region,
        Dimension::Gender,
        Dimension::Category,
        Dimension::PaymentMethod,
    ];

    /// Stored column the dimension filters on
    pub fn column(&self) -> TextColumn {
        match self {
            Dimension::Region => TextColumn::CustomerRegion,
            Dimension::Gender => TextColumn::Gender,
            Dimension::Category => TextColumn::ProductCategory,
            Dimension::PaymentMethod => TextColumn::PaymentMethod,
        }
    }
}

/// Inclusive age bounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgeRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl AgeRange {
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Calendar day bounds, both inclusive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub min: Option<NaiveDate>,
    pub max: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Per-dimension constraints. An empty list or unbounded range is no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub region: Vec<String>,
    pub gender: Vec<String>,
    pub category: Vec<String>,
    pub payment_method: Vec<String>,
    /// Substrings matched against the tag column
    pub tags: Vec<String>,
    pub age: AgeRange,
    pub date: DateRange,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepted values of a set-membership dimension
    pub fn values(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Region => &self.region,
            Dimension::Gender => &self.gender,
            Dimension::Category => &self.category,
            Dimension::PaymentMethod => &self.payment_method,
        }
    }

    /// Replaces the accepted values of a dimension
    pub fn with_values(mut self, dimension: Dimension, values: &[&str]) -> Self {
        let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        match dimension {
            Dimension::Region => self.region = values,
            Dimension::Gender => self.gender = values,
            Dimension::Category => self.category = values,
            Dimension::PaymentMethod => self.payment_method = values,
        }
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_age(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.age = AgeRange { min, max };
        self
    }

    pub fn with_date(mut self, min: Option<NaiveDate>, max: Option<NaiveDate>) -> Self {
        self.date = DateRange { min, max };
        self
    }

    /// Returns true if no dimension carries a constraint
    pub fn is_empty(&self) -> bool {
        Dimension::ALL.iter().all(|d| self.values(*d).is_empty())
            && self.tags.is_empty()
            && self.age.is_unbounded()
            && self.date.is_unbounded()
    }
}

/// One paginated, filtered, sorted query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// 1-based page number
    pub page: u64,
    pub page_size: u64,
    /// Case-insensitive search over customer name and phone number
    pub search: String,
    pub sort_key: String,
    pub sort_direction: Option<String>,
    pub filters: FilterSet,
}

impl QueryRequest {
    /// First page of 10, no search, no filters, sorted by date descending
    pub fn new() -> Self {
        Self {
            page: 1,
            page_size: 10,
            search: String::new(),
            sort_key: "date".to_string(),
            sort_direction: Some("desc".to_string()),
            filters: FilterSet::default(),
        }
    }

    pub fn with_page(mut self, page: u64, page_size: u64) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_sort(mut self, key: impl Into<String>, direction: Option<&str>) -> Self {
        self.sort_key = key.into();
        self.sort_direction = direction.map(str::to_string);
        self
    }

    pub fn with_filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }

    /// Returns true if a search string or any filter is active
    pub fn has_criteria(&self) -> bool {
        !self.search.is_empty() || !self.filters.is_empty()
    }
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_columns_are_fixed() {
        assert_eq!(Dimension::Region.column(), TextColumn::CustomerRegion);
        assert_eq!(Dimension::Category.column(), TextColumn::ProductCategory);
        assert_eq!(Dimension::Gender.column(), TextColumn::Gender);
        assert_eq!(Dimension::PaymentMethod.column(), TextColumn::PaymentMethod);
    }

    #[test]
    fn test_empty_filter_set() {
        assert!(FilterSet::new().is_empty());
        assert!(!FilterSet::new().with_tags(&["eco"]).is_empty());
        assert!(!FilterSet::new().with_age(None, Some(40)).is_empty());
        assert!(FilterSet::new().with_age(None, None).is_empty());
    }

    #[test]
    fn test_request_criteria() {
        assert!(!QueryRequest::new().has_criteria());
        assert!(QueryRequest::new().with_search("ann").has_criteria());
        let filtered = QueryRequest::new()
            .with_filters(FilterSet::new().with_values(Dimension::Region, &["East"]));
        assert!(filtered.has_criteria());
    }
}
