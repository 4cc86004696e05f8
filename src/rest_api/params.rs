//! # Sales Query Parameters
//!
//! Raw caller input for a sales query and its validation into a
//! `QueryRequest`. Every field arrives optional and untyped: from a URL
//! query string everything is text, from a JSON body numbers may be
//! numbers and lists may be arrays.
//!
//! A key repeated in a query string (`region=East&region=West`) is read
//! as a list, the same as `region=East,West`. Repeating a single-valued
//! key such as `page` or `search` is rejected by `validate`.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::planner::{AgeRange, DateRange, FilterSet, OrderingResolver, QueryRequest};

use super::errors::{RestError, RestResult};

/// Page used when the caller gives none
pub const DEFAULT_PAGE: u64 = 1;

/// Page size used when the caller gives none
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Sort used when the caller gives none
pub const DEFAULT_SORT: &str = "date:desc";

/// One untyped parameter value
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

impl Scalar {
    /// Positive integer, or `None` if the value is anything else
    fn positive_int(&self) -> Option<u64> {
        let value = match self {
            Scalar::Int(n) => *n,
            Scalar::Float(f) if f.fract() == 0.0 && *f >= 1.0 && *f <= i64::MAX as f64 => {
                *f as i64
            }
            Scalar::Text(s) => s.trim().parse::<i64>().ok()?,
            _ => return None,
        };
        u64::try_from(value).ok().filter(|n| *n >= 1)
    }

    /// Integer, `Ok(None)` for blank text, `Err` for anything non-numeric
    fn optional_int(&self) -> Result<Option<i64>, ()> {
        match self {
            Scalar::Int(n) => Ok(Some(*n)),
            Scalar::Float(f) if f.fract() == 0.0 => Ok(Some(*f as i64)),
            Scalar::Text(s) if s.trim().is_empty() => Ok(None),
            Scalar::Text(s) => s.trim().parse::<i64>().map(Some).map_err(|_| ()),
            _ => Err(()),
        }
    }

    /// Comma-separated entries, trimmed, empties dropped
    fn entries(&self) -> Vec<String> {
        let raw: Vec<String> = match self {
            Scalar::Text(s) => s.split(',').map(str::to_string).collect(),
            Scalar::List(items) => items
                .iter()
                .flat_map(|item| item.split(','))
                .map(str::to_string)
                .collect(),
            Scalar::Int(n) => vec![n.to_string()],
            Scalar::Float(f) => vec![f.to_string()],
        };

        raw.into_iter()
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect()
    }

    fn text(&self) -> Option<String> {
        match self {
            Scalar::Text(s) => Some(s.clone()),
            Scalar::Int(n) => Some(n.to_string()),
            Scalar::Float(f) => Some(f.to_string()),
            Scalar::List(_) => None,
        }
    }
}

/// Query parameters of `GET /api/sales`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesQueryParams {
    #[serde(default)]
    pub page: Option<Scalar>,
    #[serde(default)]
    pub page_size: Option<Scalar>,
    #[serde(default)]
    pub search: Option<Scalar>,
    /// `field:direction`
    #[serde(default)]
    pub sort: Option<Scalar>,
    #[serde(default)]
    pub region: Option<Scalar>,
    #[serde(default)]
    pub gender: Option<Scalar>,
    #[serde(default)]
    pub category: Option<Scalar>,
    #[serde(default)]
    pub tags: Option<Scalar>,
    #[serde(default)]
    pub payment_method: Option<Scalar>,
    #[serde(default)]
    pub age_min: Option<Scalar>,
    #[serde(default)]
    pub age_max: Option<Scalar>,
    #[serde(default)]
    pub date_min: Option<Scalar>,
    #[serde(default)]
    pub date_max: Option<Scalar>,
}

impl SalesQueryParams {
    /// Builds params from decoded query-string pairs in arrival order.
    pub fn from_pairs<I>(pairs: I) -> RestResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut grouped = Map::new();
        for (key, value) in pairs {
            match grouped.get_mut(&key) {
                None => {
                    grouped.insert(key, Value::String(value));
                }
                Some(Value::Array(items)) => items.push(Value::String(value)),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, Value::String(value)]);
                }
            }
        }

        serde_json::from_value(Value::Object(grouped))
            .map_err(|e| RestError::InvalidQueryParam(e.to_string()))
    }

    /// Validates every parameter and builds the request.
    ///
    /// Nothing is planned if any parameter is invalid.
    pub fn validate(&self, max_page_size: u64) -> RestResult<QueryRequest> {
        let page = match &self.page {
            Some(value) => value.positive_int().ok_or(RestError::InvalidPagination)?,
            None => DEFAULT_PAGE,
        };
        let page_size = match &self.page_size {
            Some(value) => value.positive_int().ok_or(RestError::InvalidPagination)?,
            None => DEFAULT_PAGE_SIZE,
        };
        if page_size > max_page_size {
            return Err(RestError::PageSizeExceeded(page_size, max_page_size));
        }

        let search = match &self.search {
            Some(value) => value
                .text()
                .ok_or_else(|| RestError::InvalidQueryParam("search must be a string".into()))?,
            None => String::new(),
        };

        let sort = match &self.sort {
            Some(value) => value
                .text()
                .ok_or_else(|| RestError::InvalidQueryParam("sort must be a string".into()))?,
            None => DEFAULT_SORT.to_string(),
        };
        let (sort_key, sort_direction) = OrderingResolver::split_param(&sort);
        OrderingResolver::resolve(sort_key, sort_direction)?;

        let filters = FilterSet {
            region: list(&self.region),
            gender: list(&self.gender),
            category: list(&self.category),
            payment_method: list(&self.payment_method),
            tags: list(&self.tags),
            age: self.age_range()?,
            date: self.date_range()?,
        };

        Ok(QueryRequest {
            page,
            page_size,
            search,
            sort_key: sort_key.to_string(),
            sort_direction: sort_direction.map(str::to_string),
            filters,
        })
    }

    fn age_range(&self) -> RestResult<AgeRange> {
        let min = optional_age(&self.age_min)?;
        let max = optional_age(&self.age_max)?;

        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(RestError::InvalidAgeRange);
            }
        }

        Ok(AgeRange { min, max })
    }

    fn date_range(&self) -> RestResult<DateRange> {
        let min = optional_date("dateMin", &self.date_min)?;
        let max = optional_date("dateMax", &self.date_max)?;

        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(RestError::InvalidDateRange);
            }
        }

        Ok(DateRange { min, max })
    }
}

fn list(value: &Option<Scalar>) -> Vec<String> {
    value.as_ref().map(Scalar::entries).unwrap_or_default()
}

fn optional_age(value: &Option<Scalar>) -> RestResult<Option<i64>> {
    match value {
        Some(value) => value.optional_int().map_err(|_| RestError::InvalidAge),
        None => Ok(None),
    }
}

fn optional_date(name: &str, value: &Option<Scalar>) -> RestResult<Option<NaiveDate>> {
    let text = match value {
        Some(Scalar::Text(text)) => text.trim(),
        Some(_) => return Err(RestError::InvalidDate(name.to_string())),
        None => return Ok(None),
    };

    if text.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| RestError::InvalidDate(name.to_string()))
}
