//! Predicate and ordering structures
//!
//! A `Predicate` is a conjunction of `Clause`s; each clause is a
//! disjunction of `Condition`s. The structure is storage-agnostic: the
//! in-memory store evaluates it directly and the SQL compiler renders it.

use std::fmt;

use chrono::NaiveDate;

use crate::schema::columns;
use crate::schema::TextColumn;

/// A single test against one column of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Column equals one of `values` exactly
    OneOf {
        column: TextColumn,
        values: Vec<String>,
    },
    /// Column contains `needle`, ignoring case
    Contains { column: TextColumn, needle: String },
    /// Age within `[min, max]`; an absent bound is open
    AgeBetween { min: Option<i64>, max: Option<i64> },
    /// Date within `[from, before)`; an absent bound is open
    DateWithin {
        from: Option<NaiveDate>,
        before: Option<NaiveDate>,
    },
}

impl Condition {
    /// Stored column this condition reads
    pub fn column_name(&self) -> &'static str {
        match self {
            Condition::OneOf { column, .. } | Condition::Contains { column, .. } => column.name(),
            Condition::AgeBetween { .. } => columns::AGE,
            Condition::DateWithin { .. } => columns::DATE,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::OneOf { column, values } => {
                write!(f, "{} in [{}]", column.name(), values.join(", "))
            }
            Condition::Contains { column, needle } => {
                write!(f, "{} contains~ {:?}", column.name(), needle)
            }
            Condition::AgeBetween { min, max } => {
                let mut parts = Vec::new();
                if let Some(min) = min {
                    parts.push(format!("{} >= {}", columns::AGE, min));
                }
                if let Some(max) = max {
                    parts.push(format!("{} <= {}", columns::AGE, max));
                }
                write!(f, "{}", parts.join(" and "))
            }
            Condition::DateWithin { from, before } => {
                let mut parts = Vec::new();
                if let Some(from) = from {
                    parts.push(format!("{} >= {}", columns::DATE, from));
                }
                if let Some(before) = before {
                    parts.push(format!("{} < {}", columns::DATE, before));
                }
                write!(f, "{}", parts.join(" and "))
            }
        }
    }
}

/// A disjunction of conditions. A clause with a single condition is a plain test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    any_of: Vec<Condition>,
}

impl Clause {
    /// A clause holding exactly one condition
    pub fn single(condition: Condition) -> Self {
        Self {
            any_of: vec![condition],
        }
    }

    /// A clause satisfied when any one of `conditions` holds
    pub fn any(conditions: Vec<Condition>) -> Self {
        Self { any_of: conditions }
    }

    /// The alternatives of this clause
    pub fn conditions(&self) -> &[Condition] {
        &self.any_of
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.any_of.iter().map(|c| c.to_string()).collect();
        if rendered.len() > 1 {
            write!(f, "({})", rendered.join(" or "))
        } else {
            write!(f, "{}", rendered.join(""))
        }
    }
}

/// Conjunction of clauses. No clauses matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    /// The predicate that matches every record
    pub fn always() -> Self {
        Self::default()
    }

    /// Adds a clause to the conjunction
    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Returns true if this predicate places no constraint
    pub fn is_always(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Allowed sort keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CustomerName,
    FinalAmount,
    Date,
}

impl SortKey {
    /// Parses a request-facing key. Unknown keys yield `None`.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "customerName" => Some(SortKey::CustomerName),
            "finalAmount" => Some(SortKey::FinalAmount),
            "date" => Some(SortKey::Date),
            _ => None,
        }
    }

    /// Stored column the key orders by
    pub fn column_name(&self) -> &'static str {
        match self {
            SortKey::CustomerName => TextColumn::CustomerName.name(),
            SortKey::FinalAmount => columns::FINAL_AMOUNT,
            SortKey::Date => columns::DATE,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parses a direction, ignoring case. Missing or unrecognized input is ascending.
    pub fn parse_or_default(direction: Option<&str>) -> Self {
        match direction.map(|d| d.trim().to_ascii_lowercase()).as_deref() {
            Some("desc") | Some("descending") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Resolved single-key ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl OrderSpec {
    pub fn asc(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Desc,
        }
    }
}

impl fmt::Display for OrderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key.column_name(), self.direction.as_str())
    }
}
