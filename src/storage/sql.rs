//! PostgreSQL statements for a predicate
//!
//! Compiles a `Predicate`, an `OrderSpec` and a `Window` into the three
//! statements a SQL-backed store runs: the page select, the match count
//! and the amount totals. All three share the same `WHERE` shape and
//! filter parameters; only the page select appends `LIMIT`/`OFFSET`.
//!
//! Statements are assembled with `sqlx::QueryBuilder`. Column names come
//! from the fixed column table. Caller input only ever reaches a statement
//! through `push_bind`.

use std::fmt;

use chrono::NaiveDate;
use sqlx::{Postgres, QueryBuilder};

use crate::planner::{Clause, Condition, OrderSpec, Predicate, SortDirection};
use crate::schema::columns;

use super::Window;

/// A value bound into a statement, kept for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
    Date(NaiveDate),
}

impl fmt::Display for SqlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlParam::Text(s) => write!(f, "{:?}", s),
            SqlParam::Int(n) => write!(f, "{}", n),
            SqlParam::Date(d) => write!(f, "{}", d),
        }
    }
}

/// A statement under construction, plus the values bound so far
pub struct SqlStatement {
    builder: QueryBuilder<'static, Postgres>,
    params: Vec<SqlParam>,
}

impl SqlStatement {
    fn new(init: impl Into<String>) -> Self {
        Self {
            builder: QueryBuilder::new(init),
            params: Vec::new(),
        }
    }

    /// Statement text with `$n` placeholders
    pub fn sql(&self) -> &str {
        self.builder.sql()
    }

    /// Bound values, in placeholder order
    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    /// The builder, ready for `build()`
    pub fn into_builder(self) -> QueryBuilder<'static, Postgres> {
        self.builder
    }

    fn push_bind(&mut self, param: SqlParam) {
        match &param {
            SqlParam::Text(s) => {
                self.builder.push_bind(s.clone());
            }
            SqlParam::Int(n) => {
                self.builder.push_bind(*n);
            }
            SqlParam::Date(d) => {
                self.builder.push_bind(*d);
            }
        }
        self.params.push(param);
    }

    fn push_where(&mut self, predicate: &Predicate) {
        if predicate.is_always() {
            return;
        }

        self.builder.push(" WHERE ");
        for (i, clause) in predicate.clauses().iter().enumerate() {
            if i > 0 {
                self.builder.push(" AND ");
            }
            self.push_clause(clause);
        }
    }

    fn push_clause(&mut self, clause: &Clause) {
        let conditions = clause.conditions();
        let grouped = conditions.len() > 1;

        if grouped {
            self.builder.push("(");
        }
        for (i, condition) in conditions.iter().enumerate() {
            if i > 0 {
                self.builder.push(" OR ");
            }
            self.push_condition(condition);
        }
        if grouped {
            self.builder.push(")");
        }
    }

    fn push_condition(&mut self, condition: &Condition) {
        let column = quote(condition.column_name());

        match condition {
            Condition::OneOf { values, .. } => {
                if values.is_empty() {
                    self.builder.push("FALSE");
                    return;
                }
                self.builder.push(format!("{} IN (", column));
                let mut separated = self.builder.separated(", ");
                for value in values {
                    separated.push_bind(value.clone());
                }
                self.builder.push(")");
                self.params
                    .extend(values.iter().cloned().map(SqlParam::Text));
            }
            Condition::Contains { needle, .. } => {
                self.builder.push(format!("{} ILIKE ", column));
                self.push_bind(SqlParam::Text(format!("%{}%", escape_like(needle))));
            }
            Condition::AgeBetween { min, max } => {
                self.push_range(&column, min.map(SqlParam::Int), ">=", max.map(SqlParam::Int), "<=");
            }
            Condition::DateWithin { from, before } => {
                self.push_range(
                    &column,
                    from.map(SqlParam::Date),
                    ">=",
                    before.map(SqlParam::Date),
                    "<",
                );
            }
        }
    }

    fn push_range(
        &mut self,
        column: &str,
        lower: Option<SqlParam>,
        lower_op: &str,
        upper: Option<SqlParam>,
        upper_op: &str,
    ) {
        let bounded_below = lower.is_some();
        if let Some(lower) = lower {
            self.builder.push(format!("{} {} ", column, lower_op));
            self.push_bind(lower);
        }
        if let Some(upper) = upper {
            if bounded_below {
                self.builder.push(" AND ");
            }
            self.builder.push(format!("{} {} ", column, upper_op));
            self.push_bind(upper);
        }
    }
}

impl fmt::Display for SqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.sql())?;
        for (i, param) in self.params.iter().enumerate() {
            writeln!(f, "  ${} = {}", i + 1, param)?;
        }
        Ok(())
    }
}

impl fmt::Debug for SqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlStatement")
            .field("sql", &self.sql())
            .field("params", &self.params)
            .finish()
    }
}

/// The statements for one query
#[derive(Debug)]
pub struct CompiledQuery {
    pub page: SqlStatement,
    pub count: SqlStatement,
    pub totals: SqlStatement,
}

/// Builds parameterized PostgreSQL statements from predicates
pub struct SqlCompiler;

impl SqlCompiler {
    pub fn compile(predicate: &Predicate, order: &OrderSpec, window: Window) -> CompiledQuery {
        CompiledQuery {
            page: Self::page(predicate, order, window),
            count: Self::count(predicate),
            totals: Self::totals(predicate),
        }
    }

    /// Ordered, windowed row select
    pub fn page(predicate: &Predicate, order: &OrderSpec, window: Window) -> SqlStatement {
        let mut statement = SqlStatement::new(format!("SELECT * FROM {}", quote(columns::TABLE)));
        statement.push_where(predicate);
        statement.builder.push(format!(
            " ORDER BY {} {}",
            quote(order.key.column_name()),
            direction_keyword(order.direction)
        ));
        statement.builder.push(" LIMIT ");
        statement.push_bind(SqlParam::Int(to_i64(window.limit)));
        statement.builder.push(" OFFSET ");
        statement.push_bind(SqlParam::Int(to_i64(window.offset)));
        statement
    }

    /// Count of all matching rows
    pub fn count(predicate: &Predicate) -> SqlStatement {
        let mut statement =
            SqlStatement::new(format!("SELECT COUNT(*) FROM {}", quote(columns::TABLE)));
        statement.push_where(predicate);
        statement
    }

    /// `finalAmount` and `totalAmount` sums over all matching rows
    pub fn totals(predicate: &Predicate) -> SqlStatement {
        let mut statement = SqlStatement::new(format!(
            "SELECT COALESCE(SUM({}), 0), COALESCE(SUM({}), 0) FROM {}",
            quote(columns::FINAL_AMOUNT),
            quote(columns::TOTAL_AMOUNT),
            quote(columns::TABLE)
        ));
        statement.push_where(predicate);
        statement
    }
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier)
}

fn direction_keyword(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Escapes LIKE metacharacters so the needle matches literally.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
