//! Statement builders.
//!
//! Builders use the typestate pattern: `build()` only exists once the
//! statement has a table to work on. Everything else is collected as
//! [`Column`]s, [`Table`]s and [`Condition`]s and checked when the
//! statement is built, so one `build()` call reports every problem, grouped
//! by clause.
//!
//! # Example
//!
//! ```rust
//! use sqlweave_core::{resolve_dialect, Select};
//!
//! let (sql, args) = Select::new()
//!     .columns(&["id", "email"])
//!     .from("users")
//!     .where_("status", ["active"])
//!     .and_where("deleted", [false])
//!     .build(resolve_dialect("postgres"))
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     r#"SELECT "id", "email" FROM "users" WHERE "status" = $1 AND "deleted" = $2"#
//! );
//! assert_eq!(args.len(), 2);
//! ```

mod delete;
mod insert;
mod select;
mod update;

pub use delete::Delete;
pub use insert::{Insert, Upsert};
pub use select::{JoinKind, Select};
pub use update::Update;

use crate::binder::ParamBinder;
use crate::condition::{render_conditions, Condition, LogicalType};
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::stage::{Stage, StageErrors};
use crate::token::{Column, Renderable, Table, Validatable};
use crate::value::{SqlValue, ToSqlValue};

/// Marker: no table specified yet.
#[derive(Debug, Clone, Copy)]
pub struct NoTable;
/// Marker: table has been specified.
#[derive(Debug, Clone, Copy)]
pub struct HasTable;

/// Conditions of one WHERE or HAVING clause.
#[derive(Debug, Clone, Default)]
struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    fn push<I, V>(&mut self, logical_type: LogicalType, expr: &str, values: I)
    where
        I: IntoIterator<Item = V>,
        V: ToSqlValue,
    {
        self.conditions.push(Condition::new(logical_type, expr, values));
    }

    fn validate(&self, stage: Stage, errors: &mut StageErrors) {
        for cond in &self.conditions {
            errors.record(stage, cond);
        }
    }

    /// Renders ` KEYWORD cond ...`, or nothing when empty.
    fn render(&self, keyword: &str, binder: &mut ParamBinder<'_>) -> String {
        if self.conditions.is_empty() {
            return String::new();
        }
        format!(" {keyword} {}", render_conditions(&self.conditions, binder))
    }
}

fn columns_of<'a>(names: &'a [&'a str]) -> impl Iterator<Item = Column> + 'a {
    names.iter().map(|name| Column::new(name))
}

fn render_list<T: Renderable>(items: &[T], dialect: &dyn Dialect) -> String {
    items
        .iter()
        .map(|item| item.render(dialect))
        .collect::<Vec<_>>()
        .join(", ")
}

fn record_all<T: Validatable>(stage: Stage, items: &[T], errors: &mut StageErrors) {
    for item in items {
        errors.record(stage, item);
    }
}

/// Records invalid columns, and aliases where the clause takes plain columns.
fn record_unaliased<'c>(
    stage: Stage,
    columns: impl IntoIterator<Item = &'c Column>,
    errors: &mut StageErrors,
) {
    for column in columns {
        if column.is_valid() && !column.alias().is_empty() {
            errors.push(stage, Error::UnexpectedAlias(column.raw()));
        } else {
            errors.record(stage, column);
        }
    }
}

fn unsupported(dialect: &dyn Dialect, feature: &'static str) -> Error {
    Error::Unsupported {
        dialect: String::from(dialect.name()),
        feature,
    }
}

fn validate_target(table: Option<&Table>, errors: &mut StageErrors) {
    match table {
        Some(table) => errors.record(Stage::Table, table),
        None => errors.push(Stage::Table, Error::MissingClause("TABLE")),
    }
}

fn validate_returning(columns: &[Column], dialect: &dyn Dialect, errors: &mut StageErrors) {
    if columns.is_empty() {
        return;
    }
    if !dialect.supports_returning() {
        errors.push(Stage::Returning, unsupported(dialect, "RETURNING"));
    }
    record_all(Stage::Returning, columns, errors);
}

fn render_returning(columns: &[Column], dialect: &dyn Dialect) -> String {
    if columns.is_empty() {
        String::new()
    } else {
        format!(" RETURNING {}", render_list(columns, dialect))
    }
}

/// Checks placeholder limits and hands back SQL and arguments.
fn finish<'d>(
    statement: &'static str,
    dialect: &dyn Dialect,
    sql: String,
    binders: impl IntoIterator<Item = ParamBinder<'d>>,
) -> Result<(String, Vec<SqlValue>)> {
    let mut errors = StageErrors::new();
    let mut args = Vec::new();
    for binder in binders {
        errors.add(Stage::Params, binder.check().err());
        args.extend(binder.into_args());
    }
    errors.into_result()?;
    tracing::debug!(
        statement,
        dialect = dialect.name(),
        sql = %sql,
        args = args.len(),
        "built statement"
    );
    Ok((sql, args))
}
