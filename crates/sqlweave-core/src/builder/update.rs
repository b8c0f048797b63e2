//! UPDATE statement builder.

use std::marker::PhantomData;

use super::{
    columns_of, finish, record_unaliased, render_returning, validate_returning, validate_target,
    Filter, HasTable, NoTable,
};
use crate::binder::ParamBinder;
use crate::condition::LogicalType;
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::stage::{Stage, StageErrors};
use crate::token::{Column, Renderable, Table};
use crate::value::{SqlValue, ToSqlValue};

/// An UPDATE statement builder.
///
/// SET values are bound before WHERE values, so with numbered placeholders
/// the WHERE clause continues where SET stopped.
#[derive(Debug, Clone)]
pub struct Update<Target = NoTable> {
    table: Option<Table>,
    assignments: Vec<(Column, SqlValue)>,
    filter: Filter,
    returning: Vec<Column>,
    _state: PhantomData<Target>,
}

impl Update<NoTable> {
    /// Creates a new UPDATE builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: None,
            assignments: vec![],
            filter: Filter::default(),
            returning: vec![],
            _state: PhantomData,
        }
    }

    /// Specifies the table to update.
    #[must_use]
    pub fn table(self, table: &str) -> Update<HasTable> {
        Update {
            table: Some(Table::new(table)),
            assignments: self.assignments,
            filter: self.filter,
            returning: self.returning,
            _state: PhantomData,
        }
    }
}

impl Default for Update<NoTable> {
    fn default() -> Self {
        Self::new()
    }
}

impl Update<HasTable> {
    /// Sets a column to a value.
    #[must_use]
    pub fn set<T: ToSqlValue>(mut self, column: &str, value: T) -> Self {
        self.assignments.push((Column::new(column), value.to_sql_value()));
        self
    }

    /// Adds a WHERE condition.
    #[must_use]
    pub fn where_<I, V>(mut self, expr: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToSqlValue,
    {
        self.filter.push(LogicalType::Simple, expr, values);
        self
    }

    /// Adds a WHERE condition joined with `AND`.
    #[must_use]
    pub fn and_where<I, V>(mut self, expr: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToSqlValue,
    {
        self.filter.push(LogicalType::And, expr, values);
        self
    }

    /// Adds a WHERE condition joined with `OR`.
    #[must_use]
    pub fn or_where<I, V>(mut self, expr: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToSqlValue,
    {
        self.filter.push(LogicalType::Or, expr, values);
        self
    }

    /// Adds RETURNING columns.
    #[must_use]
    pub fn returning(mut self, cols: &[&str]) -> Self {
        self.returning.extend(columns_of(cols));
        self
    }

    /// Builds the UPDATE statement and returns SQL with parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stages`] when no column is set, a token or
    /// condition is invalid, or RETURNING is unsupported.
    pub fn build(&self, dialect: &dyn Dialect) -> Result<(String, Vec<SqlValue>)> {
        let mut errors = StageErrors::new();
        validate_target(self.table.as_ref(), &mut errors);
        if self.assignments.is_empty() {
            errors.push(Stage::Set, Error::MissingClause("SET"));
        }
        record_unaliased(
            Stage::Set,
            self.assignments.iter().map(|(column, _)| column),
            &mut errors,
        );
        self.filter.validate(Stage::Where, &mut errors);
        validate_returning(&self.returning, dialect, &mut errors);
        errors.into_result()?;

        let mut sql = String::from("UPDATE ");
        if let Some(table) = &self.table {
            sql.push_str(&table.render(dialect));
        }

        let mut set_binder = ParamBinder::new(dialect);
        let set_parts: Vec<String> = self
            .assignments
            .iter()
            .map(|(column, value)| {
                format!("{} = {}", column.render(dialect), set_binder.bind(value))
            })
            .collect();
        sql.push_str(" SET ");
        sql.push_str(&set_parts.join(", "));

        let mut where_binder = ParamBinder::starting_at(dialect, set_binder.position());
        sql.push_str(&self.filter.render("WHERE", &mut where_binder));
        sql.push_str(&render_returning(&self.returning, dialect));

        finish("UPDATE", dialect, sql, [set_binder, where_binder])
    }
}
