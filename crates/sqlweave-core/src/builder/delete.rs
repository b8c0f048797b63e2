//! DELETE statement builder.

use std::marker::PhantomData;

use super::{
    columns_of, finish, render_returning, validate_returning, validate_target, Filter, HasTable,
    NoTable,
};
use crate::binder::ParamBinder;
use crate::condition::LogicalType;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::stage::{Stage, StageErrors};
use crate::token::{Column, Renderable, Table};
use crate::value::{SqlValue, ToSqlValue};

/// A DELETE statement builder.
///
/// `build()` is only available once the table is specified.
///
/// **Warning**: without a WHERE condition every row is deleted.
#[derive(Debug, Clone)]
pub struct Delete<Target = NoTable> {
    table: Option<Table>,
    filter: Filter,
    returning: Vec<Column>,
    _state: PhantomData<Target>,
}

impl Delete<NoTable> {
    /// Creates a new DELETE builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: None,
            filter: Filter::default(),
            returning: vec![],
            _state: PhantomData,
        }
    }

    /// Specifies the table to delete from.
    #[must_use]
    pub fn from(self, table: &str) -> Delete<HasTable> {
        Delete {
            table: Some(Table::new(table)),
            filter: self.filter,
            returning: self.returning,
            _state: PhantomData,
        }
    }
}

impl Default for Delete<NoTable> {
    fn default() -> Self {
        Self::new()
    }
}

impl Delete<HasTable> {
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

    /// Returns true if a WHERE condition is specified.
    #[must_use]
    pub fn has_where_clause(&self) -> bool {
        !self.filter.conditions.is_empty()
    }

    /// Builds the DELETE statement and returns SQL with parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stages`](crate::Error::Stages) when the table or a
    /// condition is invalid, or RETURNING is unsupported.
    pub fn build(&self, dialect: &dyn Dialect) -> Result<(String, Vec<SqlValue>)> {
        let mut errors = StageErrors::new();
        validate_target(self.table.as_ref(), &mut errors);
        self.filter.validate(Stage::Where, &mut errors);
        validate_returning(&self.returning, dialect, &mut errors);
        errors.into_result()?;

        let mut sql = String::from("DELETE FROM ");
        if let Some(table) = &self.table {
            sql.push_str(&table.render(dialect));
        }
        let mut binder = ParamBinder::new(dialect);
        sql.push_str(&self.filter.render("WHERE", &mut binder));
        sql.push_str(&render_returning(&self.returning, dialect));

        finish("DELETE", dialect, sql, [binder])
    }
}
