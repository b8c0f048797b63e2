//! INSERT and upsert statement builders.

use std::marker::PhantomData;

use super::{
    columns_of, finish, record_unaliased, render_list, render_returning, unsupported,
    validate_returning, validate_target, HasTable, NoTable,
};
use crate::binder::ParamBinder;
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::stage::{Stage, StageErrors};
use crate::token::{quote_reference, Column, Renderable, Table};
use crate::value::{SqlValue, ToSqlValue};

/// An INSERT statement builder.
///
/// `build()` is only available once the target table is specified. Every
/// row must have as many values as there are columns; without a column
/// list, as many as the first row.
#[derive(Debug, Clone)]
pub struct Insert<Target = NoTable> {
    table: Option<Table>,
    columns: Vec<Column>,
    rows: Vec<Vec<SqlValue>>,
    returning: Vec<Column>,
    _state: PhantomData<Target>,
}

impl Insert<NoTable> {
    /// Creates a new INSERT builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: None,
            columns: vec![],
            rows: vec![],
            returning: vec![],
            _state: PhantomData,
        }
    }

    /// Specifies the table to insert into.
    #[must_use]
    pub fn into(self, table: &str) -> Insert<HasTable> {
        Insert {
            table: Some(Table::new(table)),
            columns: self.columns,
            rows: self.rows,
            returning: self.returning,
            _state: PhantomData,
        }
    }
}

impl Default for Insert<NoTable> {
    fn default() -> Self {
        Self::new()
    }
}

impl Insert<HasTable> {
    /// Specifies the columns to insert into.
    #[must_use]
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns.extend(columns_of(cols));
        self
    }

    /// Adds a row of values.
    #[must_use]
    pub fn values<I, V>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToSqlValue,
    {
        self.rows.push(row.into_iter().map(ToSqlValue::to_sql_value).collect());
        self
    }

    /// Adds RETURNING columns.
    #[must_use]
    pub fn returning(mut self, cols: &[&str]) -> Self {
        self.returning.extend(columns_of(cols));
        self
    }

    /// Turns the statement into an upsert on conflict with `cols`.
    ///
    /// The upsert does nothing on conflict until
    /// [`do_update`](Upsert::do_update) is called.
    #[must_use]
    pub fn on_conflict(self, cols: &[&str]) -> Upsert {
        Upsert {
            insert: self,
            conflict: columns_of(cols).collect(),
            update: vec![],
        }
    }

    /// Builds the INSERT statement and returns SQL with parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stages`] when a token is invalid, no row was added,
    /// a row has the wrong number of values, or RETURNING is requested from
    /// a dialect without it.
    pub fn build(&self, dialect: &dyn Dialect) -> Result<(String, Vec<SqlValue>)> {
        let mut errors = StageErrors::new();
        self.validate(dialect, &mut errors);
        errors.into_result()?;

        let mut binder = ParamBinder::new(dialect);
        let sql = self.render(dialect, &mut binder, None);
        finish("INSERT", dialect, sql, [binder])
    }

    fn validate(&self, dialect: &dyn Dialect, errors: &mut StageErrors) {
        validate_target(self.table.as_ref(), errors);
        record_unaliased(Stage::Columns, &self.columns, errors);

        let expected = if self.columns.is_empty() {
            self.rows.first().map_or(0, Vec::len)
        } else {
            self.columns.len()
        };
        if self.rows.is_empty() || expected == 0 {
            errors.push(Stage::Values, Error::MissingClause("VALUES"));
        }
        for row in &self.rows {
            if expected > 0 && row.len() != expected {
                errors.push(
                    Stage::Values,
                    Error::ValueCountMismatch {
                        expected,
                        found: row.len(),
                    },
                );
            }
        }

        validate_returning(&self.returning, dialect, errors);
    }

    fn render(
        &self,
        dialect: &dyn Dialect,
        binder: &mut ParamBinder<'_>,
        conflict: Option<String>,
    ) -> String {
        let mut sql = String::from("INSERT INTO ");

        if let Some(table) = &self.table {
            sql.push_str(&table.render(dialect));
        }

        if !self.columns.is_empty() {
            sql.push_str(" (");
            sql.push_str(&render_list(&self.columns, dialect));
            sql.push(')');
        }

        let rows: Vec<String> = self
            .rows
            .iter()
            .map(|row| format!("({})", binder.bind_many(row).join(", ")))
            .collect();
        sql.push_str(" VALUES ");
        sql.push_str(&rows.join(", "));

        if let Some(conflict) = conflict {
            sql.push(' ');
            sql.push_str(&conflict);
        }

        sql.push_str(&render_returning(&self.returning, dialect));
        sql
    }
}

/// An INSERT that resolves conflicts on a set of columns.
///
/// The clause itself comes from [`Dialect::upsert_clause`], so MySQL gets
/// `ON DUPLICATE KEY UPDATE` where PostgreSQL and SQLite get `ON CONFLICT`.
#[derive(Debug, Clone)]
pub struct Upsert {
    insert: Insert<HasTable>,
    conflict: Vec<Column>,
    update: Vec<Column>,
}

impl Upsert {
    /// Overwrites `cols` with the incoming values on conflict.
    #[must_use]
    pub fn do_update(mut self, cols: &[&str]) -> Self {
        self.update = columns_of(cols).collect();
        self
    }

    /// Keeps the existing row on conflict.
    #[must_use]
    pub fn do_nothing(mut self) -> Self {
        self.update.clear();
        self
    }

    /// Adds RETURNING columns.
    #[must_use]
    pub fn returning(mut self, cols: &[&str]) -> Self {
        self.insert = self.insert.returning(cols);
        self
    }

    /// Builds the upsert and returns SQL with parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stages`] for everything [`Insert::build`] rejects,
    /// plus invalid or aliased conflict columns, a missing conflict target
    /// where the dialect needs one, and dialects without upsert support.
    pub fn build(&self, dialect: &dyn Dialect) -> Result<(String, Vec<SqlValue>)> {
        let mut errors = StageErrors::new();
        self.insert.validate(dialect, &mut errors);
        if !dialect.supports_upsert() {
            errors.push(Stage::Upsert, unsupported(dialect, "UPSERT"));
        }
        if self.conflict.is_empty()
            && (self.update.is_empty() || dialect.upsert_requires_target())
        {
            errors.push(Stage::Upsert, Error::MissingClause("ON CONFLICT"));
        }
        record_unaliased(Stage::Upsert, self.conflict.iter().chain(&self.update), &mut errors);
        errors.into_result()?;

        // Conflict targets and EXCLUDED references take bare column names.
        let bare = |columns: &[Column]| -> Vec<String> {
            columns
                .iter()
                .map(|c| quote_reference(dialect, c.name()))
                .collect()
        };
        let conflict = bare(&self.conflict);
        let update = bare(&self.update);
        let clause = dialect.upsert_clause(&conflict, &update);

        let mut binder = ParamBinder::new(dialect);
        let sql = self.insert.render(dialect, &mut binder, Some(clause));
        finish("UPSERT", dialect, sql, [binder])
    }
}
