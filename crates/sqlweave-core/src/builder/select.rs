//! SELECT statement builder.

use std::marker::PhantomData;

use super::{
    columns_of, finish, record_all, record_unaliased, render_list, unsupported, Filter, HasTable,
    NoTable,
};
use crate::binder::ParamBinder;
use crate::condition::LogicalType;
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::stage::{Stage, StageErrors};
use crate::token::{Column, Renderable, Table, Token, TokenKind};
use crate::value::{SqlValue, ToSqlValue};

/// Join flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// `INNER JOIN`
    Inner,
    /// `LEFT JOIN`
    Left,
}

impl JoinKind {
    const fn keyword(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
        }
    }
}

#[derive(Debug, Clone)]
struct Join {
    kind: JoinKind,
    table: Table,
    left: Column,
    right: Column,
}

#[derive(Debug, Clone)]
struct Cte {
    name: Token,
    query: Select<HasTable>,
}

/// A SELECT statement builder.
///
/// Uses the typestate pattern to ensure that:
/// - `build()` is only available once FROM is specified
/// - joins, conditions, grouping and pagination follow FROM
///
/// Without any column the statement selects `*`.
#[derive(Debug, Clone)]
pub struct Select<Source = NoTable> {
    ctes: Vec<Cte>,
    distinct: bool,
    columns: Vec<Column>,
    from: Option<Table>,
    joins: Vec<Join>,
    filter: Filter,
    group_by: Vec<Column>,
    having: Filter,
    order_by: Vec<(Column, bool)>,
    limit: u64,
    offset: u64,
    _state: PhantomData<Source>,
}

impl Select<NoTable> {
    /// Creates a new SELECT builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ctes: vec![],
            distinct: false,
            columns: vec![],
            from: None,
            joins: vec![],
            filter: Filter::default(),
            group_by: vec![],
            having: Filter::default(),
            order_by: vec![],
            limit: 0,
            offset: 0,
            _state: PhantomData,
        }
    }

    /// Specifies the table to select from, e.g. `users` or `users u`.
    #[must_use]
    pub fn from(self, table: &str) -> Select<HasTable> {
        self.with_from(Table::new(table))
    }

    /// Specifies the table to select from with an explicit alias.
    #[must_use]
    pub fn from_as(self, table: &str, alias: &str) -> Select<HasTable> {
        self.with_from(Table::aliased(table, alias))
    }

    fn with_from(self, table: Table) -> Select<HasTable> {
        Select {
            ctes: self.ctes,
            distinct: self.distinct,
            columns: self.columns,
            from: Some(table),
            joins: self.joins,
            filter: self.filter,
            group_by: self.group_by,
            having: self.having,
            order_by: self.order_by,
            limit: self.limit,
            offset: self.offset,
            _state: PhantomData,
        }
    }
}

impl Default for Select<NoTable> {
    fn default() -> Self {
        Self::new()
    }
}

// Methods available in any state
impl<Source> Select<Source> {
    /// Adds columns to select.
    #[must_use]
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns.extend(columns_of(cols));
        self
    }

    /// Adds one column with an explicit alias.
    #[must_use]
    pub fn column_as(mut self, expr: &str, alias: &str) -> Self {
        self.columns.push(Column::aliased(expr, alias));
        self
    }

    /// Selects all columns (*).
    #[must_use]
    pub fn all(mut self) -> Self {
        self.columns.push(Column::new("*"));
        self
    }

    /// Sets DISTINCT.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Adds a common table expression, rendered as `WITH name AS (...)`.
    ///
    /// Placeholders of the subquery come first in the argument list.
    #[must_use]
    pub fn with_cte(mut self, name: &str, query: Select<HasTable>) -> Self {
        self.ctes.push(Cte {
            name: Token::new(TokenKind::Table, name, None),
            query,
        });
        self
    }
}

// Methods available after FROM
impl Select<HasTable> {
    /// Adds an INNER JOIN on `left_col = right_col`.
    #[must_use]
    pub fn inner_join(self, table: &str, left_col: &str, right_col: &str) -> Self {
        self.join(JoinKind::Inner, table, left_col, right_col)
    }

    /// Adds a LEFT JOIN on `left_col = right_col`.
    #[must_use]
    pub fn left_join(self, table: &str, left_col: &str, right_col: &str) -> Self {
        self.join(JoinKind::Left, table, left_col, right_col)
    }

    /// Adds a join of the given kind.
    #[must_use]
    pub fn join(mut self, kind: JoinKind, table: &str, left_col: &str, right_col: &str) -> Self {
        self.joins.push(Join {
            kind,
            table: Table::new(table),
            left: Column::new(left_col),
            right: Column::new(right_col),
        });
        self
    }

    /// Adds a WHERE condition, e.g. `("age >=", [18])` or `("status = active", [])`.
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

    /// Adds GROUP BY columns.
    #[must_use]
    pub fn group_by(mut self, cols: &[&str]) -> Self {
        self.group_by.extend(columns_of(cols));
        self
    }

    /// Adds a HAVING condition; several are joined with `AND`.
    #[must_use]
    pub fn having<I, V>(mut self, expr: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToSqlValue,
    {
        self.having.push(LogicalType::And, expr, values);
        self
    }

    /// Adds ascending ORDER BY columns.
    #[must_use]
    pub fn order_by(mut self, cols: &[&str]) -> Self {
        self.order_by.extend(columns_of(cols).map(|c| (c, false)));
        self
    }

    /// Adds descending ORDER BY columns.
    #[must_use]
    pub fn order_by_desc(mut self, cols: &[&str]) -> Self {
        self.order_by.extend(columns_of(cols).map(|c| (c, true)));
        self
    }

    /// Sets the row limit; 0 means none.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = n;
        self
    }

    /// Sets the number of rows to skip; 0 means none.
    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.offset = n;
        self
    }

    /// Builds the SELECT statement and returns SQL with parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stages`] listing every invalid column, table or
    /// condition, and any feature the dialect lacks.
    pub fn build(&self, dialect: &dyn Dialect) -> Result<(String, Vec<SqlValue>)> {
        let mut errors = StageErrors::new();
        self.validate(dialect, &mut errors);
        errors.into_result()?;

        let mut binder = ParamBinder::new(dialect);
        let sql = self.render(dialect, &mut binder);
        finish("SELECT", dialect, sql, [binder])
    }

    fn validate(&self, dialect: &dyn Dialect, errors: &mut StageErrors) {
        if !self.ctes.is_empty() && !dialect.supports_cte() {
            errors.push(Stage::With, unsupported(dialect, "WITH"));
        }
        for cte in &self.ctes {
            errors.record(Stage::With, &cte.name);
            let mut nested = StageErrors::new();
            cte.query.validate(dialect, &mut nested);
            errors.add(Stage::With, nested.combine());
        }

        record_all(Stage::Columns, &self.columns, errors);
        match &self.from {
            Some(table) => errors.record(Stage::From, table),
            None => errors.push(Stage::From, Error::MissingClause("FROM")),
        }
        for join in &self.joins {
            errors.record(Stage::Join, &join.table);
            record_unaliased(Stage::Join, [&join.left, &join.right], errors);
        }
        self.filter.validate(Stage::Where, errors);
        record_unaliased(Stage::GroupBy, &self.group_by, errors);
        self.having.validate(Stage::Having, errors);
        record_unaliased(Stage::OrderBy, self.order_by.iter().map(|(col, _)| col), errors);
        let paginated = self.limit > 0 || self.offset > 0;
        if paginated && self.order_by.is_empty() && dialect.pagination_requires_order() {
            errors.push(Stage::OrderBy, Error::MissingClause("ORDER BY"));
        }
    }

    fn render(&self, dialect: &dyn Dialect, binder: &mut ParamBinder<'_>) -> String {
        let mut sql = String::new();

        if !self.ctes.is_empty() {
            let ctes: Vec<String> = self
                .ctes
                .iter()
                .map(|cte| {
                    let query = cte.query.render(dialect, binder);
                    format!("{} AS ({query})", cte.name.render(dialect))
                })
                .collect();
            sql.push_str("WITH ");
            sql.push_str(&ctes.join(", "));
            sql.push(' ');
        }

        sql.push_str("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        if self.columns.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&render_list(&self.columns, dialect));
        }

        if let Some(table) = &self.from {
            sql.push_str(" FROM ");
            sql.push_str(&table.render(dialect));
        }

        for join in &self.joins {
            sql.push_str(&format!(
                " {} {} ON {} = {}",
                join.kind.keyword(),
                join.table.render(dialect),
                join.left.render(dialect),
                join.right.render(dialect)
            ));
        }

        sql.push_str(&self.filter.render("WHERE", binder));

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&render_list(&self.group_by, dialect));
        }

        sql.push_str(&self.having.render("HAVING", binder));

        if !self.order_by.is_empty() {
            let order: Vec<String> = self
                .order_by
                .iter()
                .map(|(col, desc)| {
                    let col = col.render(dialect);
                    if *desc {
                        format!("{col} DESC")
                    } else {
                        col
                    }
                })
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&order.join(", "));
        }

        let limit = i64::try_from(self.limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(self.offset).unwrap_or(i64::MAX);
        let pagination = dialect.pagination_syntax(limit, offset);
        if !pagination.is_empty() {
            sql.push(' ');
            sql.push_str(&pagination);
        }

        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::resolve_dialect;

    #[test]
    fn test_simple_select() {
        let (sql, params) = Select::new()
            .columns(&["id", "name"])
            .from("users")
            .build(resolve_dialect("generic"))
            .unwrap();

        assert_eq!(sql, "SELECT id, name FROM users");
        assert!(params.is_empty());
    }

    #[test]
    fn test_select_defaults_to_star() {
        let (sql, _) = Select::new()
            .from("users")
            .build(resolve_dialect("postgres"))
            .unwrap();
        assert_eq!(sql, r#"SELECT * FROM "users""#);
    }

    #[test]
    fn test_select_distinct_all() {
        let (sql, _) = Select::new()
            .all()
            .distinct()
            .from("orders")
            .build(resolve_dialect("mysql"))
            .unwrap();
        assert_eq!(sql, "SELECT DISTINCT * FROM `orders`");
    }

    #[test]
    fn test_select_with_where() {
        let (sql, params) = Select::new()
            .columns(&["id"])
            .from("users")
            .where_("status", ["active"])
            .and_where("deleted", [false])
            .build(resolve_dialect("generic"))
            .unwrap();

        assert_eq!(sql, "SELECT id FROM users WHERE status = ? AND deleted = ?");
        assert_eq!(
            params,
            vec![SqlValue::Text(String::from("active")), SqlValue::Bool(false)]
        );
    }

    #[test]
    fn test_select_with_join() {
        let (sql, _) = Select::new()
            .columns(&["u.id", "o.amount"])
            .from("users u")
            .inner_join("orders o", "u.id", "o.user_id")
            .build(resolve_dialect("postgres"))
            .unwrap();

        assert_eq!(
            sql,
            r#"SELECT "u"."id", "o"."amount" FROM "users" AS "u" INNER JOIN "orders" AS "o" ON "u"."id" = "o"."user_id""#
        );
    }

    #[test]
    fn test_complex_select() {
        let (sql, params) = Select::new()
            .columns(&["u.id", "u.name"])
            .column_as("COUNT(o.id)", "order_count")
            .from_as("users", "u")
            .left_join("orders o", "u.id", "o.user_id")
            .where_("u.active", [true])
            .or_where("u.role IN ?", ["admin", "owner"])
            .group_by(&["u.id", "u.name"])
            .having("COUNT(o.id) >", [5])
            .order_by_desc(&["order_count"])
            .limit(10)
            .offset(20)
            .build(resolve_dialect("postgres"))
            .unwrap();

        assert!(sql.starts_with(r#"SELECT "u"."id", "u"."name", COUNT(o.id) AS "order_count""#));
        assert!(sql.contains(r#"FROM "users" AS "u""#));
        assert!(sql.contains(r#"LEFT JOIN "orders" AS "o" ON "u"."id" = "o"."user_id""#));
        assert!(sql.contains(r#"WHERE "u"."active" = $1 OR "u"."role" IN ($2, $3)"#));
        assert!(sql.contains(r#"GROUP BY "u"."id", "u"."name""#));
        assert!(sql.contains("HAVING COUNT(o.id) > $4"));
        assert!(sql.contains(r#"ORDER BY "order_count" DESC"#));
        assert!(sql.ends_with("LIMIT 10 OFFSET 20"));
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_mssql_pagination() {
        let (sql, _) = Select::new()
            .columns(&["id"])
            .from("users")
            .order_by(&["id"])
            .limit(5)
            .build(resolve_dialect("mssql"))
            .unwrap();
        assert_eq!(
            sql,
            "SELECT [id] FROM [users] ORDER BY [id] OFFSET 0 ROWS FETCH NEXT 5 ROWS ONLY"
        );
    }

    #[test]
    fn test_mssql_pagination_needs_order() {
        let err = Select::new()
            .from("users")
            .limit(5)
            .build(resolve_dialect("mssql"))
            .unwrap_err();
        assert_eq!(
            err.stages().unwrap().errors(Stage::OrderBy),
            &[Error::MissingClause("ORDER BY")]
        );

        // Other dialects paginate without an ORDER BY.
        let (sql, _) = Select::new()
            .from("users")
            .limit(5)
            .build(resolve_dialect("sqlite"))
            .unwrap();
        assert_eq!(sql, r#"SELECT * FROM "users" LIMIT 5"#);
    }

    #[test]
    fn test_cte_numbering_continues() {
        let recent = Select::new()
            .columns(&["user_id"])
            .from("orders")
            .where_("created_at >", ["2024-01-01"]);
        let (sql, params) = Select::new()
            .with_cte("recent", recent)
            .columns(&["id"])
            .from("users")
            .where_("status", ["active"])
            .build(resolve_dialect("postgres"))
            .unwrap();

        assert_eq!(
            sql,
            r#"WITH "recent" AS (SELECT "user_id" FROM "orders" WHERE "created_at" > $1) SELECT "id" FROM "users" WHERE "status" = $2"#
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_errors_are_collected_by_stage() {
        let err = Select::new()
            .columns(&["id", ""])
            .from("users, orders")
            .where_("price BETWEEN ? AND ?", [10])
            .and_where("status", Vec::<SqlValue>::new())
            .build(resolve_dialect("generic"))
            .unwrap_err();

        let report = err.stages().unwrap();
        assert_eq!(report.errors(Stage::Columns), &[Error::EmptyExpression]);
        assert!(matches!(
            report.errors(Stage::From),
            [Error::CommaSeparated(_)]
        ));
        assert_eq!(report.errors(Stage::Where).len(), 2);
        assert_eq!(report.len(), 4);
    }

    #[test]
    fn test_nested_cte_errors_are_reported_under_with() {
        let broken = Select::new().columns(&["AS x"]).from("orders");
        let err = Select::new()
            .with_cte("recent", broken)
            .from("users")
            .build(resolve_dialect("generic"))
            .unwrap_err();
        let report = err.stages().unwrap();
        assert!(matches!(report.errors(Stage::With), [Error::Stages(_)]));
    }
}
