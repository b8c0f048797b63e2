//! Structured identifier tokens.
//!
//! A [`Token`] is the parsed form of a loosely written expression such as
//! `"users.id AS uid"`. Construction never fails: problems are recorded on
//! the token and reported later, when a builder collects them by stage.
//!
//! ```rust
//! use sqlweave_core::{Column, Renderable, Validatable, resolve_dialect};
//!
//! let col = Column::new("u.email AS contact");
//! assert!(col.is_valid());
//! assert_eq!(col.table(), Some("u"));
//! assert_eq!(col.raw(), "email AS contact");
//! assert_eq!(
//!     col.render(resolve_dialect("postgres")),
//!     r#""u"."email" AS "contact""#
//! );
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::dialect::Dialect;
use crate::error::Error;
use crate::parser::{has_top_level_comma, is_as_keyword, parse_alias, parse_table_column};

static PLAIN_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*$").expect("identifier pattern is valid")
});

/// What a token names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A selected, grouped or ordered column.
    Column,
    /// A FROM, JOIN or INTO target.
    Table,
    /// A WHERE or HAVING predicate.
    Condition,
    /// Not yet classified.
    Unknown,
}

/// Values that carry their own construction error.
pub trait Validatable {
    /// Returns the first error recorded during construction.
    fn error(&self) -> Option<&Error>;

    /// Returns true if the value can be rendered.
    fn is_valid(&self) -> bool;
}

/// Values that render to SQL text.
pub trait Renderable {
    /// Renders without quoting or qualification.
    fn raw(&self) -> String;

    /// Renders for `dialect`, quoting plain identifiers.
    fn render(&self, dialect: &dyn Dialect) -> String;
}

/// A parsed identifier expression with an optional alias.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    kind: TokenKind,
    name: String,
    alias: String,
    error: Option<Error>,
}

impl Token {
    /// Parses `expr`, optionally overriding its alias.
    ///
    /// The explicit alias wins over one written inline; when both are
    /// present and differ the token keeps the explicit alias and records an
    /// [`Error::AliasConflict`].
    #[must_use]
    pub fn new(kind: TokenKind, expr: &str, alias: Option<&str>) -> Self {
        let mut token = Self {
            kind,
            name: String::new(),
            alias: String::new(),
            error: None,
        };

        let expr = expr.trim();
        if expr.is_empty() {
            token.error = Some(Error::EmptyExpression);
            return token;
        }
        if has_top_level_comma(expr) {
            token.error = Some(Error::CommaSeparated(String::from(expr)));
            return token;
        }
        let words: Vec<&str> = expr.split_whitespace().collect();
        if words.len() > 1 {
            if is_as_keyword(words[0]) {
                token.error = Some(Error::LeadingAs(String::from(expr)));
                return token;
            }
            if words.last().is_some_and(|w| is_as_keyword(w)) {
                token.error = Some(Error::TrailingAs(String::from(expr)));
                return token;
            }
        }

        let (base, inline) = parse_alias(expr);
        if is_as_keyword(&base) {
            token.error = Some(Error::AsKeywordName);
            return token;
        }
        token.name = base;

        match alias.map(str::trim).filter(|a| !a.is_empty()) {
            Some(explicit) => {
                if !inline.is_empty() && inline != explicit {
                    token.error = Some(Error::AliasConflict {
                        explicit: String::from(explicit),
                        inline,
                    });
                }
                token.alias = String::from(explicit);
            }
            None => token.alias = inline,
        }
        token
    }

    /// Returns what the token names.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Returns the parsed name, without alias.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the alias, or `""`.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Returns a copy with `alias` assigned.
    ///
    /// Replacing a different existing alias records a conflict.
    #[must_use]
    pub fn with_alias(mut self, alias: &str) -> Self {
        let alias = alias.trim();
        if alias.is_empty() {
            return self;
        }
        if !self.alias.is_empty() && self.alias != alias {
            let inline = std::mem::take(&mut self.alias);
            self.record(Error::AliasConflict {
                explicit: String::from(alias),
                inline,
            });
        }
        self.alias = String::from(alias);
        self
    }

    fn record(&mut self, error: Error) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn render_alias(&self, dialect: &dyn Dialect, mut sql: String) -> String {
        if !self.alias.is_empty() {
            sql.push_str(" AS ");
            sql.push_str(&quote_reference(dialect, &self.alias));
        }
        sql
    }
}

/// Parses an unclassified token.
#[must_use]
pub fn new_token(expr: &str, alias: Option<&str>) -> Token {
    Token::new(TokenKind::Unknown, expr, alias)
}

impl Validatable for Token {
    fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    fn is_valid(&self) -> bool {
        !self.name.is_empty() && self.error.is_none()
    }
}

impl Renderable for Token {
    fn raw(&self) -> String {
        if self.alias.is_empty() {
            self.name.clone()
        } else {
            format!("{} AS {}", self.name, self.alias)
        }
    }

    fn render(&self, dialect: &dyn Dialect) -> String {
        self.render_alias(dialect, quote_reference(dialect, &self.name))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw())
    }
}

/// A column reference, optionally qualified by a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    token: Token,
    table: Option<String>,
}

impl Column {
    /// Parses a column expression such as `u.id AS uid` or `COUNT(*)`.
    #[must_use]
    pub fn new(expr: &str) -> Self {
        Self::parse(expr, None)
    }

    /// Parses a column expression with an explicit alias.
    #[must_use]
    pub fn aliased(expr: &str, alias: &str) -> Self {
        Self::parse(expr, Some(alias))
    }

    fn parse(expr: &str, alias: Option<&str>) -> Self {
        let mut token = Token::new(TokenKind::Column, expr, alias);
        let mut table = None;
        // Function calls and other expressions keep their dots.
        let is_expression = token.name.contains(|c: char| c == '(' || c.is_whitespace());
        if !token.name.is_empty() && !is_expression {
            let (qualifier, column) = parse_table_column(&token.name);
            if column.is_empty() {
                let name = std::mem::take(&mut token.name);
                token.record(Error::MissingColumn(name));
            } else {
                if !qualifier.is_empty() {
                    table = Some(qualifier);
                }
                token.name = column;
            }
        }
        Self { token, table }
    }

    /// Returns the column name, without qualifier or alias.
    #[must_use]
    pub fn name(&self) -> &str {
        self.token.name()
    }

    /// Returns the alias, or `""`.
    #[must_use]
    pub fn alias(&self) -> &str {
        self.token.alias()
    }

    /// Returns the table qualifier, if any.
    #[must_use]
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Returns the underlying token.
    #[must_use]
    pub const fn token(&self) -> &Token {
        &self.token
    }

    /// Returns a copy qualified by `table`.
    ///
    /// An unqualified column takes the name. A column already qualified by
    /// a different table keeps its qualifier and records
    /// [`Error::TableMismatch`].
    #[must_use]
    pub fn with_table(mut self, table: &str) -> Self {
        let table = table.trim();
        if table.is_empty() {
            return self;
        }
        match &self.table {
            None => self.table = Some(String::from(table)),
            Some(existing) if existing != table => {
                let existing = existing.clone();
                self.token.record(Error::TableMismatch {
                    existing,
                    requested: String::from(table),
                });
            }
            Some(_) => {}
        }
        self
    }

    /// Returns a copy qualified by the table's alias, or its name.
    #[must_use]
    pub fn qualified_by(self, table: &Table) -> Self {
        let reference = String::from(table.reference());
        self.with_table(&reference)
    }

    /// Returns a copy with `alias` assigned.
    #[must_use]
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.token = self.token.with_alias(alias);
        self
    }
}

impl Validatable for Column {
    fn error(&self) -> Option<&Error> {
        self.token.error()
    }

    fn is_valid(&self) -> bool {
        self.token.is_valid()
    }
}

impl Renderable for Column {
    fn raw(&self) -> String {
        self.token.raw()
    }

    fn render(&self, dialect: &dyn Dialect) -> String {
        let name = quote_reference(dialect, self.token.name());
        let sql = match &self.table {
            Some(table) => format!("{}.{name}", quote_reference(dialect, table)),
            None => name,
        };
        self.token.render_alias(dialect, sql)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw())
    }
}

/// A table reference with an optional alias.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    token: Token,
}

impl Table {
    /// Parses a table expression such as `users u` or `public.users AS u`.
    #[must_use]
    pub fn new(expr: &str) -> Self {
        Self {
            token: Token::new(TokenKind::Table, expr, None),
        }
    }

    /// Parses a table expression with an explicit alias.
    #[must_use]
    pub fn aliased(expr: &str, alias: &str) -> Self {
        Self {
            token: Token::new(TokenKind::Table, expr, Some(alias)),
        }
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.token.name()
    }

    /// Returns the alias, or `""`.
    #[must_use]
    pub fn alias(&self) -> &str {
        self.token.alias()
    }

    /// Returns the name other clauses should use: the alias if set.
    #[must_use]
    pub fn reference(&self) -> &str {
        if self.token.alias.is_empty() {
            self.token.name()
        } else {
            self.token.alias()
        }
    }
}

impl Validatable for Table {
    fn error(&self) -> Option<&Error> {
        self.token.error()
    }

    fn is_valid(&self) -> bool {
        self.token.is_valid()
    }
}

impl Renderable for Table {
    fn raw(&self) -> String {
        self.token.raw()
    }

    fn render(&self, dialect: &dyn Dialect) -> String {
        if is_plain_path(self.name()) {
            dialect.render_from(self.name(), self.alias())
        } else {
            self.token.render_alias(dialect, String::from(self.name()))
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw())
    }
}

fn is_plain_path(reference: &str) -> bool {
    reference.split('.').all(|part| PLAIN_IDENTIFIER.is_match(part))
}

/// Quotes a possibly dotted reference such as `u.id` or `u.*`.
///
/// Anything that is not made of plain identifiers (`COUNT(*)`, `1 + 1`,
/// already quoted names) is returned unchanged.
pub(crate) fn quote_reference(dialect: &dyn Dialect, reference: &str) -> String {
    let parts: Vec<&str> = reference.split('.').collect();
    let plain = parts.iter().enumerate().all(|(i, part)| {
        PLAIN_IDENTIFIER.is_match(part) || (*part == "*" && i == parts.len() - 1)
    });
    if !plain {
        return String::from(reference);
    }
    parts
        .iter()
        .map(|part| {
            if *part == "*" {
                String::from("*")
            } else {
                dialect.quote_identifier(part)
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::resolve_dialect;

    #[test]
    fn test_token_name_and_alias() {
        let token = new_token("users.id AS uid", None);
        assert!(token.is_valid());
        assert_eq!(token.name(), "users.id");
        assert_eq!(token.alias(), "uid");
        assert_eq!(token.kind(), TokenKind::Unknown);
        assert_eq!(token.raw(), "users.id AS uid");
    }

    #[test]
    fn test_token_errors() {
        assert_eq!(new_token("", None).error(), Some(&Error::EmptyExpression));
        assert_eq!(new_token("   ", None).error(), Some(&Error::EmptyExpression));
        assert!(matches!(
            new_token("a, b", None).error(),
            Some(Error::CommaSeparated(_))
        ));
        assert!(matches!(
            new_token("AS x", None).error(),
            Some(Error::LeadingAs(_))
        ));
        assert_eq!(new_token("as", None).error(), Some(&Error::AsKeywordName));
        for expr in ["", "a, b", "AS x", "AS"] {
            assert!(!new_token(expr, None).is_valid(), "{expr:?} should be invalid");
        }
    }

    #[test]
    fn test_commas_inside_calls_are_allowed() {
        let token = new_token("COALESCE(a, b) AS c", None);
        assert!(token.is_valid());
        assert_eq!(token.name(), "COALESCE(a, b)");

        let token = new_token("'a,b'", None);
        assert!(token.is_valid());
        assert_eq!(token.name(), "'a,b'");

        for expr in ["a,b", "COALESCE(a, b), c", "x AS y, z"] {
            assert!(
                matches!(new_token(expr, None).error(), Some(Error::CommaSeparated(_))),
                "{expr:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_trailing_as_is_rejected() {
        for expr in ["id AS", "users.id as", "COUNT(*) AS "] {
            let token = new_token(expr, None);
            assert!(!token.is_valid(), "{expr:?} should be invalid");
            assert!(matches!(token.error(), Some(Error::TrailingAs(_))));
        }
        assert!(new_token("CAST(x AS INT)", None).is_valid());
    }

    #[test]
    fn test_explicit_alias_matches_inline() {
        let token = new_token("id AS uid", Some("uid"));
        assert!(token.is_valid());
        assert_eq!(token.alias(), "uid");
    }

    #[test]
    fn test_explicit_alias_wins_on_conflict() {
        let token = new_token("id AS uid", Some("other"));
        assert_eq!(token.alias(), "other");
        assert_eq!(
            token.error(),
            Some(&Error::AliasConflict {
                explicit: String::from("other"),
                inline: String::from("uid"),
            })
        );
        assert!(!token.is_valid());
    }

    #[test]
    fn test_with_alias() {
        let token = new_token("id", None).with_alias("pk");
        assert!(token.is_valid());
        assert_eq!(token.raw(), "id AS pk");

        let token = token.with_alias("key");
        assert_eq!(token.alias(), "key");
        assert!(matches!(token.error(), Some(Error::AliasConflict { .. })));
    }

    #[test]
    fn test_column_qualifier() {
        let col = Column::new("users.id");
        assert_eq!(col.table(), Some("users"));
        assert_eq!(col.name(), "id");
        assert_eq!(col.raw(), "id");

        let col = Column::new("COUNT(u.id) AS n");
        assert_eq!(col.table(), None);
        assert_eq!(col.name(), "COUNT(u.id)");
    }

    #[test]
    fn test_column_missing_name() {
        let col = Column::new("users.");
        assert!(!col.is_valid());
        assert!(matches!(col.error(), Some(Error::MissingColumn(_))));
    }

    #[test]
    fn test_column_with_table() {
        let col = Column::new("id").with_table("users");
        assert_eq!(col.table(), Some("users"));
        assert!(col.is_valid());

        let same = Column::new("users.id").with_table("users");
        assert!(same.is_valid());

        let mismatch = Column::new("users.id").with_table("orders");
        assert_eq!(mismatch.table(), Some("users"));
        assert_eq!(
            mismatch.error(),
            Some(&Error::TableMismatch {
                existing: String::from("users"),
                requested: String::from("orders"),
            })
        );
    }

    #[test]
    fn test_column_qualified_by_table_alias() {
        let users = Table::new("users u");
        let col = Column::new("email").qualified_by(&users);
        assert_eq!(col.table(), Some("u"));
        let col = Column::new("email").qualified_by(&Table::new("users"));
        assert_eq!(col.table(), Some("users"));
    }

    #[test]
    fn test_column_render() {
        let pg = resolve_dialect("postgres");
        let mysql = resolve_dialect("mysql");
        let generic = resolve_dialect("generic");

        let col = Column::aliased("u.id", "uid");
        assert_eq!(col.render(pg), r#""u"."id" AS "uid""#);
        assert_eq!(col.render(mysql), "`u`.`id` AS `uid`");
        assert_eq!(col.render(generic), "u.id AS uid");

        assert_eq!(Column::new("*").render(pg), "*");
        assert_eq!(Column::new("u.*").render(pg), r#""u".*"#);
        assert_eq!(
            Column::new("COUNT(*) total").render(pg),
            r#"COUNT(*) AS "total""#
        );
    }

    #[test]
    fn test_table_render_and_reference() {
        let pg = resolve_dialect("postgres");
        let users = Table::new("users AS u");
        assert_eq!(users.reference(), "u");
        assert_eq!(users.render(pg), r#""users" AS "u""#);

        let plain = Table::new("public.users");
        assert_eq!(plain.reference(), "public.users");
        assert_eq!(plain.render(pg), r#""public"."users""#);

        let mssql = resolve_dialect("mssql");
        assert_eq!(Table::aliased("orders", "o").render(mssql), "[orders] AS [o]");
    }

    #[test]
    fn test_display_uses_raw() {
        assert_eq!(Table::new("users u").to_string(), "users AS u");
        assert_eq!(Column::new("a.b").to_string(), "b");
    }
}
