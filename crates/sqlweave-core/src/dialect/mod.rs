//! SQL Dialect support.
//!
//! Different databases quote identifiers, number placeholders and paginate
//! differently, and not all of them support `RETURNING`, upserts or CTEs.
//! Each dialect is a fixed [`DialectOptions`] table behind the [`Dialect`]
//! trait; the trait's provided methods derive all rendering from it.

mod custom;
mod generic;
mod mssql;
mod mysql;
mod postgres;
mod sqlite;

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use custom::CustomDialect;
pub use generic::GenericDialect;
pub use mssql::MssqlDialect;
pub use mysql::MysqlDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

/// How identifiers are quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    /// Identifiers are emitted as-is.
    None,
    /// `"name"`
    Double,
    /// `` `name` ``
    Backtick,
    /// `[name]`
    Bracket,
}

impl QuoteStyle {
    /// Quotes `name`, doubling any embedded closing quote character.
    #[must_use]
    pub fn quote(self, name: &str) -> String {
        let (open, close) = match self {
            Self::None => return String::from(name),
            Self::Double => ('"', '"'),
            Self::Backtick => ('`', '`'),
            Self::Bracket => ('[', ']'),
        };
        let mut out = String::with_capacity(name.len() + 2);
        out.push(open);
        for ch in name.chars() {
            if ch == close {
                out.push(close);
            }
            out.push(ch);
        }
        out.push(close);
        out
    }
}

/// How bound parameters are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    /// `?` regardless of position.
    Question,
    /// `$1`, `$2`, ...
    Dollar,
    /// `:p1`, `:p2`, ...
    Named,
    /// `@p1`, `@p2`, ...
    At,
}

impl PlaceholderStyle {
    /// Renders the placeholder for a 1-based position.
    #[must_use]
    pub fn render(self, position: usize) -> String {
        match self {
            Self::Question => String::from("?"),
            Self::Dollar => format!("${position}"),
            Self::Named => format!(":p{position}"),
            Self::At => format!("@p{position}"),
        }
    }

    /// Returns true when the placeholder text depends on its position.
    #[must_use]
    pub const fn is_positional(self) -> bool {
        !matches!(self, Self::Question)
    }
}

/// The capability table describing one SQL engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialectOptions {
    /// Dialect name, e.g. `postgres`.
    pub name: Cow<'static, str>,
    /// Identifier quoting rule.
    pub quote_style: QuoteStyle,
    /// Placeholder rule.
    pub placeholder_style: PlaceholderStyle,
    /// Whether `INSERT ... ON CONFLICT` style upserts are available.
    #[serde(default)]
    pub allow_upsert: bool,
    /// Whether `RETURNING` is available.
    #[serde(default)]
    pub enable_returning: bool,
    /// Whether `WITH` common table expressions are available.
    #[serde(default)]
    pub supports_cte: bool,
    /// Highest placeholder index accepted; `0` means unbounded.
    #[serde(default)]
    pub max_placeholder_index: usize,
}

impl DialectOptions {
    /// Parses options from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the document is
    /// malformed or is missing required fields.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Trait for SQL dialect-specific behavior.
pub trait Dialect: fmt::Debug + Send + Sync {
    /// Returns the capability table of the dialect.
    fn options(&self) -> &DialectOptions;

    /// Returns the name of the dialect.
    fn name(&self) -> &str {
        &self.options().name
    }

    /// Quotes an identifier according to the dialect's quote style.
    fn quote_identifier(&self, name: &str) -> String {
        self.options().quote_style.quote(name)
    }

    /// Quotes each dot-separated part of a qualified name.
    fn quote_qualified(&self, name: &str) -> String {
        name.split('.')
            .map(|part| self.quote_identifier(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Returns the placeholder for a 1-based parameter position.
    fn placeholder(&self, position: usize) -> String {
        self.options().placeholder_style.render(position)
    }

    /// Renders `LIMIT`/`OFFSET`, omitting each part that is not positive.
    fn pagination_syntax(&self, limit: i64, offset: i64) -> String {
        let mut parts = Vec::with_capacity(2);
        if limit > 0 {
            parts.push(format!("LIMIT {limit}"));
        }
        if offset > 0 {
            parts.push(format!("OFFSET {offset}"));
        }
        parts.join(" ")
    }

    /// Renders a FROM/INTO target with an optional alias.
    fn render_from(&self, table: &str, alias: &str) -> String {
        let table = self.quote_qualified(table);
        if alias.is_empty() {
            table
        } else {
            format!("{table} AS {}", self.quote_identifier(alias))
        }
    }

    /// Returns whether the dialect supports the RETURNING clause.
    fn supports_returning(&self) -> bool {
        self.options().enable_returning
    }

    /// Returns whether the dialect supports upserts.
    fn supports_upsert(&self) -> bool {
        self.options().allow_upsert
    }

    /// Returns whether `DO UPDATE` needs explicit conflict columns.
    fn upsert_requires_target(&self) -> bool {
        true
    }

    /// Returns whether LIMIT/OFFSET is only valid after an ORDER BY.
    fn pagination_requires_order(&self) -> bool {
        false
    }

    /// Returns whether the dialect supports `WITH` queries.
    fn supports_cte(&self) -> bool {
        self.options().supports_cte
    }

    /// Returns the highest placeholder index accepted (`0` is unbounded).
    fn max_placeholder_index(&self) -> usize {
        self.options().max_placeholder_index
    }

    /// Renders the conflict clause of an upsert.
    ///
    /// Column names are expected to be quoted and unqualified. An empty
    /// `update_columns` means "do nothing" on conflict.
    fn upsert_clause(&self, conflict_columns: &[String], update_columns: &[String]) -> String {
        let mut sql = String::from("ON CONFLICT");
        if !conflict_columns.is_empty() {
            sql.push_str(" (");
            sql.push_str(&conflict_columns.join(", "));
            sql.push(')');
        }
        if update_columns.is_empty() {
            sql.push_str(" DO NOTHING");
        } else {
            let updates: Vec<String> = update_columns
                .iter()
                .map(|col| format!("{col} = EXCLUDED.{col}"))
                .collect();
            sql.push_str(" DO UPDATE SET ");
            sql.push_str(&updates.join(", "));
        }
        sql
    }
}

static GENERIC: GenericDialect = GenericDialect::new();
static POSTGRES: PostgresDialect = PostgresDialect::new();
static MYSQL: MysqlDialect = MysqlDialect::new();
static SQLITE: SqliteDialect = SqliteDialect::new();
static MSSQL: MssqlDialect = MssqlDialect::new();

/// Selects a dialect by name.
///
/// Matching ignores case and surrounding whitespace and accepts common
/// aliases (`postgresql`, `pg`, `mariadb`, `sqlite3`, `sqlserver`). Unknown
/// names fall back to the generic dialect; a warning is logged but no error
/// is returned.
#[must_use]
pub fn resolve_dialect(name: &str) -> &'static dyn Dialect {
    match name.trim().to_ascii_lowercase().as_str() {
        "" | "generic" => &GENERIC,
        "postgres" | "postgresql" | "pg" => &POSTGRES,
        "mysql" | "mariadb" => &MYSQL,
        "sqlite" | "sqlite3" => &SQLITE,
        "mssql" | "sqlserver" => &MSSQL,
        other => {
            tracing::warn!(dialect = other, "unknown dialect, falling back to generic");
            &GENERIC
        }
    }
}

/// Returns every built-in dialect.
#[must_use]
pub fn builtin_dialects() -> [&'static dyn Dialect; 5] {
    [&GENERIC, &POSTGRES, &MYSQL, &SQLITE, &MSSQL]
}
