//! SQLite dialect implementation.

use std::borrow::Cow;

use super::{Dialect, DialectOptions, PlaceholderStyle, QuoteStyle};

static OPTIONS: DialectOptions = DialectOptions {
    name: Cow::Borrowed("sqlite"),
    // SQLite also accepts backticks and brackets, but double quotes are standard.
    quote_style: QuoteStyle::Double,
    placeholder_style: PlaceholderStyle::Question,
    // ON CONFLICT since 3.24.0.
    allow_upsert: true,
    // RETURNING since 3.35.0.
    enable_returning: true,
    supports_cte: true,
    // SQLITE_MAX_VARIABLE_NUMBER default since 3.32.0.
    max_placeholder_index: 32766,
};

/// SQLite dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn options(&self) -> &DialectOptions {
        &OPTIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_dialect() {
        let dialect = SqliteDialect::new();
        assert_eq!(dialect.name(), "sqlite");
        assert_eq!(dialect.quote_identifier("users"), "\"users\"");
        assert_eq!(dialect.placeholder(3), "?");
        assert!(dialect.supports_returning());
        assert!(dialect.supports_upsert());
        assert_eq!(dialect.max_placeholder_index(), 32766);
    }
}
