//! PostgreSQL dialect.

use std::borrow::Cow;

use super::{Dialect, DialectOptions, PlaceholderStyle, QuoteStyle};

static OPTIONS: DialectOptions = DialectOptions {
    name: Cow::Borrowed("postgres"),
    quote_style: QuoteStyle::Double,
    placeholder_style: PlaceholderStyle::Dollar,
    allow_upsert: true,
    enable_returning: true,
    supports_cte: true,
    max_placeholder_index: 65535,
};

/// PostgreSQL dialect: `"quoted"` identifiers and `$n` placeholders.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn options(&self) -> &DialectOptions {
        &OPTIONS
    }
}
