//! SQL Server dialect.

use std::borrow::Cow;

use super::{Dialect, DialectOptions, PlaceholderStyle, QuoteStyle};

static OPTIONS: DialectOptions = DialectOptions {
    name: Cow::Borrowed("mssql"),
    quote_style: QuoteStyle::Bracket,
    placeholder_style: PlaceholderStyle::At,
    // MERGE and OUTPUT are not modelled.
    allow_upsert: false,
    enable_returning: false,
    supports_cte: true,
    max_placeholder_index: 2100,
};

/// SQL Server dialect: `[bracketed]` identifiers and `@pN` placeholders.
#[derive(Debug, Default, Clone, Copy)]
pub struct MssqlDialect;

impl MssqlDialect {
    /// Creates a new SQL Server dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for MssqlDialect {
    fn options(&self) -> &DialectOptions {
        &OPTIONS
    }

    fn pagination_requires_order(&self) -> bool {
        true
    }

    /// SQL Server paginates with `OFFSET ... FETCH` and needs an ORDER BY.
    fn pagination_syntax(&self, limit: i64, offset: i64) -> String {
        match (limit > 0, offset > 0) {
            (true, _) => format!(
                "OFFSET {} ROWS FETCH NEXT {limit} ROWS ONLY",
                offset.max(0)
            ),
            (false, true) => format!("OFFSET {offset} ROWS"),
            (false, false) => String::new(),
        }
    }
}
