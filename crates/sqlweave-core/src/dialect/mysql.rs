//! MySQL / MariaDB dialect.

use std::borrow::Cow;

use super::{Dialect, DialectOptions, PlaceholderStyle, QuoteStyle};

static OPTIONS: DialectOptions = DialectOptions {
    name: Cow::Borrowed("mysql"),
    quote_style: QuoteStyle::Backtick,
    placeholder_style: PlaceholderStyle::Question,
    allow_upsert: true,
    enable_returning: false,
    // WITH since MySQL 8.0 / MariaDB 10.2.
    supports_cte: true,
    max_placeholder_index: 65535,
};

/// MySQL dialect: `` `quoted` `` identifiers, `?` placeholders and
/// `ON DUPLICATE KEY UPDATE` upserts.
#[derive(Debug, Default, Clone, Copy)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for MysqlDialect {
    fn options(&self) -> &DialectOptions {
        &OPTIONS
    }

    fn upsert_requires_target(&self) -> bool {
        false
    }

    fn upsert_clause(&self, conflict_columns: &[String], update_columns: &[String]) -> String {
        // MySQL infers the conflict target from unique keys; "do nothing"
        // becomes a self-assignment of the first key column.
        let updates: Vec<String> = if update_columns.is_empty() {
            conflict_columns
                .first()
                .map(|col| vec![format!("{col} = {col}")])
                .unwrap_or_default()
        } else {
            update_columns
                .iter()
                .map(|col| format!("{col} = VALUES({col})"))
                .collect()
        };
        format!("ON DUPLICATE KEY UPDATE {}", updates.join(", "))
    }
}
