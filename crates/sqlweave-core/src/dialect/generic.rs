//! Generic SQL dialect.

use std::borrow::Cow;

use super::{Dialect, DialectOptions, PlaceholderStyle, QuoteStyle};

static OPTIONS: DialectOptions = DialectOptions {
    name: Cow::Borrowed("generic"),
    quote_style: QuoteStyle::None,
    placeholder_style: PlaceholderStyle::Question,
    allow_upsert: false,
    enable_returning: false,
    supports_cte: true,
    max_placeholder_index: 0,
};

/// A generic SQL dialect: unquoted identifiers and `?` placeholders.
///
/// Unrecognized dialect names resolve to this one.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericDialect;

impl GenericDialect {
    /// Creates a new generic dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for GenericDialect {
    fn options(&self) -> &DialectOptions {
        &OPTIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_dialect() {
        let dialect = GenericDialect::new();
        assert_eq!(dialect.name(), "generic");
        assert_eq!(dialect.quote_identifier("users"), "users");
        assert_eq!(dialect.placeholder(7), "?");
        assert!(!dialect.supports_returning());
        assert!(!dialect.supports_upsert());
        assert!(dialect.supports_cte());
        assert_eq!(dialect.max_placeholder_index(), 0);
    }
}
