//! Dialects described by configuration.

use super::{Dialect, DialectOptions};

/// A dialect built from arbitrary [`DialectOptions`], e.g. loaded from JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomDialect {
    options: DialectOptions,
}

impl CustomDialect {
    /// Wraps a capability table.
    #[must_use]
    pub const fn new(options: DialectOptions) -> Self {
        Self { options }
    }

    /// Parses a capability table from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) when the document does
    /// not describe a dialect.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        DialectOptions::from_json(json).map(Self::new)
    }
}

impl Dialect for CustomDialect {
    fn options(&self) -> &DialectOptions {
        &self.options
    }
}
