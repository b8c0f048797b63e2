//! Error types for token, condition and statement construction.
//!
//! Construction errors are stored on the token or condition that caused
//! them rather than returned immediately. Builders collect them per clause
//! with [`StageErrors`](crate::stage::StageErrors) and surface a single
//! [`Error::Stages`] from `build()`.

use crate::stage::StageReport;

/// Errors produced while parsing expressions and building statements.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The expression was empty or whitespace only.
    #[error("expression is empty")]
    EmptyExpression,

    /// A single-token expression contained a comma.
    #[error("aliases must not be comma-separated: {0:?}")]
    CommaSeparated(String),

    /// The expression started with the `AS` keyword.
    #[error("expression {0:?} cannot start with 'AS'")]
    LeadingAs(String),

    /// The expression ended with a dangling `AS` keyword.
    #[error("expression {0:?} cannot end with 'AS'")]
    TrailingAs(String),

    /// The parsed name was the bare `AS` keyword.
    #[error("name cannot be AS keyword")]
    AsKeywordName,

    /// A qualified name had nothing after the dot.
    #[error("column name missing in {0:?}")]
    MissingColumn(String),

    /// A column was aliased in a clause that only takes plain columns.
    #[error("alias not allowed here: {0:?}")]
    UnexpectedAlias(String),

    /// An explicit alias disagreed with the alias written inline.
    #[error("explicit alias {explicit:?} does not match inline alias {inline:?}")]
    AliasConflict {
        /// Alias passed by the caller.
        explicit: String,
        /// Alias parsed from the expression.
        inline: String,
    },

    /// A column was qualified by two different tables.
    #[error("table mismatch: column already qualified by {existing:?}, got {requested:?}")]
    TableMismatch {
        /// Qualifier recorded first.
        existing: String,
        /// Qualifier that was rejected.
        requested: String,
    },

    /// No operator could be found in an inline condition.
    #[error("unable to parse condition {0:?}")]
    UnparseableCondition(String),

    /// An inline condition had an operator but nothing after it.
    #[error("missing value after operator {0}")]
    MissingValue(&'static str),

    /// An inline condition contained a placeholder but no values were bound.
    #[error("placeholder without a value in {0:?}")]
    PlaceholderWithoutValue(String),

    /// `BETWEEN` was given the wrong number of values.
    #[error("BETWEEN requires exactly 2 values, got {0}")]
    BetweenArity(usize),

    /// Multi-value operator values did not share a type group.
    #[error("{operator} values must be of compatible types")]
    IncompatibleTypes {
        /// Operator being validated.
        operator: &'static str,
    },

    /// More placeholders were bound than the dialect allows.
    #[error("placeholder index {requested} exceeds {dialect} limit of {max}")]
    PlaceholderLimit {
        /// Dialect name.
        dialect: String,
        /// Highest index the dialect accepts.
        max: usize,
        /// Index that was requested.
        requested: usize,
    },

    /// The dialect does not support a requested feature.
    #[error("{feature} is not supported by the {dialect} dialect")]
    Unsupported {
        /// Dialect name.
        dialect: String,
        /// Feature keyword, e.g. `RETURNING`.
        feature: &'static str,
    },

    /// A VALUES row did not match the column list.
    #[error("expected {expected} values per row, got {found}")]
    ValueCountMismatch {
        /// Number of declared columns.
        expected: usize,
        /// Number of values in the offending row.
        found: usize,
    },

    /// A statement is missing a clause it requires.
    #[error("{0} clause is required")]
    MissingClause(&'static str),

    /// A custom dialect configuration could not be parsed.
    #[error("invalid dialect configuration: {0}")]
    Config(String),

    /// Errors collected across statement clauses.
    #[error("{0}")]
    Stages(StageReport),
}

impl Error {
    /// Returns true if this is an aggregated stage error.
    #[must_use]
    pub const fn is_stages(&self) -> bool {
        matches!(self, Self::Stages(_))
    }

    /// Returns the stage report if this is an aggregated error.
    #[must_use]
    pub const fn stages(&self) -> Option<&StageReport> {
        match self {
            Self::Stages(report) => Some(report),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for sqlweave operations.
pub type Result<T> = std::result::Result<T, Error>;
