//! Placeholder generation with positional continuity.

use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::value::{SqlValue, ToSqlValue};

/// Collects bound values and hands out dialect placeholders for them.
///
/// Positions are 1-based. A statement rendered in several passes (UPDATE's
/// SET, then its WHERE) continues numbering with [`ParamBinder::starting_at`]
/// so `$n` placeholders never collide. `?` dialects ignore the position.
#[derive(Debug)]
pub struct ParamBinder<'d> {
    dialect: &'d dyn Dialect,
    args: Vec<SqlValue>,
    position: usize,
    overflow: Option<usize>,
}

impl<'d> ParamBinder<'d> {
    /// Creates a binder whose first placeholder is position 1.
    #[must_use]
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self::starting_at(dialect, 1)
    }

    /// Creates a binder whose first placeholder is `position`.
    ///
    /// Position 0 is treated as 1.
    #[must_use]
    pub fn starting_at(dialect: &'d dyn Dialect, position: usize) -> Self {
        Self {
            dialect,
            args: Vec::new(),
            position: position.max(1),
            overflow: None,
        }
    }

    /// Returns the dialect placeholders are rendered for.
    #[must_use]
    pub fn dialect(&self) -> &'d dyn Dialect {
        self.dialect
    }

    /// Records `value` and returns its placeholder.
    pub fn bind(&mut self, value: impl ToSqlValue) -> String {
        let position = self.position;
        let max = self.dialect.max_placeholder_index();
        if max > 0 && position > max && self.overflow.is_none() {
            tracing::warn!(
                dialect = self.dialect.name(),
                position,
                max,
                "placeholder index exceeds dialect limit"
            );
            self.overflow = Some(position);
        }
        let placeholder = self.dialect.placeholder(position);
        self.args.push(value.to_sql_value());
        match self.position.checked_add(1) {
            Some(next) => self.position = next,
            None => {
                self.overflow.get_or_insert(position);
            }
        }
        placeholder
    }

    /// Binds every value in order.
    pub fn bind_many<I, V>(&mut self, values: I) -> Vec<String>
    where
        I: IntoIterator<Item = V>,
        V: ToSqlValue,
    {
        values.into_iter().map(|v| self.bind(v)).collect()
    }

    /// Returns the values bound so far.
    #[must_use]
    pub fn args(&self) -> &[SqlValue] {
        &self.args
    }

    /// Consumes the binder, returning the bound values.
    #[must_use]
    pub fn into_args(self) -> Vec<SqlValue> {
        self.args
    }

    /// Returns the position the next bind will use.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Fails if any bind went past the dialect's placeholder limit, or
    /// exhausted the position counter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PlaceholderLimit`] with the first offending index.
    pub fn check(&self) -> Result<()> {
        match self.overflow {
            Some(requested) => Err(Error::PlaceholderLimit {
                dialect: String::from(self.dialect.name()),
                max: self.dialect.max_placeholder_index(),
                requested,
            }),
            None => Ok(()),
        }
    }
}
