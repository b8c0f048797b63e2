//! Per-clause error collection.
//!
//! Builders do not fail on the first bad token. Every invalid token or
//! condition is recorded under the clause ("stage") it belongs to, and
//! `build()` reports all of them at once as a single [`Error::Stages`].

use std::fmt;

use crate::error::{Error, Result};
use crate::token::Validatable;

/// The clause an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// `WITH` common table expressions.
    With,
    /// Selected columns, or INSERT's column list.
    Columns,
    /// `FROM` target.
    From,
    /// `JOIN` targets and their `ON` columns.
    Join,
    /// `WHERE` conditions.
    Where,
    /// `GROUP BY` columns.
    GroupBy,
    /// `HAVING` conditions.
    Having,
    /// `ORDER BY` columns.
    OrderBy,
    /// INSERT, UPDATE or DELETE target.
    Table,
    /// UPDATE assignments.
    Set,
    /// INSERT rows.
    Values,
    /// `RETURNING` columns.
    Returning,
    /// Conflict handling of an upsert.
    Upsert,
    /// Placeholder limits.
    Params,
}

impl Stage {
    /// Returns the clause keyword used in error reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::With => "WITH",
            Self::Columns => "COLUMNS",
            Self::From => "FROM",
            Self::Join => "JOIN",
            Self::Where => "WHERE",
            Self::GroupBy => "GROUP BY",
            Self::Having => "HAVING",
            Self::OrderBy => "ORDER BY",
            Self::Table => "TABLE",
            Self::Set => "SET",
            Self::Values => "VALUES",
            Self::Returning => "RETURNING",
            Self::Upsert => "UPSERT",
            Self::Params => "PARAMS",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors grouped by stage, in the order they were recorded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StageReport {
    stages: Vec<(Stage, Vec<Error>)>,
}

impl StageReport {
    /// Iterates over stages with at least one error, first-seen first.
    pub fn stages(&self) -> impl Iterator<Item = (Stage, &[Error])> {
        self.stages.iter().map(|(stage, errors)| (*stage, errors.as_slice()))
    }

    /// Returns the errors recorded for `stage`.
    #[must_use]
    pub fn errors(&self, stage: Stage) -> &[Error] {
        self.stages
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, errors)| errors.as_slice())
            .unwrap_or_default()
    }

    /// Returns the total number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.iter().map(|(_, errors)| errors.len()).sum()
    }

    /// Returns true if no error was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl fmt::Display for StageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (stage, errors)) in self.stages.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            if let [only] = errors.as_slice() {
                write!(f, "{stage}: {only}")?;
            } else {
                write!(f, "{stage}:")?;
                for err in errors {
                    write!(f, "\n  - {err}")?;
                }
            }
        }
        Ok(())
    }
}

/// Accumulates errors for one statement.
#[derive(Debug, Clone, Default)]
pub struct StageErrors {
    report: StageReport,
}

impl StageErrors {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `error` under `stage`; `None` is ignored.
    pub fn add(&mut self, stage: Stage, error: Option<Error>) {
        if let Some(error) = error {
            self.push(stage, error);
        }
    }

    /// Records `error` under `stage`.
    pub fn push(&mut self, stage: Stage, error: Error) {
        match self.report.stages.iter_mut().find(|(s, _)| *s == stage) {
            Some((_, errors)) => errors.push(error),
            None => self.report.stages.push((stage, vec![error])),
        }
    }

    /// Records the construction error of `item`, if it has one.
    pub fn record(&mut self, stage: Stage, item: &impl Validatable) {
        self.add(stage, item.error().cloned());
    }

    /// Returns true if any error was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.report.is_empty()
    }

    /// Returns the total number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.report.len()
    }

    /// Returns true if no error was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.report.is_empty()
    }

    /// Combines everything recorded into one [`Error::Stages`].
    #[must_use]
    pub fn combine(&self) -> Option<Error> {
        self.has_errors().then(|| Error::Stages(self.report.clone()))
    }

    /// Returns `Ok(())` when nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns the combined [`Error::Stages`] otherwise.
    pub fn into_result(self) -> Result<()> {
        if self.has_errors() {
            Err(Error::Stages(self.report))
        } else {
            Ok(())
        }
    }
}
