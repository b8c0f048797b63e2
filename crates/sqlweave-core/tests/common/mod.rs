#![allow(dead_code)]

use sqlweave_core::{resolve_dialect, Dialect, Error, SqlValue, Stage, StageReport};

pub fn generic() -> &'static dyn Dialect {
    resolve_dialect("generic")
}

pub fn postgres() -> &'static dyn Dialect {
    resolve_dialect("postgres")
}

pub fn mysql() -> &'static dyn Dialect {
    resolve_dialect("mysql")
}

pub fn sqlite() -> &'static dyn Dialect {
    resolve_dialect("sqlite")
}

pub fn mssql() -> &'static dyn Dialect {
    resolve_dialect("mssql")
}

pub fn text(s: &str) -> SqlValue {
    SqlValue::Text(String::from(s))
}

/// Unwraps a successful build, printing the error otherwise.
pub fn built(result: sqlweave_core::Result<(String, Vec<SqlValue>)>) -> (String, Vec<SqlValue>) {
    result.unwrap_or_else(|e| panic!("Expected statement to build:\n{e}"))
}

/// Unwraps a failed build into its per-stage report.
pub fn report(result: sqlweave_core::Result<(String, Vec<SqlValue>)>) -> StageReport {
    match result {
        Ok((sql, _)) => panic!("Expected build to fail, got: {sql}"),
        Err(Error::Stages(report)) => report,
        Err(other) => panic!("Expected stage errors, got {other:?}"),
    }
}

/// Asserts that `stage` recorded exactly `count` errors.
pub fn assert_stage_count(report: &StageReport, stage: Stage, count: usize) {
    assert_eq!(
        report.errors(stage).len(),
        count,
        "Unexpected error count for {stage}.\n  Report:\n{report}"
    );
}
