//! Bound values and their type groups.
//!
//! Every value that ends up in an argument list is a [`SqlValue`]. Values
//! are grouped into [`ValueGroup`]s so multi-value operators (`IN`,
//! `BETWEEN`) can reject lists that mix, say, text and numbers.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::Serialize;

/// A SQL value that can be bound as a parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
    /// Timestamp without time zone (UTC for zoned inputs).
    Timestamp(NaiveDateTime),
}

/// Compatibility group of a [`SqlValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueGroup {
    /// Text values.
    Text,
    /// Integers and floats.
    Numeric,
    /// Timestamps.
    Temporal,
    /// Anything that never participates in a compatible list.
    Other,
}

impl SqlValue {
    /// Returns the compatibility group of this value.
    #[must_use]
    pub const fn group(&self) -> ValueGroup {
        match self {
            Self::Text(_) => ValueGroup::Text,
            Self::Int(_) | Self::Float(_) => ValueGroup::Numeric,
            Self::Timestamp(_) => ValueGroup::Temporal,
            Self::Null | Self::Bool(_) | Self::Blob(_) => ValueGroup::Other,
        }
    }

    /// Returns true for [`SqlValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the SQL representation for inline use (escaped).
    ///
    /// **Warning**: Prefer bound parameters. This is meant for diagnostics.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(b) => {
                if *b {
                    String::from("TRUE")
                } else {
                    String::from("FALSE")
                }
            }
            Self::Int(n) => format!("{n}"),
            Self::Float(f) => format!("{f}"),
            Self::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Blob(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
            Self::Timestamp(ts) => format!("'{}'", ts.format("%Y-%m-%d %H:%M:%S%.f")),
        }
    }
}

/// Reports whether `values` form a list usable with `IN` or `BETWEEN`.
///
/// At least two values are required, and all of them must belong to the
/// same group among text, numeric and temporal. Integers and floats mix
/// freely. A single value is never "compatible": callers handle the
/// one-value case before asking.
#[must_use]
pub fn are_compatible_types(values: &[SqlValue]) -> bool {
    let Some((first, rest)) = values.split_first() else {
        return false;
    };
    if rest.is_empty() {
        return false;
    }
    let group = first.group();
    group != ValueGroup::Other && rest.iter().all(|v| v.group() == group)
}

/// Infers a value from literal text found in an inline condition.
///
/// Single-quoted text is always a string (quotes removed, `''` unescaped).
/// Otherwise the text is tried as an integer, a float, then `true`/`false`,
/// and falls back to a string.
#[must_use]
pub fn infer_literal(text: &str) -> SqlValue {
    let text = text.trim();
    if let Some(inner) = unquote(text) {
        return SqlValue::Text(inner.replace("''", "'"));
    }
    if let Ok(n) = text.parse::<i64>() {
        return SqlValue::Int(n);
    }
    // f64 also accepts "inf" and "NaN"; only treat digit-bearing text as numeric.
    if text.bytes().any(|b| b.is_ascii_digit()) {
        if let Ok(f) = text.parse::<f64>() {
            return SqlValue::Float(f);
        }
    }
    if text.eq_ignore_ascii_case("true") {
        return SqlValue::Bool(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return SqlValue::Bool(false);
    }
    SqlValue::Text(String::from(text))
}

fn unquote(text: &str) -> Option<&str> {
    if text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'') {
        Some(&text[1..text.len() - 1])
    } else {
        None
    }
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for &SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self.clone()
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

macro_rules! int_to_sql_value {
    ($($ty:ty),*) => {
        $(
            impl ToSqlValue for $ty {
                fn to_sql_value(self) -> SqlValue {
                    SqlValue::Int(i64::from(self))
                }
            }
        )*
    };
}

int_to_sql_value!(i8, i16, i32, i64, u8, u16, u32);

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl ToSqlValue for &String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self.clone())
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        match self {
            Some(v) => v.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl ToSqlValue for &[u8] {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self.to_vec())
    }
}

impl ToSqlValue for NaiveDateTime {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Timestamp(self)
    }
}

impl ToSqlValue for NaiveDate {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Timestamp(self.and_time(chrono::NaiveTime::MIN))
    }
}

impl<Tz: TimeZone> ToSqlValue for DateTime<Tz> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Timestamp(self.naive_utc())
    }
}
