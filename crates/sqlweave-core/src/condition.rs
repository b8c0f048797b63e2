//! WHERE and HAVING predicates.
//!
//! A [`Condition`] is either written inline (`"age >= 18"`) or as a field
//! plus bound values (`"age >="`, `[18]`, or just `"id"`, `[1, 2, 3]`).
//! Resolution picks the field, the operator and the values, then checks the
//! value count and types the operator needs. As with tokens, failures are
//! stored on the condition rather than returned.
//!
//! ```rust
//! use sqlweave_core::{Condition, Operator, ParamBinder, SqlValue, resolve_dialect};
//!
//! let cond = Condition::simple("region IN ?", ["US", "CA"]);
//! assert_eq!(cond.operator(), Some(Operator::In));
//!
//! let mut binder = ParamBinder::new(resolve_dialect("postgres"));
//! assert_eq!(cond.render(&mut binder), r#""region" IN ($1, $2)"#);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::binder::ParamBinder;
use crate::error::Error;
use crate::parser::{contains_placeholder, extract_condition_parts, split_between, split_list};
use crate::token::{quote_reference, Validatable};
use crate::value::{are_compatible_types, infer_literal, SqlValue, ToSqlValue};

/// How a condition joins the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogicalType {
    /// First condition of a clause; joins with `AND` if it is not.
    #[default]
    Simple,
    /// Joined with `AND`.
    And,
    /// Joined with `OR`.
    Or,
}

impl LogicalType {
    /// Returns the connective placed before a condition of this type.
    #[must_use]
    pub const fn connective(self) -> &'static str {
        match self {
            Self::Simple | Self::And => " AND ",
            Self::Or => " OR ",
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `<>`
    NotEqual,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Gte,
    /// `<=`
    Lte,
    /// `IN`
    In,
    /// `NOT IN`
    NotIn,
    /// `BETWEEN`
    Between,
    /// `LIKE`
    Like,
    /// `NOT LIKE`
    NotLike,
}

impl Operator {
    /// Returns the SQL text of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::NotEqual => "<>",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Between => "BETWEEN",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
        }
    }

    /// Returns true for operators that take a list of values.
    #[must_use]
    pub const fn is_multi_value(self) -> bool {
        matches!(self, Self::In | Self::NotIn | Self::Between)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        crate::parser::OPERATOR_PRECEDENCE
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| Error::UnparseableCondition(String::from(s)))
    }
}

/// A resolved predicate: field, operator and bound values.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    logical_type: LogicalType,
    field: String,
    operator: Option<Operator>,
    values: Vec<SqlValue>,
    error: Option<Error>,
}

/// Resolves a condition from an expression and its bound values.
///
/// With no values the expression must be complete (`status = 'active'`)
/// and its literal is inferred. With values, an operator written in the
/// expression is kept (`age >= ?`); a bare field gets `=` for one value and
/// `IN` for several.
#[must_use]
pub fn new_condition(logical_type: LogicalType, expr: &str, values: Vec<SqlValue>) -> Condition {
    let mut cond = Condition {
        logical_type,
        field: String::new(),
        operator: None,
        values: Vec::new(),
        error: None,
    };

    let expr = expr.trim();
    if expr.is_empty() {
        cond.error = Some(Error::EmptyExpression);
        return cond;
    }

    let parts = extract_condition_parts(expr);
    if values.is_empty() {
        let Some(parts) = parts else {
            cond.error = Some(Error::UnparseableCondition(String::from(expr)));
            return cond;
        };
        cond.field = parts.field;
        cond.operator = Some(parts.operator);
        if parts.remainder.is_empty() {
            cond.error = Some(Error::MissingValue(parts.operator.as_str()));
            return cond;
        }
        if contains_placeholder(&parts.remainder) {
            cond.error = Some(Error::PlaceholderWithoutValue(String::from(expr)));
            return cond;
        }
        let literals = match parts.operator {
            Operator::In | Operator::NotIn => split_list(&parts.remainder),
            Operator::Between => split_between(&parts.remainder),
            _ => vec![parts.remainder],
        };
        cond.values = literals.iter().map(|lit| infer_literal(lit)).collect();
    } else {
        match parts {
            Some(parts) => {
                cond.field = parts.field;
                cond.operator = Some(parts.operator);
            }
            None => {
                cond.field = String::from(expr);
                cond.operator = Some(if values.len() > 1 {
                    Operator::In
                } else {
                    Operator::Eq
                });
            }
        }
        cond.values = values;
    }

    cond.validate();
    cond
}

impl Condition {
    /// Resolves a condition from an expression and any number of values.
    #[must_use]
    pub fn new<I, V>(logical_type: LogicalType, expr: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToSqlValue,
    {
        let values = values.into_iter().map(ToSqlValue::to_sql_value).collect();
        new_condition(logical_type, expr, values)
    }

    /// A condition with no connective of its own.
    #[must_use]
    pub fn simple<I, V>(expr: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToSqlValue,
    {
        Self::new(LogicalType::Simple, expr, values)
    }

    /// A condition joined with `AND`.
    #[must_use]
    pub fn and<I, V>(expr: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToSqlValue,
    {
        Self::new(LogicalType::And, expr, values)
    }

    /// A condition joined with `OR`.
    #[must_use]
    pub fn or<I, V>(expr: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToSqlValue,
    {
        Self::new(LogicalType::Or, expr, values)
    }

    /// Resolves a complete inline expression such as `age >= 18`.
    #[must_use]
    pub fn parse(expr: &str) -> Self {
        new_condition(LogicalType::Simple, expr, Vec::new())
    }

    /// Returns a copy joined with `logical_type`.
    #[must_use]
    pub const fn with_logical_type(mut self, logical_type: LogicalType) -> Self {
        self.logical_type = logical_type;
        self
    }

    /// Returns how the condition joins the previous one.
    #[must_use]
    pub const fn logical_type(&self) -> LogicalType {
        self.logical_type
    }

    /// Returns the field expression.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the resolved operator.
    #[must_use]
    pub const fn operator(&self) -> Option<Operator> {
        self.operator
    }

    /// Returns the values to bind.
    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    fn validate(&mut self) {
        let Some(operator) = self.operator else {
            return;
        };
        let count = self.values.len();
        let error = match operator {
            Operator::In | Operator::NotIn => match count {
                0 => Some(Error::MissingValue(operator.as_str())),
                1 => {
                    self.operator = Some(if operator == Operator::In {
                        Operator::Eq
                    } else {
                        Operator::Ne
                    });
                    None
                }
                _ if !are_compatible_types(&self.values) => Some(Error::IncompatibleTypes {
                    operator: operator.as_str(),
                }),
                _ => None,
            },
            Operator::Between if count != 2 => Some(Error::BetweenArity(count)),
            Operator::Between if !are_compatible_types(&self.values) => {
                Some(Error::IncompatibleTypes {
                    operator: operator.as_str(),
                })
            }
            _ if count == 0 => Some(Error::MissingValue(operator.as_str())),
            _ => None,
        };
        if self.error.is_none() {
            self.error = error;
        }
    }

    /// Renders the condition, binding its values.
    ///
    /// `NULL` compared with `=`, `!=` or `<>` becomes `IS NULL` or
    /// `IS NOT NULL` and binds nothing. Scalar operators bind only the first
    /// value.
    pub fn render(&self, binder: &mut ParamBinder<'_>) -> String {
        let field = quote_reference(binder.dialect(), &self.field);
        let Some(operator) = self.operator else {
            return field;
        };
        match (operator, self.values.as_slice()) {
            (Operator::In | Operator::NotIn, values) => {
                let placeholders = binder.bind_many(values);
                format!("{field} {operator} ({})", placeholders.join(", "))
            }
            (Operator::Between, [low, high, ..]) => {
                let low = binder.bind(low);
                let high = binder.bind(high);
                format!("{field} BETWEEN {low} AND {high}")
            }
            (Operator::Eq, [SqlValue::Null, ..]) => format!("{field} IS NULL"),
            (Operator::Ne | Operator::NotEqual, [SqlValue::Null, ..]) => {
                format!("{field} IS NOT NULL")
            }
            (_, [first, ..]) => format!("{field} {operator} {}", binder.bind(first)),
            (_, []) => format!("{field} {operator}"),
        }
    }
}

impl Validatable for Condition {
    fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    fn is_valid(&self) -> bool {
        !self.field.is_empty()
            && self.operator.is_some()
            && !self.values.is_empty()
            && self.error.is_none()
    }
}

impl fmt::Display for Condition {
    /// Writes the condition with values inlined, for diagnostics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(operator) = self.operator else {
            return f.write_str(&self.field);
        };
        let inline: Vec<String> = self.values.iter().map(SqlValue::to_sql_inline).collect();
        match operator {
            Operator::In | Operator::NotIn => {
                write!(f, "{} {operator} ({})", self.field, inline.join(", "))
            }
            Operator::Between => write!(f, "{} BETWEEN {}", self.field, inline.join(" AND ")),
            _ => write!(
                f,
                "{} {operator} {}",
                self.field,
                inline.first().map_or("", String::as_str)
            ),
        }
    }
}

/// Renders conditions joined by their connectives.
///
/// The first condition's connective is dropped. Callers are expected to
/// have rejected invalid conditions already.
pub fn render_conditions(conditions: &[Condition], binder: &mut ParamBinder<'_>) -> String {
    let mut sql = String::new();
    for (i, cond) in conditions.iter().enumerate() {
        if i > 0 {
            sql.push_str(cond.logical_type.connective());
        }
        sql.push_str(&cond.render(binder));
    }
    sql
}
