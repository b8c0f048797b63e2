//! Expression parser.
//!
//! Pure, total functions that split loosely written expressions into their
//! parts: `users.id AS uid` into a base and an alias, `users.id` into a
//! table and a column, `age >= 18` into a field, an operator and the rest.
//! Nothing here fails; validation is left to [`Token`](crate::Token) and
//! [`Condition`](crate::Condition).

mod alias;
mod condition;
mod scan;

pub(crate) use alias::{has_top_level_comma, is_as_keyword};
pub use alias::{parse_alias, parse_table_column};
pub use condition::{
    contains_placeholder, extract_condition_parts, split_between, split_list, ConditionParts,
    OPERATOR_PRECEDENCE,
};
