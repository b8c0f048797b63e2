//! Inline condition parsing: operator extraction and literal splitting.

use std::sync::LazyLock;

use regex::Regex;

use super::scan::Layout;
use crate::condition::Operator;

/// Operators in the order they are searched for.
///
/// Longer operators come before their prefixes so `NOT IN` is never read as
/// `IN` and `>=` never as `>`.
pub const OPERATOR_PRECEDENCE: [Operator; 12] = [
    Operator::NotIn,
    Operator::In,
    Operator::Between,
    Operator::NotEqual,
    Operator::Ne,
    Operator::Gte,
    Operator::Lte,
    Operator::NotLike,
    Operator::Like,
    Operator::Eq,
    Operator::Gt,
    Operator::Lt,
];

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\?|(?:^|[^:\w]):[A-Za-z_]\w*|\$\d+").expect("placeholder pattern is valid")
});

/// The pieces of an inline condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionParts {
    /// Text before the operator.
    pub field: String,
    /// The operator found.
    pub operator: Operator,
    /// Text after the operator, trimmed.
    pub remainder: String,
}

/// Splits an inline condition such as `age >= 18` at its operator.
///
/// Operators are tried in [`OPERATOR_PRECEDENCE`] order; the first one found
/// outside quotes and parentheses wins. Keyword operators must be preceded
/// by whitespace and followed by whitespace, `(` or the end of input.
/// Symbolic operators only need to be clear of other operator characters,
/// so `age>=18` also splits. A match with nothing before it is ignored.
#[must_use]
pub fn extract_condition_parts(input: &str) -> Option<ConditionParts> {
    let input = input.trim();
    let layout = Layout::new(input);

    for operator in OPERATOR_PRECEDENCE {
        let pattern = operator.as_str();
        let keyword = pattern.as_bytes()[0].is_ascii_alphabetic();
        let mut from = 0;
        while let Some((start, end)) = layout.find(pattern, from) {
            from = start + 1;
            let bounded = if keyword {
                keyword_bounded(&layout, start, end)
            } else {
                symbol_bounded(&layout, start, end)
            };
            let field = input[..start].trim();
            if bounded && !field.is_empty() {
                return Some(ConditionParts {
                    field: String::from(field),
                    operator,
                    remainder: String::from(input[end..].trim()),
                });
            }
        }
    }
    None
}

fn keyword_bounded(layout: &Layout, start: usize, end: usize) -> bool {
    let left = start > 0 && layout.byte(start - 1).is_ascii_whitespace();
    let right = end == layout.len() || {
        let b = layout.byte(end);
        b.is_ascii_whitespace() || b == b'('
    };
    left && right
}

fn symbol_bounded(layout: &Layout, start: usize, end: usize) -> bool {
    let is_op = |b: u8| matches!(b, b'<' | b'>' | b'=' | b'!');
    let left = start == 0 || !is_op(layout.byte(start - 1));
    let right = end == layout.len() || !is_op(layout.byte(end));
    left && right
}

/// Reports whether `text` contains an unbound placeholder.
///
/// Recognizes `?`, `:name` and `$1` style markers outside quoted literals.
/// PostgreSQL casts (`x::int`) are not placeholders.
#[must_use]
pub fn contains_placeholder(text: &str) -> bool {
    PLACEHOLDER.is_match(Layout::new(text).masked_str())
}

/// Splits an inline `IN` list such as `(1, 2, 'three')` into literals.
///
/// Surrounding parentheses are optional.
#[must_use]
pub fn split_list(text: &str) -> Vec<String> {
    let text = text.trim();
    let inner = strip_parens(text).unwrap_or(text);
    let layout = Layout::new(inner);
    layout
        .split(inner, |b| b == b',')
        .into_iter()
        .map(String::from)
        .collect()
}

/// Splits an inline `BETWEEN` operand such as `10 AND 20` into its bounds.
///
/// Returns a single element when no top-level `AND` is present.
#[must_use]
pub fn split_between(text: &str) -> Vec<String> {
    let text = text.trim();
    let layout = Layout::new(text);
    let mut from = 0;
    while let Some((start, end)) = layout.find(" AND ", from) {
        from = start + 1;
        let low = text[..start].trim();
        let high = text[end..].trim();
        if !low.is_empty() && !high.is_empty() {
            return vec![String::from(low), String::from(high)];
        }
    }
    if text.is_empty() {
        Vec::new()
    } else {
        vec![String::from(text)]
    }
}

/// Strips one pair of parentheses enclosing the whole text.
fn strip_parens(text: &str) -> Option<&str> {
    let inner = text.strip_prefix('(')?.strip_suffix(')')?;
    // "(a) + (b)" starts and ends with parens that do not enclose everything.
    let layout = Layout::new(text);
    let closes_early =
        (1..layout.len() - 1).any(|i| layout.byte(i) == b')' && layout.is_top_level(i));
    if closes_early {
        None
    } else {
        Some(inner)
    }
}
