//! Alias and qualifier splitting.

use super::scan::Layout;

/// Splits an expression into `(base, alias)`.
///
/// The last top-level `AS` keyword wins (`CAST(x AS INT) AS n` aliases the
/// cast). Without one, an input made of exactly two whitespace- or
/// comma-separated tokens is read as `base alias` (`users u`). Anything
/// else has no alias. Both parts are trimmed; the function never fails.
#[must_use]
pub fn parse_alias(input: &str) -> (String, String) {
    let input = input.trim();
    let layout = Layout::new(input);

    let mut last_as = None;
    let mut from = 0;
    while let Some((start, end)) = layout.find("AS", from) {
        let bounded_left = start > 0 && layout.byte(start - 1).is_ascii_whitespace();
        let bounded_right = end < layout.len() && layout.byte(end).is_ascii_whitespace();
        if bounded_left && bounded_right {
            last_as = Some((start, end));
        }
        from = start + 1;
    }
    if let Some((start, end)) = last_as {
        let base = input[..start].trim();
        let alias = input[end..].trim();
        if !base.is_empty() && !alias.is_empty() {
            return (String::from(base), String::from(alias));
        }
    }

    let pieces = layout.split(input, |b| b.is_ascii_whitespace() || b == b',');
    if let [base, alias] = pieces.as_slice() {
        if !is_as_keyword(base) && !is_as_keyword(alias) {
            return (String::from(*base), String::from(*alias));
        }
    }

    (String::from(input), String::new())
}

/// Splits a possibly qualified name into `(table, column)` at the first dot.
///
/// Without a dot the table part is empty. Dots inside quoted identifiers
/// do not split.
#[must_use]
pub fn parse_table_column(input: &str) -> (String, String) {
    let input = input.trim();
    let layout = Layout::new(input);
    match (0..layout.len()).find(|&i| layout.byte(i) == b'.') {
        Some(dot) => (
            String::from(input[..dot].trim()),
            String::from(input[dot + 1..].trim()),
        ),
        None => (String::new(), String::from(input)),
    }
}

pub(crate) fn is_as_keyword(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("AS")
}

/// Reports a comma outside quotes and parentheses.
pub(crate) fn has_top_level_comma(text: &str) -> bool {
    let layout = Layout::new(text);
    (0..layout.len()).any(|i| layout.byte(i) == b',' && layout.is_top_level(i))
}
