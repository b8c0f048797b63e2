//! Lexical layout shared by the expression parsers.
//!
//! Expressions are scanned byte-wise. Quoted regions (`'...'`, `"..."`,
//! `` `...` ``) are masked so separators and operators inside literals or
//! quoted identifiers are never matched, and parenthesis depth is tracked so
//! only top-level text is split.

/// Byte used in place of every quoted byte.
const MASK: u8 = b'#';

/// A masked view of an expression with per-byte nesting depth.
///
/// Byte offsets in the layout are identical to offsets in the original
/// string, so ranges found here slice the input directly.
pub(crate) struct Layout {
    masked: Vec<u8>,
    depth: Vec<u32>,
}

impl Layout {
    pub(crate) fn new(input: &str) -> Self {
        let mut masked = Vec::with_capacity(input.len());
        let mut quote: Option<u8> = None;
        for &b in input.as_bytes() {
            match quote {
                Some(q) => {
                    masked.push(MASK);
                    if b == q {
                        quote = None;
                    }
                }
                None if matches!(b, b'\'' | b'"' | b'`') => {
                    masked.push(MASK);
                    quote = Some(b);
                }
                None => masked.push(b),
            }
        }

        let mut depth = Vec::with_capacity(masked.len());
        let mut level = 0_u32;
        for &b in &masked {
            if b == b')' {
                level = level.saturating_sub(1);
            }
            depth.push(level);
            if b == b'(' {
                level += 1;
            }
        }

        Self { masked, depth }
    }

    pub(crate) fn len(&self) -> usize {
        self.masked.len()
    }

    pub(crate) fn byte(&self, i: usize) -> u8 {
        self.masked[i]
    }

    /// Returns true when byte `i` is outside quotes and parentheses.
    pub(crate) fn is_top_level(&self, i: usize) -> bool {
        self.depth[i] == 0 && self.masked[i] != MASK
    }

    /// Returns the masked text; quoted bytes read as `#`.
    pub(crate) fn masked_str(&self) -> &str {
        // Every byte of a quoted char is replaced and quote delimiters are
        // ASCII, so the buffer stays valid UTF-8.
        std::str::from_utf8(&self.masked).unwrap_or_default()
    }

    /// Splits `input` at top-level bytes matching `is_sep`.
    ///
    /// Runs of separators count once; empty pieces are dropped and every
    /// piece is trimmed.
    pub(crate) fn split<'a>(&self, input: &'a str, is_sep: impl Fn(u8) -> bool) -> Vec<&'a str> {
        let mut pieces = Vec::new();
        let mut start = 0;
        for i in 0..self.len() {
            if self.is_top_level(i) && is_sep(self.masked[i]) {
                push_piece(&mut pieces, &input[start..i]);
                start = i + 1;
            }
        }
        push_piece(&mut pieces, &input[start..]);
        pieces
    }

    /// Finds the first top-level occurrence of `pattern` at or after `from`.
    ///
    /// Matching is ASCII case-insensitive; a space in `pattern` matches one
    /// or more whitespace bytes. Returns the matched byte range.
    pub(crate) fn find(&self, pattern: &str, from: usize) -> Option<(usize, usize)> {
        (from..self.len())
            .filter(|&i| self.is_top_level(i))
            .find_map(|i| self.match_at(pattern.as_bytes(), i).map(|end| (i, end)))
    }

    fn match_at(&self, pattern: &[u8], start: usize) -> Option<usize> {
        let mut i = start;
        let mut p = 0;
        while p < pattern.len() {
            if pattern[p] == b' ' {
                let run_start = i;
                while i < self.len() && self.masked[i].is_ascii_whitespace() {
                    i += 1;
                }
                if i == run_start {
                    return None;
                }
            } else {
                if i >= self.len() || !self.masked[i].eq_ignore_ascii_case(&pattern[p]) {
                    return None;
                }
                i += 1;
            }
            p += 1;
        }
        Some(i)
    }
}

fn push_piece<'a>(pieces: &mut Vec<&'a str>, piece: &'a str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        pieces.push(piece);
    }
}
