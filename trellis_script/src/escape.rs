// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Escaping for text interpolated into script string literals.

use alloc::string::String;

/// Escape `text` for embedding inside a quoted script string literal.
///
/// Handles both quote styles plus backslashes and line breaks, so the result
/// is safe inside `"…"` and `'…'` alike. Other control characters pass
/// through untouched; documents treat them as literal text.
///
/// ```rust
/// use trellis_script::escape::escape_text;
///
/// assert_eq!(escape_text(r#"He said "hi""#), r#"He said \"hi\""#);
/// assert_eq!(escape_text("a\nb"), r"a\nb");
/// ```
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(escape_text("Hello world"), "Hello world");
    }

    #[test]
    fn quotes_and_backslashes_are_escaped() {
        assert_eq!(escape_text(r#"a"b"#), r#"a\"b"#);
        assert_eq!(escape_text("a'b"), r"a\'b");
        assert_eq!(escape_text(r"a\b"), r"a\\b");
    }

    #[test]
    fn backslash_escapes_before_quotes_do_not_double_up() {
        // A backslash followed by a quote must escape to four characters.
        assert_eq!(escape_text("\\\""), "\\\\\\\"");
    }

    #[test]
    fn line_breaks_become_escape_sequences() {
        assert_eq!(escape_text("a\nb\rc"), r"a\nb\rc");
    }

    #[test]
    fn non_ascii_text_passes_through() {
        assert_eq!(escape_text("héllo — 世界"), "héllo — 世界");
    }
}
