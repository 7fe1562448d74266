//! Quote-aware string tokenizing.
//!
//! INF values quote with plain double quotes and no backslash escaping. A
//! quote character simply toggles the "inside quotes" state, so a doubled
//! `""` inside a quoted span toggles twice and never ends the span early.

/// The quote character used by INF documents.
pub const QUOTE: char = '"';

/// Returns the byte index of the first occurrence of `ch` at or after `start`
/// that is not inside a quoted span.
///
/// Quoting state is tracked from `start`, not from the beginning of `s`.
///
/// ```rust
/// use inf_parser::quoted::index_of_unquoted;
///
/// assert_eq!(index_of_unquoted(r#""a;b";c"#, ';', 0), Some(5));
/// assert_eq!(index_of_unquoted(r#""a;b""#, ';', 0), None);
/// ```
pub fn index_of_unquoted(s: &str, ch: char, start: usize) -> Option<usize> {
    let tail = s.get(start..)?;
    let mut in_quotes = false;
    for (offset, c) in tail.char_indices() {
        if c == QUOTE {
            in_quotes = !in_quotes;
        } else if !in_quotes && c == ch {
            return Some(start + offset);
        }
    }
    None
}

/// Splits `s` on every unquoted `separator`.
///
/// The last field is whatever follows the last separator, so a trailing
/// separator yields an empty final field. Fields are not trimmed.
///
/// ```rust
/// use inf_parser::quoted::split_ignoring_quoted;
///
/// assert_eq!(split_ignoring_quoted(r#"a,"b,c",d"#, ','), vec!["a", r#""b,c""#, "d"]);
/// assert_eq!(split_ignoring_quoted("a,", ','), vec!["a", ""]);
/// ```
pub fn split_ignoring_quoted(s: &str, separator: char) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut field_start = 0;
    while let Some(index) = index_of_unquoted(s, separator, field_start) {
        fields.push(&s[field_start..index]);
        field_start = index + separator.len_utf8();
    }
    fields.push(&s[field_start..]);
    fields
}

/// Wraps `s` in a pair of double quotes.
pub fn quote(s: &str) -> String {
    format!("{QUOTE}{s}{QUOTE}")
}

/// Strips one pair of surrounding double quotes, if both are present.
///
/// Input that is not quoted is returned unchanged.
pub fn unquote(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with(QUOTE) && s.ends_with(QUOTE) {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Returns true if `s` ends inside a quoted span.
pub fn has_unterminated_quote(s: &str) -> bool {
    s.chars().filter(|&c| c == QUOTE).count() % 2 != 0
}
