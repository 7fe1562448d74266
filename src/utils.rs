//! Utility functions for line scanning and string comparison.

/// Line terminator used for every line the engine writes.
pub const NEWLINE: &str = "\r\n";

/// Legacy end-of-file marker (Ctrl-Z) found at the end of some setup files.
pub const EOF_MARKER: char = '\u{1A}';

/// Iterator over physical lines, yielding `(content, terminator)` pairs.
///
/// A line ends at `\r\n`, `\r` or `\n`. A terminator at the very end of the
/// text does not start an extra empty line, and the final line's terminator
/// is empty when the text does not end with one.
#[derive(Debug, Clone)]
pub struct PhysicalLines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for PhysicalLines<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let Some(pos) = self.rest.find(['\r', '\n']) else {
            let line = self.rest;
            self.rest = "";
            return Some((line, ""));
        };

        let bytes = self.rest.as_bytes();
        let end = if bytes[pos] == b'\r' && bytes.get(pos + 1) == Some(&b'\n') {
            pos + 2
        } else {
            pos + 1
        };
        let item = (&self.rest[..pos], &self.rest[pos..end]);
        self.rest = &self.rest[end..];
        Some(item)
    }
}

/// Splits text into physical lines with their terminators.
pub fn physical_lines(text: &str) -> PhysicalLines<'_> {
    PhysicalLines { rest: text }
}

/// Byte-order mark as it appears in decoded text.
pub const BOM: char = '\u{FEFF}';

/// Returns the line with leading spaces (not tabs) removed.
///
/// A byte-order mark is skipped too, so the first line of a UTF-8 or
/// UTF-16 document reads like any other.
#[inline]
pub fn trim_leading_spaces(line: &str) -> &str {
    line.trim_start_matches([' ', BOM])
}

/// Returns true if the line is a section header.
pub fn is_section_header(line: &str) -> bool {
    trim_leading_spaces(line).starts_with('[')
}

/// Returns true if the line is a whole-line comment.
pub fn is_comment(line: &str) -> bool {
    let trimmed = trim_leading_spaces(line);
    trimmed.starts_with(';') || trimmed.starts_with('#')
}

/// Returns true if the line is blank or holds nothing but the EOF marker.
pub fn is_blank(line: &str) -> bool {
    line.trim().trim_matches(EOF_MARKER).trim().is_empty()
}

/// Returns true if the value continues on the next physical line.
#[inline]
pub fn is_broken_line(line: &str) -> bool {
    line.ends_with('\\')
}

/// ASCII case-insensitive `starts_with`.
pub fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Returns true if the line opens the named section.
///
/// The header may be followed by a comment, e.g. `[Version] ; comment`.
pub fn is_header_of(line: &str, section_name: &str) -> bool {
    let Some(rest) = trim_leading_spaces(line).strip_prefix('[') else {
        return false;
    };
    starts_with_ignore_case(rest, section_name) && rest[section_name.len()..].starts_with(']')
}

/// Extracts the bracketed name from a header line.
///
/// Returns `None` when there is no closing bracket or the name is empty.
pub fn section_name_of(line: &str) -> Option<&str> {
    let start = line.find('[')? + 1;
    let end = start + line[start..].find(']')?;
    if end > start {
        Some(&line[start..end])
    } else {
        None
    }
}

/// Returns true if `list` holds `value`, ignoring ASCII case.
pub fn contains_ignore_case<S: AsRef<str>>(list: &[S], value: &str) -> bool {
    list.iter().any(|item| item.as_ref().eq_ignore_ascii_case(value))
}
