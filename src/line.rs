//! Key/value line parsing.
//!
//! A value-bearing line has the shape `key = value1, value2, ... ; comment`.
//! The key ends at the first unquoted `=`, the value side is split on
//! unquoted commas, and an unquoted `;` ends the value list.

use crate::error::{InfError, Result};
use crate::quoted::{has_unterminated_quote, index_of_unquoted, split_ignoring_quoted};

/// A line split into its key and comma-separated values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyValuesLine {
    /// Trimmed text before the first unquoted `=`.
    pub key: String,

    /// Trimmed values after the `=`, in order.
    pub values: Vec<String>,
}

impl KeyValuesLine {
    /// Parses a line, tolerating lines without `=`.
    ///
    /// A line without an unquoted `=` yields the whole trimmed line as the
    /// key and no values, which is how plain list sections
    /// (`[SourceDisksFiles]` entries, `[Manufacturer]` shorthand) read.
    ///
    /// ```rust
    /// use inf_parser::KeyValuesLine;
    ///
    /// let line = KeyValuesLine::parse(r#"%Intel% = Intel, NTx86.5.1 ; vendor"#);
    /// assert_eq!(line.key, "%Intel%");
    /// assert_eq!(line.values, vec!["Intel", "NTx86.5.1"]);
    /// ```
    pub fn parse(line: &str) -> Self {
        match index_of_unquoted(line, '=', 0) {
            Some(index) => Self {
                key: line[..index].trim().to_string(),
                values: comma_separated_values(&line[index + 1..]),
            },
            None => Self {
                key: line.trim().to_string(),
                values: Vec::new(),
            },
        }
    }

    /// Parses a line that must carry a value.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` if the line has no unquoted `=` or ends
    /// inside a quoted span.
    pub fn parse_strict(line: &str) -> Result<Self> {
        if has_unterminated_quote(line) {
            return Err(InfError::malformed(format!("unterminated quote in line '{}'", line)));
        }
        if index_of_unquoted(line, '=', 0).is_none() {
            return Err(InfError::malformed(format!("expected '=' in line '{}'", line)));
        }
        Ok(Self::parse(line))
    }

    /// Returns the value at `index`, or an empty string if there is none.
    pub fn value(&self, index: usize) -> &str {
        try_get_value(&self.values, index)
    }

    /// Returns true if the key matches, ignoring ASCII case.
    pub fn has_key(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }
}

/// Splits a value string on unquoted commas.
///
/// An unquoted `;` ends the value (comment tail); every field is trimmed.
/// Quotes are kept on the fields.
pub fn comma_separated_values(value: &str) -> Vec<String> {
    let value = match index_of_unquoted(value, ';', 0) {
        Some(comment) => &value[..comment],
        None => value,
    };
    split_ignoring_quoted(value, ',')
        .into_iter()
        .map(|field| field.trim().to_string())
        .collect()
}

/// Returns the value at `index`, or an empty string if the list is shorter.
pub fn try_get_value<S: AsRef<str>>(values: &[S], index: usize) -> &str {
    values.get(index).map(AsRef::as_ref).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_values() {
        let line = KeyValuesLine::parse("CopyFiles = E1000.CopyFiles, Common.Files");
        assert_eq!(line.key, "CopyFiles");
        assert_eq!(line.values, vec!["E1000.CopyFiles", "Common.Files"]);
    }

    #[test]
    fn test_parse_quoted_equals_and_comment() {
        let line = KeyValuesLine::parse(r#""a=b" = "x;y", z ; trailing, comment"#);
        assert_eq!(line.key, "\"a=b\"");
        assert_eq!(line.values, vec!["\"x;y\"", "z"]);
    }

    #[test]
    fn test_parse_without_equals() {
        let line = KeyValuesLine::parse("  e1000325.sys  ");
        assert_eq!(line.key, "e1000325.sys");
        assert!(line.values.is_empty());
        assert!(KeyValuesLine::parse_strict("e1000325.sys").is_err());
    }

    #[test]
    fn test_parse_strict_unterminated_quote() {
        let err = KeyValuesLine::parse_strict(r#"DiskName = "Intel Disk"#).unwrap_err();
        assert!(matches!(err, InfError::MalformedDocument(_)));
    }

    #[test]
    fn test_empty_value_list() {
        let line = KeyValuesLine::parse("Key =");
        assert_eq!(line.values, vec![""]);
        assert_eq!(line.value(0), "");
        assert_eq!(line.value(3), "");
    }

    #[test]
    fn test_hash_is_not_a_value_comment() {
        assert_eq!(comma_separated_values("Vendor#1, b"), vec!["Vendor#1", "b"]);
    }
}
