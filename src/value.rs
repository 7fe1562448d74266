//! Registry value kinds and their INF text encoding.
//!
//! AddReg directives carry a value as a type-flags field followed by the
//! data, where the data's textual form depends on the kind the flags select:
//!
//! ```text
//! String / ExpandString   "text"
//! MultiString             "first","se""cond"      (embedded quotes doubled)
//! DWord / QWord           0x00000010              (always hexadecimal)
//! Binary                  01,AB,FF
//! ```

use crate::error::{InfError, Result};
use crate::line::comma_separated_values;
use crate::quoted::{quote, unquote, QUOTE};
use std::fmt;

/// FLG_ADDREG_TYPE_SZ
pub const FLG_ADDREG_TYPE_SZ: u32 = 0x0000_0000;
/// FLG_ADDREG_BINVALUETYPE
pub const FLG_ADDREG_BINVALUETYPE: u32 = 0x0000_0001;
/// FLG_ADDREG_TYPE_MULTI_SZ
pub const FLG_ADDREG_TYPE_MULTI_SZ: u32 = 0x0001_0000;
/// FLG_ADDREG_TYPE_EXPAND_SZ
pub const FLG_ADDREG_TYPE_EXPAND_SZ: u32 = 0x0002_0000;
/// FLG_ADDREG_TYPE_DWORD
pub const FLG_ADDREG_TYPE_DWORD: u32 = 0x0001_0001;
/// FLG_ADDREG_TYPE_NONE
pub const FLG_ADDREG_TYPE_NONE: u32 = 0x0002_0001;

/// Bits of the AddReg flags field that select the value type.
const TYPE_MASK: u32 = FLG_ADDREG_TYPE_DWORD | FLG_ADDREG_TYPE_EXPAND_SZ;

/// Registry value data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegistryValueKind {
    /// String (REG_SZ).
    String,

    /// String with environment variables (REG_EXPAND_SZ).
    ExpandString,

    /// Multiple strings (REG_MULTI_SZ).
    MultiString,

    /// 32-bit integer (REG_DWORD).
    DWord,

    /// 64-bit integer (REG_QWORD).
    QWord,

    /// Binary data (REG_BINARY).
    Binary,

    /// Any type the AddReg flags do not map to one of the above.
    Unknown,
}

impl RegistryValueKind {
    /// Maps an AddReg flags field to a value kind.
    ///
    /// Only the type-selecting bits are considered; other flag bits
    /// (`FLG_ADDREG_NOCLOBBER`, `FLG_ADDREG_APPEND`, ...) are ignored.
    pub fn from_flags(flags: u32) -> Self {
        match flags & TYPE_MASK {
            FLG_ADDREG_TYPE_SZ => RegistryValueKind::String,
            FLG_ADDREG_BINVALUETYPE => RegistryValueKind::Binary,
            FLG_ADDREG_TYPE_MULTI_SZ => RegistryValueKind::MultiString,
            FLG_ADDREG_TYPE_DWORD => RegistryValueKind::DWord,
            FLG_ADDREG_TYPE_EXPAND_SZ => RegistryValueKind::ExpandString,
            _ => RegistryValueKind::Unknown,
        }
    }

    /// Returns the AddReg type-flags literal for this kind.
    ///
    /// # Errors
    ///
    /// Returns `Unrepresentable` for `QWord`: AddReg defines no flag for it.
    pub fn type_flags_hex(&self) -> Result<&'static str> {
        match self {
            RegistryValueKind::String => Ok("0x00000000"),
            RegistryValueKind::Binary => Ok("0x00000001"),
            RegistryValueKind::MultiString => Ok("0x00010000"),
            RegistryValueKind::DWord => Ok("0x00010001"),
            RegistryValueKind::ExpandString => Ok("0x00020000"),
            RegistryValueKind::QWord => Err(InfError::Unrepresentable(*self)),
            RegistryValueKind::Unknown => Ok("0x00020001"),
        }
    }

    /// Returns the AddReg type flags for this kind.
    ///
    /// # Errors
    ///
    /// Returns `Unrepresentable` for `QWord`.
    pub fn type_flags(&self) -> Result<u32> {
        match self {
            RegistryValueKind::String => Ok(FLG_ADDREG_TYPE_SZ),
            RegistryValueKind::Binary => Ok(FLG_ADDREG_BINVALUETYPE),
            RegistryValueKind::MultiString => Ok(FLG_ADDREG_TYPE_MULTI_SZ),
            RegistryValueKind::DWord => Ok(FLG_ADDREG_TYPE_DWORD),
            RegistryValueKind::ExpandString => Ok(FLG_ADDREG_TYPE_EXPAND_SZ),
            RegistryValueKind::QWord => Err(InfError::Unrepresentable(*self)),
            RegistryValueKind::Unknown => Ok(FLG_ADDREG_TYPE_NONE),
        }
    }

    /// Returns the Windows name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            RegistryValueKind::String => "REG_SZ",
            RegistryValueKind::ExpandString => "REG_EXPAND_SZ",
            RegistryValueKind::MultiString => "REG_MULTI_SZ",
            RegistryValueKind::DWord => "REG_DWORD",
            RegistryValueKind::QWord => "REG_QWORD",
            RegistryValueKind::Binary => "REG_BINARY",
            RegistryValueKind::Unknown => "REG_NONE",
        }
    }
}

impl fmt::Display for RegistryValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses an AddReg flags field: empty, decimal, or `0x`-prefixed hex.
///
/// # Errors
///
/// Returns `Decode` if the field is not a number.
pub fn parse_type_flags(field: &str) -> Result<u32> {
    let field = field.trim();
    if field.is_empty() {
        return Ok(FLG_ADDREG_TYPE_SZ);
    }
    let parsed = match strip_hex_prefix(field) {
        Some(digits) => u32::from_str_radix(digits, 16),
        None => field.parse::<u32>(),
    };
    parsed.map_err(|e| InfError::decode(format!("invalid type flags '{}': {}", field, e)))
}

/// A typed registry value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegistryValue {
    /// String value.
    String(String),

    /// Expandable string value.
    ExpandString(String),

    /// Multiple strings.
    MultiString(Vec<String>),

    /// 32-bit integer.
    DWord(i32),

    /// 64-bit integer.
    QWord(i64),

    /// Binary data.
    Binary(Vec<u8>),

    /// Value of a type this codec does not interpret.
    Unknown,
}

impl RegistryValue {
    /// Returns the kind of this value.
    pub fn kind(&self) -> RegistryValueKind {
        match self {
            RegistryValue::String(_) => RegistryValueKind::String,
            RegistryValue::ExpandString(_) => RegistryValueKind::ExpandString,
            RegistryValue::MultiString(_) => RegistryValueKind::MultiString,
            RegistryValue::DWord(_) => RegistryValueKind::DWord,
            RegistryValue::QWord(_) => RegistryValueKind::QWord,
            RegistryValue::Binary(_) => RegistryValueKind::Binary,
            RegistryValue::Unknown => RegistryValueKind::Unknown,
        }
    }

    /// Decodes INF value data of the given kind.
    ///
    /// Numbers are always read as hexadecimal, with or without a `0x`
    /// prefix, so `10` decodes to 16. Quoted numbers and individually
    /// quoted binary bytes are accepted; some vendor drivers write them
    /// and Windows setup reads them.
    ///
    /// # Errors
    ///
    /// Returns `Decode` for malformed numbers or bytes and `NotImplemented`
    /// for `RegistryValueKind::Unknown`.
    ///
    /// ```rust
    /// use inf_parser::{RegistryValue, RegistryValueKind};
    ///
    /// let value = RegistryValue::decode(r#""10""#, RegistryValueKind::DWord).unwrap();
    /// assert_eq!(value, RegistryValue::DWord(16));
    /// ```
    pub fn decode(data: &str, kind: RegistryValueKind) -> Result<Self> {
        match kind {
            RegistryValueKind::String => Ok(RegistryValue::String(unquote(data).to_string())),
            RegistryValueKind::ExpandString => {
                Ok(RegistryValue::ExpandString(unquote(data).to_string()))
            }
            RegistryValueKind::MultiString => Ok(RegistryValue::MultiString(decode_multi_string(data))),
            RegistryValueKind::DWord => {
                let digits = unquote(data.trim());
                let value = parse_hex_u64(digits, u64::from(u32::MAX))?;
                Ok(RegistryValue::DWord(value as u32 as i32))
            }
            RegistryValueKind::QWord => {
                let digits = unquote(data.trim());
                let value = parse_hex_u64(digits, u64::MAX)?;
                Ok(RegistryValue::QWord(value as i64))
            }
            RegistryValueKind::Binary => Ok(RegistryValue::Binary(decode_binary(data)?)),
            RegistryValueKind::Unknown => Err(InfError::NotImplemented(kind)),
        }
    }

    /// Encodes this value as INF value data of the given kind.
    ///
    /// DWord and QWord values are written as `0x`-prefixed uppercase hex
    /// (`0x00000010`), not decimal, so [`RegistryValue::decode`] reads
    /// them back unchanged.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the value is not of `kind`, or if
    /// `kind` is `Unknown`.
    ///
    /// ```rust
    /// use inf_parser::{RegistryValue, RegistryValueKind};
    ///
    /// let value = RegistryValue::MultiString(vec!["a".into(), "say \"hi\"".into()]);
    /// let data = value.encode(RegistryValueKind::MultiString).unwrap();
    /// assert_eq!(data, r#""a","say ""hi""""#);
    /// ```
    pub fn encode(&self, kind: RegistryValueKind) -> Result<String> {
        let mismatch = || InfError::InvalidArgument {
            kind,
            found: self.kind(),
        };
        if self.kind() != kind {
            return Err(mismatch());
        }
        match self {
            RegistryValue::String(s) | RegistryValue::ExpandString(s) => Ok(quote(s)),
            RegistryValue::MultiString(strings) => Ok(encode_multi_string(strings)),
            RegistryValue::DWord(value) => Ok(format!("0x{:08X}", *value as u32)),
            RegistryValue::QWord(value) => Ok(format!("0x{:016X}", *value as u64)),
            RegistryValue::Binary(bytes) => Ok(encode_binary(bytes)),
            RegistryValue::Unknown => Err(mismatch()),
        }
    }

    /// Encodes this value as INF value data of its own kind.
    pub fn to_inf_data(&self) -> Result<String> {
        self.encode(self.kind())
    }
}

/// Formats strings as a MultiString data field.
///
/// Each string is quoted on its own with embedded quotes doubled; an empty
/// list is written as `""`.
pub fn encode_multi_string<S: AsRef<str>>(strings: &[S]) -> String {
    if strings.is_empty() {
        return quote("");
    }
    let doubled = format!("{QUOTE}{QUOTE}");
    strings
        .iter()
        .map(|s| quote(&s.as_ref().replace(QUOTE, &doubled)))
        .collect::<Vec<_>>()
        .join(",")
}

fn decode_multi_string(data: &str) -> Vec<String> {
    let trimmed = data.trim();
    if trimmed.is_empty() || trimmed == "\"\"" {
        return Vec::new();
    }
    let doubled = format!("{QUOTE}{QUOTE}");
    comma_separated_values(data)
        .iter()
        .map(|field| unquote(field).replace(&doubled, "\""))
        .collect()
}

fn encode_binary(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| hex::encode_upper([*byte]))
        .collect::<Vec<_>>()
        .join(",")
}

fn decode_binary(data: &str) -> Result<Vec<u8>> {
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }
    comma_separated_values(data)
        .iter()
        .map(|field| {
            let digits = unquote(field).trim();
            let digits = strip_hex_prefix(digits).unwrap_or(digits);
            if digits.is_empty() || digits.len() > 2 {
                return Err(InfError::decode(format!("invalid binary byte '{}'", field)));
            }
            u8::from_str_radix(digits, 16)
                .map_err(|e| InfError::decode(format!("invalid binary byte '{}': {}", field, e)))
        })
        .collect()
}

fn strip_hex_prefix(s: &str) -> Option<&str> {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
}

fn parse_hex_u64(s: &str, max: u64) -> Result<u64> {
    let digits = strip_hex_prefix(s.trim()).unwrap_or(s.trim());
    let value = u64::from_str_radix(digits, 16)
        .map_err(|e| InfError::decode(format!("invalid hexadecimal number '{}': {}", s, e)))?;
    if value > max {
        return Err(InfError::decode(format!("number '{}' out of range", s)));
    }
    Ok(value)
}
