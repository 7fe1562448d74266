//! AddReg directive lines.
//!
//! The setup hives of a Windows installation source (`hivesys.inf`,
//! `hivesft.inf`, ...) are not registry files but INF documents whose
//! `[AddReg]` sections list every value to create:
//!
//! ```text
//! HKLM,"SYSTEM\CurrentControlSet\Services\E1000","Start",0x00010001,0
//! ```
//!
//! This module reads and rewrites such lines so the hives can be edited
//! as if they were registry keys.

use crate::document::{LineMatch, TextDocument};
use crate::error::{InfError, Result};
use crate::quoted::{index_of_unquoted, quote, split_ignoring_quoted, unquote};
use crate::value::{parse_type_flags, RegistryValue, RegistryValueKind};
use std::fmt;
use tracing::debug;

/// Root key of an AddReg line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegistryRoot {
    /// `HKLM` - HKEY_LOCAL_MACHINE.
    LocalMachine,
    /// `HKR` - the key associated with the device or service being installed.
    Relative,
    /// `HKCR` - HKEY_CLASSES_ROOT.
    ClassesRoot,
    /// `HKCU` - HKEY_CURRENT_USER.
    CurrentUser,
}

impl RegistryRoot {
    /// Parses a root abbreviation, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HKLM" => Some(RegistryRoot::LocalMachine),
            "HKR" => Some(RegistryRoot::Relative),
            "HKCR" => Some(RegistryRoot::ClassesRoot),
            "HKCU" => Some(RegistryRoot::CurrentUser),
            _ => None,
        }
    }

    /// Returns the abbreviation written in INF files.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            RegistryRoot::LocalMachine => "HKLM",
            RegistryRoot::Relative => "HKR",
            RegistryRoot::ClassesRoot => "HKCR",
            RegistryRoot::CurrentUser => "HKCU",
        }
    }
}

impl fmt::Display for RegistryRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// One AddReg line: `root,"subkey","value name",flags,data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddRegEntry {
    /// Root key.
    pub root: RegistryRoot,

    /// Subkey path below the root, unquoted.
    pub sub_key: String,

    /// Value name, unquoted. Empty for the default value.
    pub value_name: String,

    /// AddReg flags.
    pub flags: u32,

    /// Raw value data, trimmed, quotes kept.
    pub data: String,
}

impl AddRegEntry {
    /// Parses an AddReg line. Continuation lines must already be joined.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` if the root is not a known abbreviation
    /// and `Decode` if the flags field is not a number.
    ///
    /// ```rust
    /// use inf_parser::{AddRegEntry, RegistryRoot, RegistryValue};
    ///
    /// let entry = AddRegEntry::parse(r#"HKR,"Ndi","Service",0,"E1000" ; comment"#).unwrap();
    /// assert_eq!(entry.root, RegistryRoot::Relative);
    /// assert_eq!(entry.sub_key, "Ndi");
    /// assert_eq!(entry.value().unwrap(), RegistryValue::String("E1000".into()));
    /// ```
    pub fn parse(line: &str) -> Result<Self> {
        let line = strip_comment(line);
        let fields = split_ignoring_quoted(line, ',');
        let root_field = fields[0].trim();
        let root = RegistryRoot::parse(root_field).ok_or_else(|| {
            InfError::malformed(format!("unknown registry root '{}'", root_field))
        })?;

        let field = |index: usize| fields.get(index).map(|f| unquote(f.trim())).unwrap_or("");
        let flags = parse_type_flags(field(3))?;
        let data = data_offset(line)
            .map(|offset| line[offset..].trim())
            .unwrap_or("");

        Ok(Self {
            root,
            sub_key: field(1).to_string(),
            value_name: field(2).to_string(),
            flags,
            data: data.to_string(),
        })
    }

    /// Creates an entry holding `value`.
    ///
    /// # Errors
    ///
    /// Returns `Unrepresentable` for a QWord value and `InvalidArgument` for
    /// an unknown one.
    pub fn new(
        root: RegistryRoot,
        sub_key: &str,
        value_name: &str,
        value: &RegistryValue,
    ) -> Result<Self> {
        let flags = value.kind().type_flags()?;
        Ok(Self {
            root,
            sub_key: sub_key.to_string(),
            value_name: value_name.to_string(),
            flags,
            data: value.to_inf_data()?,
        })
    }

    /// Returns the value kind selected by the flags.
    pub fn kind(&self) -> RegistryValueKind {
        RegistryValueKind::from_flags(self.flags)
    }

    /// Decodes the value data.
    ///
    /// # Errors
    ///
    /// Returns the codec error for malformed or unsupported data.
    pub fn value(&self) -> Result<RegistryValue> {
        RegistryValue::decode(&self.data, self.kind())
    }

    /// Formats the entry as an AddReg line.
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},0x{:08X},{}",
            self.root,
            quote(&self.sub_key),
            quote(&self.value_name),
            self.flags,
            self.data
        )
    }

    /// Returns true if the entry addresses the given value, ignoring case.
    pub fn matches(&self, root: RegistryRoot, sub_key: &str, value_name: &str) -> bool {
        self.root == root
            && self.sub_key.eq_ignore_ascii_case(sub_key)
            && self.value_name.eq_ignore_ascii_case(value_name)
    }

    /// Returns true if the entry is under `sub_key` or one of its subkeys.
    pub fn is_under_key(&self, root: RegistryRoot, sub_key: &str) -> bool {
        if self.root != root {
            return false;
        }
        let own = self.sub_key.as_bytes();
        let key = sub_key.trim_end_matches('\\').as_bytes();
        own.len() >= key.len()
            && own[..key.len()].eq_ignore_ascii_case(key)
            && (own.len() == key.len() || own[key.len()] == b'\\')
    }
}

impl fmt::Display for AddRegEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

/// Cuts the line at an unquoted `;`.
fn strip_comment(line: &str) -> &str {
    match index_of_unquoted(line, ';', 0) {
        Some(index) => &line[..index],
        None => line,
    }
}

/// Byte offset just past the fourth unquoted comma, where the data begins.
fn data_offset(line: &str) -> Option<usize> {
    let mut start = 0;
    for _ in 0..4 {
        start = index_of_unquoted(line, ',', start)? + 1;
    }
    Some(start)
}

/// An AddReg line found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryValueMatch {
    /// Index and joined text of the line.
    pub line: LineMatch,

    /// Parsed entry.
    pub entry: AddRegEntry,
}

impl TextDocument {
    /// Finds the AddReg line for a value.
    ///
    /// Continuation lines are joined before matching. Lines that do not
    /// parse as AddReg entries are skipped.
    ///
    /// # Arguments
    ///
    /// * `section_name` - AddReg section to search (e.g. "AddReg")
    /// * `root` - Root key
    /// * `sub_key` - Subkey path, compared ignoring case
    /// * `value_name` - Value name, compared ignoring case
    pub fn find_registry_value(
        &self,
        section_name: &str,
        root: RegistryRoot,
        sub_key: &str,
        value_name: &str,
    ) -> Option<RegistryValueMatch> {
        let line = self.get_line_index(
            section_name,
            |line| {
                AddRegEntry::parse(line)
                    .map(|entry| entry.matches(root, sub_key, value_name))
                    .unwrap_or(false)
            },
            true,
        )?;
        let entry = AddRegEntry::parse(&line.line).ok()?;
        Some(RegistryValueMatch { line, entry })
    }

    /// Reads and decodes a registry value.
    ///
    /// Returns `Ok(None)` if the value is not present.
    ///
    /// # Errors
    ///
    /// Returns the codec error if the data cannot be decoded.
    pub fn registry_value(
        &self,
        section_name: &str,
        root: RegistryRoot,
        sub_key: &str,
        value_name: &str,
    ) -> Result<Option<RegistryValue>> {
        self.find_registry_value(section_name, root, sub_key, value_name)
            .map(|found| found.entry.value())
            .transpose()
    }

    /// Returns the data text of a registry value.
    ///
    /// String data is unquoted; MultiString data is returned as written.
    pub fn registry_value_text(
        &self,
        section_name: &str,
        root: RegistryRoot,
        sub_key: &str,
        value_name: &str,
    ) -> Option<String> {
        let found = self.find_registry_value(section_name, root, sub_key, value_name)?;
        let data = match found.entry.kind() {
            RegistryValueKind::MultiString => found.entry.data.as_str(),
            _ => unquote(&found.entry.data),
        };
        Some(data.to_string())
    }

    /// Writes a registry value, replacing an existing line or appending a
    /// new one to the section.
    ///
    /// # Errors
    ///
    /// Returns `Unrepresentable` for a QWord value and `InvalidArgument`
    /// for an unknown one.
    pub fn set_registry_value(
        &mut self,
        section_name: &str,
        root: RegistryRoot,
        sub_key: &str,
        value_name: &str,
        value: &RegistryValue,
    ) -> Result<()> {
        let entry = AddRegEntry::new(root, sub_key, value_name, value)?;
        match self.find_registry_value(section_name, root, sub_key, value_name) {
            Some(found) => {
                debug!(line = found.line.index, value = value_name, kind = %entry.kind(), "Replacing registry value");
                self.update_line(found.line.index, Some(&entry.to_line()), true)
            }
            None => {
                debug!(value = value_name, kind = %entry.kind(), "Adding registry value");
                self.append_line_to_section(section_name, &entry.to_line())
            }
        }
    }

    /// Replaces the data of an existing registry value.
    ///
    /// Everything up to the data field is kept as written, so the flags and
    /// quoting style of the original line survive. Continuation lines of the
    /// old value are removed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the value is not present.
    pub fn update_registry_value_data(
        &mut self,
        section_name: &str,
        root: RegistryRoot,
        sub_key: &str,
        value_name: &str,
        data: &str,
    ) -> Result<()> {
        let found = self
            .find_registry_value(section_name, root, sub_key, value_name)
            .ok_or_else(|| InfError::not_found("registry value", value_name))?;

        let head = strip_comment(&found.line.line);
        let updated = match data_offset(head) {
            Some(offset) => format!("{}{}", &head[..offset], data),
            None => {
                // pad the missing fields so the data lands in the fifth one
                let head = head.trim_end();
                let commas = split_ignoring_quoted(head, ',').len() - 1;
                format!("{}{}{}", head, ",".repeat(4usize.saturating_sub(commas)), data)
            }
        };
        self.update_line(found.line.index, Some(&updated), true)
    }

    /// Returns true if the section writes anything under `sub_key`.
    pub fn contains_registry_key(
        &self,
        section_name: &str,
        root: RegistryRoot,
        sub_key: &str,
    ) -> bool {
        self.get_line_index(
            section_name,
            |line| {
                AddRegEntry::parse(line)
                    .map(|entry| entry.is_under_key(root, sub_key))
                    .unwrap_or(false)
            },
            true,
        )
        .is_some()
    }
}
