//! Error types for INF document operations.
//!
//! This module provides the error kinds surfaced by the document engine:
//! I/O failures, registry value codec failures, missing lookups and broken
//! document structure. The engine never terminates the process itself; the
//! caller decides which of these are fatal.

use crate::value::RegistryValueKind;
use std::io;
use thiserror::Error;

/// Result type alias for INF document operations.
pub type Result<T> = std::result::Result<T, InfError>;

/// Errors that can occur while reading, querying or editing INF documents.
#[derive(Error, Debug)]
pub enum InfError {
    /// I/O error occurred while reading or writing a document.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Registry value data could not be decoded or encoded.
    #[error("Invalid registry value data: {0}")]
    Decode(String),

    /// No codec exists for the requested registry value kind.
    #[error("Registry value kind not implemented: {0}")]
    NotImplemented(RegistryValueKind),

    /// The value supplied for encoding does not match the requested kind.
    #[error("Invalid argument: cannot encode a {found} value as {kind}")]
    InvalidArgument {
        /// Kind requested by the caller.
        kind: RegistryValueKind,
        /// Kind of the value actually supplied.
        found: RegistryValueKind,
    },

    /// The registry value kind has no AddReg type flag.
    #[error("Registry value kind {0} has no AddReg representation")]
    Unrepresentable(RegistryValueKind),

    /// Key, line, section or token not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An expected structural element is missing or broken.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// A section-name pattern failed to compile.
    #[error("Invalid section pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The cabinet collaborator failed to pack or unpack a document.
    #[error("Cabinet error: {0}")]
    Cabinet(String),
}

impl InfError {
    /// Creates a not found error with context about what was being searched.
    ///
    /// # Arguments
    ///
    /// * `item_type` - Type of item (e.g., "section", "token")
    /// * `name` - Name of the item that wasn't found
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use inf_parser::error::InfError;
    /// let err = InfError::not_found("token", "DiskName");
    /// assert_eq!(err.to_string(), "Not found: token 'DiskName'");
    /// ```
    pub fn not_found(item_type: &str, name: &str) -> Self {
        Self::NotFound(format!("{} '{}'", item_type, name))
    }

    /// Creates a malformed document error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument(message.into())
    }

    /// Creates a value data decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Returns true for the registry value codec failures
    /// (`Decode`, `NotImplemented`, `InvalidArgument`, `Unrepresentable`).
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::Decode(_)
                | Self::NotImplemented(_)
                | Self::InvalidArgument { .. }
                | Self::Unrepresentable(_)
        )
    }

    /// Returns true if the error reports an absent key, line, section or token.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
