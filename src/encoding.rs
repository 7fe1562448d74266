//! Byte encoding detection and round-tripping.
//!
//! Setup files are mostly single-byte text, but localized Windows editions
//! and some vendor drivers ship UTF-16 or UTF-8 files with a byte-order mark.
//! The encoding is picked once when a document is loaded and reused verbatim
//! when it is saved; a BOM is kept in the text as U+FEFF so it is written
//! back unchanged.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use encoding_rs::{mem, UTF_16BE, UTF_16LE, UTF_8};
use tracing::{debug, warn};

/// UTF-8 byte-order mark.
pub const UTF8_BOM: &[u8; 3] = &[0xEF, 0xBB, 0xBF];

/// UTF-16 little-endian byte-order mark.
pub const UTF16LE_BOM: &[u8; 2] = &[0xFF, 0xFE];

/// UTF-16 big-endian byte-order mark.
pub const UTF16BE_BOM: &[u8; 2] = &[0xFE, 0xFF];

/// Text encoding of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextEncoding {
    /// 7-bit ASCII, used for documents created from scratch.
    #[default]
    Ascii,

    /// ISO-8859-1, the fallback for files without a byte-order mark.
    ///
    /// Every byte maps to exactly one character, so OEM and ANSI code page
    /// text survives a load/save cycle untouched.
    Latin1,

    /// UTF-8 (BOM `EF BB BF`).
    Utf8,

    /// UTF-16 little endian (BOM `FF FE`).
    Utf16Le,

    /// UTF-16 big endian (BOM `FE FF`).
    Utf16Be,
}

impl TextEncoding {
    /// Detects the encoding from a byte-order mark, defaulting to Latin-1.
    pub fn detect(bytes: &[u8]) -> Self {
        let encoding = if bytes.starts_with(UTF8_BOM) {
            TextEncoding::Utf8
        } else if bytes.starts_with(UTF16LE_BOM) {
            TextEncoding::Utf16Le
        } else if bytes.starts_with(UTF16BE_BOM) {
            TextEncoding::Utf16Be
        } else {
            TextEncoding::Latin1
        };
        debug!(encoding = encoding.name(), "Detected document encoding");
        encoding
    }

    /// Returns a display name for this encoding.
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Ascii => "ascii",
            TextEncoding::Latin1 => "iso-8859-1",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf16Le => "utf-16le",
            TextEncoding::Utf16Be => "utf-16be",
        }
    }

    /// Decodes bytes to text, keeping any byte-order mark as U+FEFF.
    ///
    /// Malformed sequences are replaced with U+FFFD.
    pub fn decode(&self, bytes: &[u8]) -> String {
        let (text, had_errors) = match self {
            TextEncoding::Ascii | TextEncoding::Latin1 => (mem::decode_latin1(bytes), false),
            TextEncoding::Utf8 => UTF_8.decode_without_bom_handling(bytes),
            TextEncoding::Utf16Le => UTF_16LE.decode_without_bom_handling(bytes),
            TextEncoding::Utf16Be => UTF_16BE.decode_without_bom_handling(bytes),
        };
        if had_errors {
            warn!(encoding = self.name(), "Malformed byte sequences replaced while decoding");
        }
        text.into_owned()
    }

    /// Encodes text to bytes.
    ///
    /// Characters the single-byte encodings cannot represent become `?`.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Ascii => {
                if !text.is_ascii() {
                    warn!("Non-ASCII characters replaced while encoding");
                }
                text.chars()
                    .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                    .collect()
            }
            TextEncoding::Latin1 => {
                if mem::is_str_latin1(text) {
                    mem::encode_latin1_lossy(text).into_owned()
                } else {
                    warn!("Characters outside ISO-8859-1 replaced while encoding");
                    text.chars()
                        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                        .collect()
                }
            }
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Utf16Le | TextEncoding::Utf16Be => {
                let units: Vec<u16> = text.encode_utf16().collect();
                let mut bytes = vec![0u8; units.len() * 2];
                if *self == TextEncoding::Utf16Le {
                    LittleEndian::write_u16_into(&units, &mut bytes);
                } else {
                    BigEndian::write_u16_into(&units, &mut bytes);
                }
                bytes
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(TextEncoding::detect(b"\xEF\xBB\xBF[Version]"), TextEncoding::Utf8);
        assert_eq!(TextEncoding::detect(b"\xFF\xFE[\0"), TextEncoding::Utf16Le);
        assert_eq!(TextEncoding::detect(b"\xFE\xFF\0["), TextEncoding::Utf16Be);
        assert_eq!(TextEncoding::detect(b"[Version]"), TextEncoding::Latin1);
        assert_eq!(TextEncoding::detect(b""), TextEncoding::Latin1);
    }

    #[test]
    fn test_latin1_round_trip_preserves_high_bytes() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let text = TextEncoding::Latin1.decode(&bytes);
        assert_eq!(text.chars().count(), 256);
        assert_eq!(TextEncoding::Latin1.encode(&text), bytes);
    }

    #[test]
    fn test_utf16le_keeps_bom() {
        let bytes = b"\xFF\xFEA\0\r\0\n\0".to_vec();
        let text = TextEncoding::Utf16Le.decode(&bytes);
        assert_eq!(text, "\u{FEFF}A\r\n");
        assert_eq!(TextEncoding::Utf16Le.encode(&text), bytes);
    }

    #[test]
    fn test_utf16be_round_trip() {
        let bytes = b"\xFE\xFF\0A\0B".to_vec();
        let text = TextEncoding::Utf16Be.decode(&bytes);
        assert_eq!(text, "\u{FEFF}AB");
        assert_eq!(TextEncoding::Utf16Be.encode(&text), bytes);
    }

    #[test]
    fn test_utf8_keeps_bom() {
        let bytes = "\u{FEFF}caf\u{e9}".as_bytes().to_vec();
        let text = TextEncoding::Utf8.decode(&bytes);
        assert!(text.starts_with('\u{FEFF}'));
        assert_eq!(TextEncoding::Utf8.encode(&text), bytes);
    }

    #[test]
    fn test_unrepresentable_characters() {
        assert_eq!(TextEncoding::Ascii.encode("a\u{e9}"), b"a?");
        assert_eq!(TextEncoding::Latin1.encode("a\u{e9}\u{20ac}"), b"a\xE9?");
    }
}
