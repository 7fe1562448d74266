//! Packed (single-file cabinet) documents.
//!
//! Installation media store most setup files compressed, one file per
//! cabinet, with the last character of the name replaced by `_`
//! (`hivesys.inf` ships as `hivesys.in_`). The compression itself is
//! supplied by the caller through [`CabinetCodec`].

use crate::document::TextDocument;
use crate::error::Result;
use crate::fs::{read_file, write_file};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Single-file cabinet compression.
///
/// Implementations should return [`InfError::Cabinet`](crate::InfError::Cabinet)
/// when an archive is corrupt or does not hold the expected file.
pub trait CabinetCodec {
    /// Packs `bytes` into a cabinet holding one file named `inner_file_name`.
    fn pack(&self, bytes: &[u8], inner_file_name: &str) -> Result<Vec<u8>>;

    /// Extracts the file named `inner_file_name` (ignoring case) from a cabinet.
    fn unpack(&self, bytes: &[u8], inner_file_name: &str) -> Result<Vec<u8>>;
}

/// Returns the packed-variant name of a file.
///
/// ```rust
/// use inf_parser::packed_file_name;
///
/// assert_eq!(packed_file_name("txtsetup.sif"), "txtsetup.si_");
/// ```
pub fn packed_file_name(file_name: &str) -> String {
    let mut chars = file_name.chars();
    chars.next_back();
    format!("{}_", chars.as_str())
}

impl TextDocument {
    /// Opens a packed document.
    ///
    /// # Arguments
    ///
    /// * `path` - Path of the packed file (e.g. `I386/hivesys.in_`)
    /// * `inner_file_name` - Name of the file inside the cabinet (e.g. `hivesys.inf`)
    /// * `codec` - Cabinet implementation
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, or the codec's error if the
    /// cabinet cannot be unpacked.
    #[instrument(skip(path, codec), fields(path = %path.as_ref().display()))]
    pub fn open_packed<P: AsRef<Path>>(
        path: P,
        inner_file_name: &str,
        codec: &dyn CabinetCodec,
    ) -> Result<Self> {
        let packed = read_file(&path)?;
        let bytes = codec.unpack(&packed, inner_file_name)?;
        debug!(packed = packed.len(), unpacked = bytes.len(), "Unpacked document");
        Ok(Self::from_bytes(&bytes))
    }

    /// Packs the document and writes it to `path`, clearing the modified flag.
    ///
    /// # Errors
    ///
    /// Returns the codec's error if packing fails, or `Io` if the file
    /// cannot be written.
    #[instrument(skip(self, path, codec), fields(path = %path.as_ref().display()))]
    pub fn save_packed<P: AsRef<Path>>(
        &mut self,
        path: P,
        inner_file_name: &str,
        codec: &dyn CabinetCodec,
    ) -> Result<()> {
        let packed = codec.pack(&self.to_bytes(), inner_file_name)?;
        write_file(&path, &packed)?;
        self.mark_saved();
        info!(size = packed.len(), "Saved packed document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InfError;

    /// Stores the inner name on the first line, followed by the raw bytes.
    struct PlainCodec;

    impl CabinetCodec for PlainCodec {
        fn pack(&self, bytes: &[u8], inner_file_name: &str) -> Result<Vec<u8>> {
            let mut packed = format!("{}\n", inner_file_name).into_bytes();
            packed.extend_from_slice(bytes);
            Ok(packed)
        }

        fn unpack(&self, bytes: &[u8], inner_file_name: &str) -> Result<Vec<u8>> {
            let newline = bytes
                .iter()
                .position(|b| *b == b'\n')
                .ok_or_else(|| InfError::Cabinet("missing header".to_string()))?;
            let name = String::from_utf8_lossy(&bytes[..newline]);
            if !name.eq_ignore_ascii_case(inner_file_name) {
                return Err(InfError::Cabinet(format!(
                    "archive does not contain '{}'",
                    inner_file_name
                )));
            }
            Ok(bytes[newline + 1..].to_vec())
        }
    }

    #[test]
    fn test_packed_file_name() {
        assert_eq!(packed_file_name("hivesys.inf"), "hivesys.in_");
        assert_eq!(packed_file_name("dosnet.inf"), "dosnet.in_");
        assert_eq!(packed_file_name(""), "_");
    }

    #[test]
    fn test_packed_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(packed_file_name("hivesys.inf"));

        let mut doc = TextDocument::from_bytes(b"[AddReg]\r\nHKLM,\"A\",\"B\",0x00010001,1\r\n");
        doc.append_line_to_section("AddReg", "HKLM,\"A\",\"C\",,\"x\"").unwrap();
        doc.save_packed(&path, "hivesys.inf", &PlainCodec).unwrap();
        assert!(!doc.is_modified());

        let reopened = TextDocument::open_packed(&path, "HIVESYS.INF", &PlainCodec).unwrap();
        assert_eq!(reopened.text(), doc.text());
    }

    #[test]
    fn test_unpack_wrong_inner_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("txtsetup.si_");
        std::fs::write(&path, b"other.sif\n[SourceDisksFiles]\r\n").unwrap();

        let err = TextDocument::open_packed(&path, "txtsetup.sif", &PlainCodec).unwrap_err();
        assert!(matches!(err, InfError::Cabinet(_)));
    }
}
