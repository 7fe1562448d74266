//! Target platform and decorated section-name resolution.
//!
//! Driver INF files decorate Models and install section names with the
//! platform they apply to (`Intel.NTx86.5.1`, `E1000.ndi.NTamd64`). Setup
//! picks the most specific decoration that does not exceed the target:
//! OS version first, then architecture, then a bare `.NT`, then the plain
//! name.

use crate::document::TextDocument;
use crate::error::Result;
use crate::utils::contains_ignore_case;
use regex::RegexBuilder;
use std::fmt;
use tracing::debug;

/// Suffix of the section listing an install section's services.
pub const SERVICES_SUFFIX: &str = ".Services";

/// Processor architecture of the target installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Architecture {
    /// 32-bit x86.
    #[default]
    X86,
    /// x64.
    Amd64,
    /// Itanium.
    Ia64,
}

impl Architecture {
    /// Returns the identifier used in section decorations.
    pub fn identifier(&self) -> &'static str {
        match self {
            Architecture::X86 => "x86",
            Architecture::Amd64 => "amd64",
            Architecture::Ia64 => "ia64",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// The Windows installation a driver is being integrated into.
///
/// The major version is always 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetPlatform {
    /// Processor architecture.
    pub architecture: Architecture,

    /// Minor OS version: 0 for Windows 2000, 1 for XP, 2 for XP x64 and
    /// Server 2003.
    pub minor_version: u32,

    /// Product type: 1 for workstation, 2 for domain controller, 3 for server.
    pub product_type: u32,
}

impl Default for TargetPlatform {
    fn default() -> Self {
        Self::windows_xp()
    }
}

impl TargetPlatform {
    /// Workstation product type.
    pub const PRODUCT_WORKSTATION: u32 = 1;

    /// Server product type.
    pub const PRODUCT_SERVER: u32 = 3;

    /// Creates a platform description.
    pub fn new(architecture: Architecture, minor_version: u32, product_type: u32) -> Self {
        Self {
            architecture,
            minor_version,
            product_type,
        }
    }

    /// Windows 2000 (5.0), x86.
    pub fn windows_2000() -> Self {
        Self::new(Architecture::X86, 0, Self::PRODUCT_WORKSTATION)
    }

    /// Windows XP (5.1), x86.
    pub fn windows_xp() -> Self {
        Self::new(Architecture::X86, 1, Self::PRODUCT_WORKSTATION)
    }

    /// Windows Server 2003 (5.2), x86.
    pub fn windows_server_2003() -> Self {
        Self::new(Architecture::X86, 2, Self::PRODUCT_SERVER)
    }

    /// Windows XP x64 (5.2).
    pub fn windows_xp_x64() -> Self {
        Self::new(Architecture::Amd64, 2, Self::PRODUCT_WORKSTATION)
    }

    /// Returns candidate Models section names for a manufacturer, most
    /// specific first.
    ///
    /// Windows 2000 ignores decorations on Models sections, so for minor
    /// version 0 the only candidate is the stem itself. The `.nt` and
    /// undecorated forms beyond that are only honored on x86.
    ///
    /// ```rust
    /// use inf_parser::TargetPlatform;
    ///
    /// let candidates = TargetPlatform::windows_xp().models_section_candidates("Intel");
    /// assert_eq!(candidates[0], "Intel.ntx86.5.1.1");
    /// assert_eq!(candidates.last().map(String::as_str), Some("Intel"));
    /// ```
    pub fn models_section_candidates(&self, stem: &str) -> Vec<String> {
        let mut candidates = Vec::new();
        if self.minor_version != 0 {
            let decorated = format!("{}.nt{}", stem, self.architecture);
            self.push_versioned(&mut candidates, &decorated);
            candidates.push(decorated);

            if self.architecture == Architecture::X86 {
                let decorated = format!("{}.nt", stem);
                self.push_versioned(&mut candidates, &decorated);
                candidates.push(decorated);
            }
        }
        candidates.push(stem.to_string());
        candidates
    }

    /// `{prefix}.5.{minor}.{product}`, `{prefix}.5.{minor}` for every minor
    /// version down to 1, then `{prefix}.5`.
    fn push_versioned(&self, candidates: &mut Vec<String>, prefix: &str) {
        for minor in (1..=self.minor_version).rev() {
            candidates.push(format!("{}.5.{}.{}", prefix, minor, self.product_type));
            candidates.push(format!("{}.5.{}", prefix, minor));
        }
        candidates.push(format!("{}.5", prefix));
    }

    /// Returns regular expressions for the install section names of a
    /// model, most specific first.
    ///
    /// Install sections may carry an extra dot-suffix before the platform
    /// decoration (`E1000.ndi.NTx86`), so these are patterns rather than
    /// names. They are not anchored.
    pub fn install_section_patterns(&self, stem: &str) -> Vec<String> {
        let stem = regex::escape(stem);
        let architecture = regex::escape(self.architecture.identifier());

        let mut patterns = Vec::new();
        for minor in (0..=self.minor_version).rev() {
            let minor_suffix = if minor != 0 {
                format!(r"\.{}", minor)
            } else {
                String::new()
            };
            patterns.push(format!(r"{}(\..+)?\.nt{}\.5{}", stem, architecture, minor_suffix));
        }
        patterns.push(format!(r"{}(\..+)?\.nt{}", stem, architecture));
        patterns.push(format!(r"{}(\..+)?\.nt", stem));
        patterns.push(stem);
        patterns
    }
}

/// An install section together with its services section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallSectionMatch {
    /// Name of the install section, as written in the document.
    pub install_section: String,

    /// Name of the `.Services` section, as written in the document.
    pub services_section: String,
}

impl TextDocument {
    /// Resolves the Models section of a manufacturer for a platform.
    ///
    /// Returns the first candidate of
    /// [`TargetPlatform::models_section_candidates`] that exists.
    pub fn find_models_section(&self, manufacturer_id: &str, platform: &TargetPlatform) -> Option<String> {
        let section_names = self.section_names();
        let found = platform
            .models_section_candidates(manufacturer_id)
            .into_iter()
            .find(|candidate| contains_ignore_case(&section_names, candidate));
        debug!(manufacturer = manufacturer_id, section = ?found, "Resolved models section");
        found
    }

    /// Resolves the install section of a model for a platform.
    ///
    /// An install section only qualifies when a matching `.Services`
    /// section exists. Patterns are tried in priority order; within a
    /// pattern the first section in document order wins.
    ///
    /// # Errors
    ///
    /// Returns `Pattern` if a pattern fails to compile.
    pub fn find_install_section(
        &self,
        install_section_stem: &str,
        platform: &TargetPlatform,
    ) -> Result<Option<InstallSectionMatch>> {
        let section_names = self.section_names();
        for pattern in platform.install_section_patterns(install_section_stem) {
            let regex = RegexBuilder::new(&format!(
                "^({}){}$",
                pattern,
                regex::escape(SERVICES_SUFFIX)
            ))
            .case_insensitive(true)
            .build()?;
            let found = section_names.iter().find_map(|name| {
                // case folding may match a suffix of a different byte length
                let install = regex.captures(name)?.get(1)?.as_str().to_string();
                Some((install, name))
            });
            if let Some((install_section, services_section)) = found {
                debug!(
                    stem = install_section_stem,
                    section = %install_section,
                    "Resolved install section"
                );
                return Ok(Some(InstallSectionMatch {
                    install_section,
                    services_section: services_section.clone(),
                }));
            }
        }
        debug!(stem = install_section_stem, "No install section matched");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::TextEncoding;

    #[test]
    fn test_models_priority_order() {
        let platform = TargetPlatform::new(Architecture::X86, 2, 1);
        let candidates = platform.models_section_candidates("Net");
        assert_eq!(&candidates[..3], &["Net.ntx86.5.2.1", "Net.ntx86.5.2", "Net.ntx86.5.1.1"]);
    }

    #[test]
    fn test_models_candidates_xp() {
        assert_eq!(
            TargetPlatform::windows_xp().models_section_candidates("Intel"),
            vec![
                "Intel.ntx86.5.1.1",
                "Intel.ntx86.5.1",
                "Intel.ntx86.5",
                "Intel.ntx86",
                "Intel.nt.5.1.1",
                "Intel.nt.5.1",
                "Intel.nt.5",
                "Intel.nt",
                "Intel",
            ]
        );
    }

    #[test]
    fn test_models_candidates_x64_has_no_nt_fallback() {
        assert_eq!(
            TargetPlatform::windows_xp_x64().models_section_candidates("Intel"),
            vec![
                "Intel.ntamd64.5.2.1",
                "Intel.ntamd64.5.2",
                "Intel.ntamd64.5.1.1",
                "Intel.ntamd64.5.1",
                "Intel.ntamd64.5",
                "Intel.ntamd64",
                "Intel",
            ]
        );
    }

    #[test]
    fn test_models_candidates_windows_2000() {
        assert_eq!(TargetPlatform::windows_2000().models_section_candidates("Intel"), vec!["Intel"]);
    }

    #[test]
    fn test_install_patterns() {
        let patterns = TargetPlatform::windows_xp().install_section_patterns("E1000.ndi");
        assert_eq!(
            patterns,
            vec![
                r"E1000\.ndi(\..+)?\.ntx86\.5\.1",
                r"E1000\.ndi(\..+)?\.ntx86\.5",
                r"E1000\.ndi(\..+)?\.ntx86",
                r"E1000\.ndi(\..+)?\.nt",
                r"E1000\.ndi",
            ]
        );
    }

    fn driver() -> TextDocument {
        TextDocument::from_text(
            concat!(
                "[Manufacturer]\r\n",
                "%Intel% = Intel, NTx86.5.1\r\n",
                "[Intel]\r\n",
                "[Intel.NTx86.5.1]\r\n",
                "[E1000.ndi]\r\n",
                "[E1000.ndi.Services]\r\n",
                "[E1000.ndi.NT]\r\n",
                "[E1000.ndi.NT.Services]\r\n",
                "[E1000.ndi.CoInstallers.NTx86]\r\n",
                "[E1000.ndi.CoInstallers.NTx86.Services]\r\n",
                "[E1000.ndi.NTx86.5.1]\r\n",
            ),
            TextEncoding::Latin1,
        )
    }

    #[test]
    fn test_find_models_section() {
        let doc = driver();
        assert_eq!(
            doc.find_models_section("Intel", &TargetPlatform::windows_xp()).as_deref(),
            Some("Intel.ntx86.5.1")
        );
        assert_eq!(
            doc.find_models_section("intel", &TargetPlatform::windows_2000()).as_deref(),
            Some("intel")
        );
        assert_eq!(doc.find_models_section("Realtek", &TargetPlatform::windows_xp()), None);
    }

    #[test]
    fn test_find_install_section_requires_services() {
        let doc = driver();
        // E1000.ndi.NTx86.5.1 has no services section, so the next pattern wins
        let found = doc
            .find_install_section("E1000.ndi", &TargetPlatform::windows_xp())
            .unwrap()
            .unwrap();
        assert_eq!(found.install_section, "E1000.ndi.CoInstallers.NTx86");
        assert_eq!(found.services_section, "E1000.ndi.CoInstallers.NTx86.Services");
    }

    #[test]
    fn test_find_install_section_fallbacks() {
        let doc = driver();
        let found = doc
            .find_install_section("E1000.ndi", &TargetPlatform::windows_xp_x64())
            .unwrap()
            .unwrap();
        assert_eq!(found.install_section, "E1000.ndi.NT");

        assert_eq!(doc.find_install_section("Missing", &TargetPlatform::windows_xp()).unwrap(), None);
    }

    #[test]
    fn test_find_install_section_folded_suffix() {
        // U+017F folds to 's' but is two bytes long
        let doc = TextDocument::from_text("[X]\r\n[X.\u{17F}ervice\u{17F}]\r\n", TextEncoding::Utf8);
        let found = doc
            .find_install_section("X", &TargetPlatform::windows_xp())
            .unwrap()
            .unwrap();
        assert_eq!(found.install_section, "X");
        assert_eq!(found.services_section, "X.\u{17F}ervice\u{17F}");

        let doc = TextDocument::from_text("[X]\r\n[X.\u{17F}ervices]\r\n", TextEncoding::Utf8);
        let found = doc
            .find_install_section("X", &TargetPlatform::windows_xp())
            .unwrap()
            .unwrap();
        assert_eq!(found.install_section, "X");
    }
}
