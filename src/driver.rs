//! Plug and Play driver INF files.
//!
//! A driver INF maps hardware IDs to install sections in three steps:
//!
//! ```text
//! [Manufacturer]
//! %Intel% = Intel, NTx86.5.1                 ; manufacturer ID + decorations
//!
//! [Intel.NTx86.5.1]                          ; models section
//! %E1000.DeviceDesc% = E1000.ndi, PCI\VEN_8086&DEV_100E
//!
//! [E1000.ndi.NTx86.5.1]                      ; install section
//! AddReg = E1000.reg
//!
//! [E1000.ndi.NTx86.5.1.Services]
//! AddService = E1000, 2, E1000.Service
//! ```
//!
//! Every lookup is relative to a [`TargetPlatform`] because the models and
//! install sections are picked by platform decoration.

use crate::directive::Directive;
use crate::document::TextDocument;
use crate::error::{InfError, Result};
use crate::line::KeyValuesLine;
use crate::platform::{InstallSectionMatch, TargetPlatform};
use crate::quoted::unquote;
use crate::utils::contains_ignore_case;
use chrono::NaiveDate;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Class name of network adapters.
pub const NETWORK_ADAPTER_CLASS_NAME: &str = "Net";

/// Class GUID of network adapters.
pub const NETWORK_ADAPTER_CLASS_GUID: &str = "{4D36E972-E325-11CE-BFC1-08002BE10318}";

/// A device listed in a models section.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Device {
    /// Hardware ID as written in the INF.
    pub hardware_id: String,

    /// Device description with its `%token%` expanded.
    pub description: String,
}

/// A driver INF document.
#[derive(Debug, Default)]
pub struct DriverInf {
    document: TextDocument,
}

impl DriverInf {
    /// Wraps a loaded document.
    pub fn new(document: TextDocument) -> Self {
        Self { document }
    }

    /// Opens a driver INF file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(TextDocument::open(path)?))
    }

    /// Returns the underlying document.
    pub fn document(&self) -> &TextDocument {
        &self.document
    }

    /// Returns the underlying document for editing.
    pub fn document_mut(&mut self) -> &mut TextDocument {
        &mut self.document
    }

    /// Unwraps the underlying document.
    pub fn into_document(self) -> TextDocument {
        self.document
    }

    /// Returns the manufacturer IDs listed in `[Manufacturer]`, in order.
    pub fn manufacturer_ids(&self) -> Vec<String> {
        self.manufacturers()
            .into_iter()
            .map(|(_, id)| id)
            .collect()
    }

    /// `(name, id)` of every manufacturer line carrying an ID.
    fn manufacturers(&self) -> Vec<(String, String)> {
        self.document
            .get_section("Manufacturer")
            .iter()
            .map(|line| KeyValuesLine::parse(line))
            .filter(|line| !line.values.is_empty())
            .map(|line| {
                let id = line.value(0).to_string();
                (line.key, id)
            })
            .collect()
    }

    /// Resolves the models section of a manufacturer.
    pub fn models_section_name(&self, manufacturer_id: &str, platform: &TargetPlatform) -> Option<String> {
        self.document.find_models_section(manufacturer_id, platform)
    }

    /// Returns the model lines of a manufacturer that name an install
    /// section and a hardware ID.
    pub fn models(&self, manufacturer_id: &str, platform: &TargetPlatform) -> Vec<KeyValuesLine> {
        let Some(section) = self.models_section_name(manufacturer_id, platform) else {
            return Vec::new();
        };
        self.document
            .get_section(&section)
            .iter()
            .map(|line| KeyValuesLine::parse(line))
            .filter(|line| line.values.len() >= 2)
            .collect()
    }

    /// Returns the install section stem for a hardware ID.
    ///
    /// The hardware ID must match exactly, ignoring case.
    pub fn device_install_section_name(
        &self,
        hardware_id: &str,
        platform: &TargetPlatform,
    ) -> Option<String> {
        self.manufacturer_ids().iter().find_map(|manufacturer_id| {
            self.models(manufacturer_id, platform)
                .into_iter()
                .find(|model| model.value(1).eq_ignore_ascii_case(hardware_id))
                .map(|model| model.value(0).to_string())
        })
    }

    /// Lists every device of every manufacturer.
    ///
    /// Models whose description token is missing from `[Strings]` are
    /// skipped; some in-box INF files ship that way.
    pub fn list_devices(&self, platform: &TargetPlatform) -> Vec<Device> {
        let mut devices = Vec::new();
        for manufacturer_id in self.manufacturer_ids() {
            for model in self.models(&manufacturer_id, platform) {
                let description = match self.expand_token(&model.key) {
                    Ok(description) => description,
                    Err(e) => {
                        warn!(error = %e, "Skipping device with an unresolved description");
                        continue;
                    }
                };
                devices.push(Device {
                    hardware_id: model.value(1).to_string(),
                    description: unquote(&description).to_string(),
                });
            }
        }
        debug!(count = devices.len(), "Listed devices");
        devices
    }

    /// Returns the description of a device, matching the hardware ID exactly.
    pub fn device_description(&self, hardware_id: &str, platform: &TargetPlatform) -> Option<String> {
        self.list_devices(platform)
            .into_iter()
            .find(|device| device.hardware_id == hardware_id)
            .map(|device| device.description)
    }

    /// Returns the display name of the manufacturer of a device.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the manufacturer's name token is missing from
    /// `[Strings]`.
    pub fn device_manufacturer_name(
        &self,
        hardware_id: &str,
        platform: &TargetPlatform,
    ) -> Result<Option<String>> {
        for (name, manufacturer_id) in self.manufacturers() {
            let listed = self
                .models(&manufacturer_id, platform)
                .iter()
                .any(|model| model.value(1) == hardware_id);
            if listed {
                let name = self.expand_token(&name)?;
                return Ok(Some(unquote(&name).to_string()));
            }
        }
        Ok(None)
    }

    /// Returns true if any device is enumerated by the root bus.
    pub fn contains_root_devices(&self, platform: &TargetPlatform) -> bool {
        self.list_devices(platform)
            .iter()
            .any(|device| Self::is_root_device(&device.hardware_id))
    }

    /// Returns true if the hardware ID is a root-enumerated device (`ROOT\...`).
    pub fn is_root_device(hardware_id: &str) -> bool {
        hardware_id
            .get(..5)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("root\\"))
    }

    /// Strips the `&SUBSYS` and `&REV` qualifiers from a hardware ID.
    ///
    /// ```rust
    /// use inf_parser::DriverInf;
    ///
    /// let generic = DriverInf::generic_hardware_id(r"PCI\VEN_8086&DEV_100E&SUBSYS_001E8086&REV_02");
    /// assert_eq!(generic, r"PCI\VEN_8086&DEV_100E");
    /// ```
    pub fn generic_hardware_id(hardware_id: &str) -> &str {
        let upper = hardware_id.to_ascii_uppercase();
        let cut = [upper.find("&SUBSYS"), upper.find("&REV")]
            .into_iter()
            .flatten()
            .min();
        match cut {
            Some(index) => &hardware_id[..index],
            None => hardware_id,
        }
    }

    /// Comments out every model line whose hardware ID starts with the
    /// generic form of `hardware_id`.
    ///
    /// Used on in-box INF files so Windows does not pick its own driver
    /// over the integrated one. Returns true if any line was disabled.
    ///
    /// # Errors
    ///
    /// Propagates line editing errors.
    pub fn disable_matching_hardware_id(
        &mut self,
        hardware_id: &str,
        platform: &TargetPlatform,
    ) -> Result<bool> {
        let generic = Self::generic_hardware_id(hardware_id).to_ascii_lowercase();
        let mut disabled = false;

        for manufacturer_id in self.manufacturer_ids() {
            let Some(section) = self.models_section_name(&manufacturer_id, platform) else {
                continue;
            };
            for line in self.document.get_section(&section) {
                let model = KeyValuesLine::parse(&line);
                if model.values.len() < 2
                    || !model.value(1).to_ascii_lowercase().starts_with(&generic)
                {
                    continue;
                }
                if let Some(found) = self.document.find_line(&section, &line) {
                    self.document
                        .update_line(found.index, Some(&format!(";{}", line)), false)?;
                    info!(section = %section, hardware_id = model.value(1), "Disabled model");
                    disabled = true;
                }
            }
        }
        Ok(disabled)
    }

    /// Resolves the install and services sections of a model.
    ///
    /// # Errors
    ///
    /// Returns `Pattern` if the stem yields an invalid pattern.
    pub fn resolve_install_section(
        &self,
        install_section_stem: &str,
        platform: &TargetPlatform,
    ) -> Result<Option<InstallSectionMatch>> {
        self.document.find_install_section(install_section_stem, platform)
    }

    /// Returns the lines of the install section of a model, or nothing if
    /// none matches the platform.
    ///
    /// # Errors
    ///
    /// Returns `Pattern` if the stem yields an invalid pattern.
    pub fn install_section(
        &self,
        install_section_stem: &str,
        platform: &TargetPlatform,
    ) -> Result<Vec<String>> {
        Ok(self
            .resolve_install_section(install_section_stem, platform)?
            .map(|found| self.document.get_section(&found.install_section))
            .unwrap_or_default())
    }

    /// Returns the lines of the services section of a model.
    ///
    /// # Errors
    ///
    /// Returns `Pattern` if the stem yields an invalid pattern.
    pub fn install_services_section(
        &self,
        install_section_stem: &str,
        platform: &TargetPlatform,
    ) -> Result<Vec<String>> {
        Ok(self
            .resolve_install_section(install_section_stem, platform)?
            .map(|found| self.document.get_section(&found.services_section))
            .unwrap_or_default())
    }

    /// Returns the directives of the install section of a model, in order.
    ///
    /// Lines whose key is not a directive (`DriverVer`, `Characteristics`,
    /// ...) are left out.
    ///
    /// # Errors
    ///
    /// Returns `Pattern` if the stem yields an invalid pattern.
    pub fn install_directives(
        &self,
        install_section_stem: &str,
        platform: &TargetPlatform,
    ) -> Result<Vec<(Directive, Vec<String>)>> {
        Ok(self
            .install_section(install_section_stem, platform)?
            .iter()
            .map(|line| KeyValuesLine::parse(line))
            .filter_map(|line| Directive::parse(&line.key).map(|directive| (directive, line.values)))
            .collect())
    }

    /// Returns the sections named by the directives of a model's install
    /// section, such as its AddReg and CopyFiles sections.
    ///
    /// `CopyFiles = @file` entries name a file, not a section, and are
    /// skipped. Each section is listed once.
    ///
    /// # Errors
    ///
    /// Returns `Pattern` if the stem yields an invalid pattern.
    pub fn install_referenced_sections(
        &self,
        install_section_stem: &str,
        platform: &TargetPlatform,
    ) -> Result<Vec<String>> {
        let mut sections: Vec<String> = Vec::new();
        for (directive, values) in self.install_directives(install_section_stem, platform)? {
            if !directive.references_sections() {
                continue;
            }
            for value in values {
                if value.is_empty() || value.starts_with('@') || contains_ignore_case(&sections, &value) {
                    continue;
                }
                sections.push(value);
            }
        }
        Ok(sections)
    }

    /// Sets every service added by a model's services section to boot start.
    ///
    /// Returns the names of the services processed.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` for an `AddService` line without a
    /// service install section, and `NotFound` if a service install section
    /// has no `StartType`.
    pub fn set_services_to_boot_start(
        &mut self,
        install_section_stem: &str,
        platform: &TargetPlatform,
    ) -> Result<Vec<String>> {
        let mut services = Vec::new();
        for line in self.install_services_section(install_section_stem, platform)? {
            let line = KeyValuesLine::parse(&line);
            if Directive::parse(&line.key) != Some(Directive::AddService) {
                continue;
            }
            if line.values.len() < 3 {
                return Err(InfError::malformed(format!(
                    "AddService line for '{}' has no service install section",
                    line.value(0)
                )));
            }
            self.document.set_service_to_boot_start(line.value(2))?;
            info!(service = line.value(0), "Service set to boot start");
            services.push(line.value(0).to_string());
        }
        Ok(services)
    }

    /// Expands a whole-string `%token%` through `[Strings]`.
    ///
    /// Text that is not exactly one token is returned unchanged. The
    /// expansion is returned as written, quotes included.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the token is not defined.
    pub fn expand_token(&self, s: &str) -> Result<String> {
        let Some(token) = s
            .strip_prefix('%')
            .and_then(|rest| rest.strip_suffix('%'))
            .filter(|token| !token.contains('%'))
        else {
            return Ok(s.to_string());
        };

        self.document
            .get_section("Strings")
            .iter()
            .map(|line| KeyValuesLine::parse(line))
            .find(|line| line.has_key(token))
            .map(|line| line.value(0).to_string())
            .ok_or_else(|| InfError::not_found("token", token))
    }

    /// Expands the first `%dirid%` in a path.
    ///
    /// Only the directory IDs drivers use for their files are known:
    /// 11 (`system32`) and 12 (`system32\drivers`).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for any other directory ID.
    pub fn expand_dir_id(s: &str) -> Result<String> {
        let Some(left) = s.find('%') else {
            return Ok(s.to_string());
        };
        let Some(length) = s[left + 1..].find('%') else {
            return Ok(s.to_string());
        };
        let right = left + 1 + length;

        let directory = match &s[left + 1..right] {
            "11" => "system32",
            "12" => r"system32\drivers",
            other => return Err(InfError::not_found("dir-id", other)),
        };
        Ok(format!("{}{}{}", &s[..left], directory, &s[right + 1..]))
    }

    fn version_value(&self, key: &str, index: usize) -> String {
        self.document
            .values_of_key_in_section("Version", key)
            .get(index)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns `Class` from `[Version]`, or an empty string.
    pub fn class_name(&self) -> String {
        self.version_value("Class", 0)
    }

    /// Returns `ClassGUID` from `[Version]`, upper-cased.
    pub fn class_guid(&self) -> String {
        self.version_value("ClassGUID", 0).to_ascii_uppercase()
    }

    /// Returns `Provider` from `[Version]`, token expanded and unquoted.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the provider token is not defined.
    pub fn provider(&self) -> Result<String> {
        let provider = self.expand_token(&self.version_value("Provider", 0))?;
        Ok(unquote(&provider).to_string())
    }

    /// Returns `CatalogFile` from `[Version]`.
    pub fn catalog_file(&self) -> String {
        self.version_value("CatalogFile", 0)
    }

    /// Returns the version part of `DriverVer = mm/dd/yyyy,w.x.y.z`.
    pub fn driver_version(&self) -> String {
        self.version_value("DriverVer", 1)
    }

    /// Returns the date part of `DriverVer`.
    ///
    /// Returns `None` when the line is missing or the date is not
    /// `mm/dd/yyyy`.
    pub fn driver_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.version_value("DriverVer", 0), "%m/%d/%Y").ok()
    }

    /// Returns true if the driver installs a network adapter.
    pub fn is_network_adapter(&self) -> bool {
        self.class_name().eq_ignore_ascii_case(NETWORK_ADAPTER_CLASS_NAME)
            || self.class_guid() == NETWORK_ADAPTER_CLASS_GUID
    }
}

impl From<TextDocument> for DriverInf {
    fn from(document: TextDocument) -> Self {
        Self::new(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::TextEncoding;

    const INF: &str = concat!(
        "[Version]\r\n",
        "Signature   = \"$Windows NT$\"\r\n",
        "Class       = Net\r\n",
        "ClassGUID   = {4d36e972-e325-11ce-bfc1-08002be10318}\r\n",
        "Provider    = %Intel%\r\n",
        "CatalogFile = e1000325.cat\r\n",
        "DriverVer   = 06/21/2006,8.10.3.0\r\n",
        "\r\n",
        "[Manufacturer]\r\n",
        "%Intel%     = Intel, NTx86.5.1\r\n",
        "\r\n",
        "[Intel]\r\n",
        "%E100E.DeviceDesc% = E1000.ndi, PCI\\VEN_8086&DEV_100E\r\n",
        "\r\n",
        "[Intel.NTx86.5.1]\r\n",
        "%E100E.DeviceDesc% = E1000.ndi, PCI\\VEN_8086&DEV_100E\r\n",
        "%E100E.DeviceDesc% = E1000.ndi, PCI\\VEN_8086&DEV_100E&SUBSYS_001E8086\r\n",
        "%Missing.DeviceDesc% = E1000.ndi, PCI\\VEN_8086&DEV_1010\r\n",
        "%Virtual.DeviceDesc% = Virtual.ndi, ROOT\\E1000VIRT\r\n",
        "\r\n",
        "[E1000.ndi.NTx86.5.1]\r\n",
        "Characteristics = 0x84\r\n",
        "AddReg          = E1000.reg\r\n",
        "CopyFiles       = E1000.CopyFiles\r\n",
        "\r\n",
        "[E1000.ndi.NTx86.5.1.Services]\r\n",
        "AddService = E1000, 2, E1000.Service\r\n",
        "\r\n",
        "[E1000.Service]\r\n",
        "ServiceType = 1\r\n",
        "StartType   = 3\r\n",
        "\r\n",
        "[Strings]\r\n",
        "Intel = \"Intel\"\r\n",
        "E100E.DeviceDesc = \"Intel(R) PRO/1000 MT Network Connection\"\r\n",
        "Virtual.DeviceDesc = \"Virtual Adapter\"\r\n",
    );

    fn inf() -> DriverInf {
        DriverInf::new(TextDocument::from_text(INF, TextEncoding::Latin1))
    }

    #[test]
    fn test_version_accessors() {
        let inf = inf();
        assert_eq!(inf.class_name(), "Net");
        assert_eq!(inf.class_guid(), NETWORK_ADAPTER_CLASS_GUID);
        assert_eq!(inf.provider().unwrap(), "Intel");
        assert_eq!(inf.catalog_file(), "e1000325.cat");
        assert_eq!(inf.driver_version(), "8.10.3.0");
        assert_eq!(inf.driver_date(), NaiveDate::from_ymd_opt(2006, 6, 21));
        assert!(inf.is_network_adapter());
    }

    #[test]
    fn test_driver_date_missing() {
        let inf = DriverInf::new(TextDocument::from_text("[Version]\r\nDriverVer = 8.10\r\n", TextEncoding::Latin1));
        assert_eq!(inf.driver_date(), None);
        assert_eq!(DriverInf::default().driver_date(), None);
    }

    #[test]
    fn test_install_section_name_lookup() {
        let inf = inf();
        let xp = TargetPlatform::windows_xp();
        assert_eq!(
            inf.device_install_section_name(r"pci\ven_8086&dev_100e", &xp).as_deref(),
            Some("E1000.ndi")
        );
        assert_eq!(inf.device_install_section_name(r"PCI\VEN_8086&DEV_100F", &xp), None);
        assert_eq!(
            inf.device_install_section_name(r"ROOT\E1000VIRT", &TargetPlatform::windows_2000()),
            None
        );
    }

    #[test]
    fn test_list_devices_skips_missing_tokens() {
        let devices = inf().list_devices(&TargetPlatform::windows_xp());
        assert_eq!(devices.len(), 3);
        assert_eq!(devices[0].description, "Intel(R) PRO/1000 MT Network Connection");
        assert!(devices.iter().all(|d| d.hardware_id != r"PCI\VEN_8086&DEV_1010"));
    }

    #[test]
    fn test_device_lookups() {
        let inf = inf();
        let xp = TargetPlatform::windows_xp();
        assert_eq!(
            inf.device_description(r"ROOT\E1000VIRT", &xp).as_deref(),
            Some("Virtual Adapter")
        );
        assert_eq!(
            inf.device_manufacturer_name(r"PCI\VEN_8086&DEV_100E", &xp).unwrap().as_deref(),
            Some("Intel")
        );
        assert!(inf.contains_root_devices(&xp));
        assert!(!inf.contains_root_devices(&TargetPlatform::windows_2000()));
    }

    #[test]
    fn test_root_device() {
        assert!(DriverInf::is_root_device(r"root\ms_ptiminiport"));
        assert!(!DriverInf::is_root_device(r"PCI\VEN_8086"));
        assert!(!DriverInf::is_root_device("ROO"));
    }

    #[test]
    fn test_generic_hardware_id() {
        assert_eq!(DriverInf::generic_hardware_id(r"PCI\VEN_1&DEV_2&REV_01"), r"PCI\VEN_1&DEV_2");
        assert_eq!(
            DriverInf::generic_hardware_id(r"PCI\VEN_1&DEV_2&subsys_3&REV_01"),
            r"PCI\VEN_1&DEV_2"
        );
        assert_eq!(DriverInf::generic_hardware_id(r"PCI\VEN_1&DEV_2"), r"PCI\VEN_1&DEV_2");
    }

    #[test]
    fn test_disable_matching_hardware_id() {
        let mut inf = inf();
        let xp = TargetPlatform::windows_xp();
        let disabled = inf
            .disable_matching_hardware_id(r"PCI\VEN_8086&DEV_100E&SUBSYS_00000000&REV_02", &xp)
            .unwrap();
        assert!(disabled);

        let text = inf.document().text();
        assert!(text.contains(";%E100E.DeviceDesc% = E1000.ndi, PCI\\VEN_8086&DEV_100E\r\n"));
        assert!(text.contains(";%E100E.DeviceDesc% = E1000.ndi, PCI\\VEN_8086&DEV_100E&SUBSYS_001E8086\r\n"));
        // the undecorated section is not the one XP reads
        assert!(text.contains("[Intel]\r\n%E100E.DeviceDesc%"));
        assert_eq!(inf.device_install_section_name(r"PCI\VEN_8086&DEV_100E", &xp), None);

        assert!(!inf.disable_matching_hardware_id(r"USB\VID_0001", &xp).unwrap());
    }

    #[test]
    fn test_install_sections() {
        let inf = inf();
        let xp = TargetPlatform::windows_xp();
        assert_eq!(inf.install_section("E1000.ndi", &xp).unwrap().len(), 3);
        assert_eq!(
            inf.install_services_section("E1000.ndi", &xp).unwrap(),
            vec!["AddService = E1000, 2, E1000.Service"]
        );
        assert!(inf.install_section("E1000.ndi", &TargetPlatform::windows_2000()).unwrap().is_empty());

        let directives = inf.install_directives("E1000.ndi", &xp).unwrap();
        assert_eq!(
            directives,
            vec![
                (Directive::AddReg, vec!["E1000.reg".to_string()]),
                (Directive::CopyFiles, vec!["E1000.CopyFiles".to_string()]),
            ]
        );
    }

    #[test]
    fn test_install_referenced_sections() {
        let mut inf = inf();
        let xp = TargetPlatform::windows_xp();
        assert_eq!(
            inf.install_referenced_sections("E1000.ndi", &xp).unwrap(),
            vec!["E1000.reg", "E1000.CopyFiles"]
        );

        let index = inf
            .document()
            .get_line_index_by_key("E1000.ndi.NTx86.5.1", "CopyFiles")
            .unwrap()
            .index;
        let document = inf.document_mut();
        document.insert_line(index + 1, "CopyFiles = @e1000325.sys, e1000.copyfiles").unwrap();
        document.insert_line(index + 2, "CopyINF = e1000.inf").unwrap();
        assert_eq!(
            inf.install_referenced_sections("E1000.ndi", &xp).unwrap(),
            vec!["E1000.reg", "E1000.CopyFiles"]
        );
    }

    #[test]
    fn test_set_services_to_boot_start() {
        let mut inf = inf();
        let services = inf
            .set_services_to_boot_start("E1000.ndi", &TargetPlatform::windows_xp())
            .unwrap();
        assert_eq!(services, vec!["E1000"]);
        assert_eq!(
            inf.document().values_of_key_in_section("E1000.Service", "StartType"),
            vec!["0"]
        );
    }

    #[test]
    fn test_expand_token() {
        let inf = inf();
        assert_eq!(inf.expand_token("%intel%").unwrap(), "\"Intel\"");
        assert_eq!(inf.expand_token("plain").unwrap(), "plain");
        assert_eq!(inf.expand_token("%a%b%").unwrap(), "%a%b%");
        assert!(inf.expand_token("%DiskName%").unwrap_err().is_not_found());
    }

    #[test]
    fn test_expand_dir_id() {
        assert_eq!(DriverInf::expand_dir_id(r"%12%\e1000325.sys").unwrap(), r"system32\drivers\e1000325.sys");
        assert_eq!(DriverInf::expand_dir_id("%11%").unwrap(), "system32");
        assert_eq!(DriverInf::expand_dir_id("e1000.sys").unwrap(), "e1000.sys");
        assert!(DriverInf::expand_dir_id("%10%").is_err());
    }
}
