//! Service install sections.
//!
//! A service install section (the third field of an `AddService`
//! directive) holds the service's `ServiceType`, `StartType`,
//! `LoadOrderGroup` and so on. Drivers integrated into a text-mode setup
//! must start at boot.

use crate::document::TextDocument;
use crate::error::{InfError, Result};
use crate::line::KeyValuesLine;
use crate::quoted::index_of_unquoted;
use tracing::debug;

/// `SERVICE_BOOT_START`.
pub const SERVICE_BOOT_START: u32 = 0;

impl TextDocument {
    /// Sets the service's `StartType` to boot start.
    ///
    /// A line that already reads 0 is left alone so the file's catalog
    /// signature stays valid.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the section has no `StartType` line.
    pub fn set_service_to_boot_start(&mut self, service_install_section: &str) -> Result<()> {
        let found = self
            .get_line_index_by_key(service_install_section, "StartType")
            .ok_or_else(|| InfError::not_found("StartType in section", service_install_section))?;

        let line = KeyValuesLine::parse(&found.line);
        let current = line.value(0);
        let start_type = match current.strip_prefix("0x").or_else(|| current.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => current.parse::<u32>().ok(),
        };
        if start_type == Some(SERVICE_BOOT_START) {
            debug!(section = service_install_section, "Service already starts at boot");
            return Ok(());
        }

        let updated = format!("{} 0 ;SERVICE_BOOT_START", value_prefix(&found.line));
        self.update_line(found.index, Some(&updated), false)
    }

    /// Sets the service's `LoadOrderGroup`, appending the line if absent.
    ///
    /// # Errors
    ///
    /// Propagates line editing errors.
    pub fn set_service_load_order_group(
        &mut self,
        service_install_section: &str,
        load_order_group: &str,
    ) -> Result<()> {
        match self.get_line_index_by_key(service_install_section, "LoadOrderGroup") {
            Some(found) => {
                let existing = KeyValuesLine::parse(&found.line);
                if existing.value(0).eq_ignore_ascii_case(load_order_group) {
                    return Ok(());
                }
                let updated = format!("{} {}", value_prefix(&found.line), load_order_group);
                self.update_line(found.index, Some(&updated), false)
            }
            None => self.append_line_to_section(
                service_install_section,
                &format!("LoadOrderGroup = {}", load_order_group),
            ),
        }
    }
}

/// The line up to and including its `=`.
fn value_prefix(line: &str) -> &str {
    match index_of_unquoted(line, '=', 0) {
        Some(index) => &line[..=index],
        None => line,
    }
}
