//! Install-section directive keys.

use std::fmt;

/// A directive that may appear as the key of an install-section line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    /// `AddReg` - registry values to write.
    AddReg,
    /// `DelReg` - registry values to delete.
    DelReg,
    /// `BitReg` - registry bits to set or clear.
    BitReg,
    /// `CopyFiles` - files to copy.
    CopyFiles,
    /// `DelFiles` - files to delete.
    DelFiles,
    /// `RenFiles` - files to rename.
    RenFiles,
    /// `AddService` - service to install (services sections only).
    AddService,
    /// `DelService` - service to remove (services sections only).
    DelService,
    /// `Include` - other INF files this one depends on.
    Include,
    /// `Needs` - sections of included INF files to process.
    Needs,
    /// `CopyINF` - additional INF files to copy.
    CopyInf,
    /// `Ini2Reg` - INI lines to move into the registry.
    Ini2Reg,
    /// `UpdateInis` - INI lines to update.
    UpdateInis,
    /// `UpdateIniFields` - INI fields to update.
    UpdateIniFields,
    /// `LogConfig` - hardware resource configuration.
    LogConfig,
    /// `RegisterDlls` - DLLs to register.
    RegisterDlls,
    /// `UnregisterDlls` - DLLs to unregister.
    UnregisterDlls,
    /// `ProfileItems` - start menu items.
    ProfileItems,
}

impl Directive {
    /// Parses a directive from a line key, ignoring case.
    ///
    /// Returns `None` for keys that are not directives.
    pub fn parse(key: &str) -> Option<Self> {
        let directive = match key.trim().to_ascii_lowercase().as_str() {
            "addreg" => Directive::AddReg,
            "delreg" => Directive::DelReg,
            "bitreg" => Directive::BitReg,
            "copyfiles" => Directive::CopyFiles,
            "delfiles" => Directive::DelFiles,
            "renfiles" => Directive::RenFiles,
            "addservice" => Directive::AddService,
            "delservice" => Directive::DelService,
            "include" => Directive::Include,
            "needs" => Directive::Needs,
            "copyinf" => Directive::CopyInf,
            "ini2reg" => Directive::Ini2Reg,
            "updateinis" => Directive::UpdateInis,
            "updateinifields" => Directive::UpdateIniFields,
            "logconfig" => Directive::LogConfig,
            "registerdlls" => Directive::RegisterDlls,
            "unregisterdlls" => Directive::UnregisterDlls,
            "profileitems" => Directive::ProfileItems,
            _ => return None,
        };
        Some(directive)
    }

    /// Returns the directive keyword as written in INF files.
    pub fn keyword(&self) -> &'static str {
        match self {
            Directive::AddReg => "AddReg",
            Directive::DelReg => "DelReg",
            Directive::BitReg => "BitReg",
            Directive::CopyFiles => "CopyFiles",
            Directive::DelFiles => "DelFiles",
            Directive::RenFiles => "RenFiles",
            Directive::AddService => "AddService",
            Directive::DelService => "DelService",
            Directive::Include => "Include",
            Directive::Needs => "Needs",
            Directive::CopyInf => "CopyINF",
            Directive::Ini2Reg => "Ini2Reg",
            Directive::UpdateInis => "UpdateInis",
            Directive::UpdateIniFields => "UpdateIniFields",
            Directive::LogConfig => "LogConfig",
            Directive::RegisterDlls => "RegisterDlls",
            Directive::UnregisterDlls => "UnregisterDlls",
            Directive::ProfileItems => "ProfileItems",
        }
    }

    /// Returns true if the directive's values name other sections.
    pub fn references_sections(&self) -> bool {
        !matches!(self, Directive::Include | Directive::CopyInf | Directive::AddService | Directive::DelService)
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
