//! # Windows Setup INF Document Engine
//!
//! A format-preserving reader and editor for the INF and SIF files that
//! drive Windows 2000 / XP / Server 2003 setup, written for offline driver
//! integration into an installation source.
//!
//! ## Features
//!
//! - **Format preserving**: edits rewrite only the touched lines; comments,
//!   spacing, line terminators and the original code page survive
//! - **Tolerant parsing**: quoted numbers, per-byte quoted binary data,
//!   repeated sections and `\` continuation lines are all read the way
//!   Windows setup reads them
//! - **Typed registry values**: AddReg lines decode to [`RegistryValue`]
//!   and back
//! - **Platform aware**: Models and install sections are resolved by their
//!   platform decorations for a given [`TargetPlatform`]
//! - **Packed files**: `.in_` / `.si_` cabinets through a caller-supplied
//!   [`CabinetCodec`]
//!
//! ## Document Model
//!
//! ```text
//! [Version]                               <- section header
//! Signature = "$Windows NT$"              <- key = value
//!
//! ; comment                               <- skipped by section queries
//! [AddReg]
//! HKLM,"SYSTEM\Setup","List",0x00010000,\ <- broken line...
//!      "a","b"                            <- ...continued
//! [AddReg]                                <- repeated sections merge
//! ```
//!
//! A [`TextDocument`] keeps the text as loaded. Sections are views computed
//! from it and cached until the next edit.
//!
//! ## Examples
//!
//! ### Editing a setup hive
//!
//! ```rust
//! use inf_parser::{RegistryRoot, RegistryValue, TextDocument, TextEncoding};
//!
//! # fn main() -> inf_parser::Result<()> {
//! let mut hive = TextDocument::from_text(
//!     "[AddReg]\r\nHKLM,\"SYSTEM\\Setup\",\"SetupType\",0x00010001,0\r\n",
//!     TextEncoding::Latin1,
//! );
//!
//! hive.set_registry_value(
//!     "AddReg",
//!     RegistryRoot::LocalMachine,
//!     r"SYSTEM\Setup",
//!     "SetupType",
//!     &RegistryValue::DWord(1),
//! )?;
//!
//! let value = hive.registry_value("AddReg", RegistryRoot::LocalMachine, r"SYSTEM\Setup", "SetupType")?;
//! assert_eq!(value, Some(RegistryValue::DWord(1)));
//! assert!(hive.is_modified());
//! # Ok(())
//! # }
//! ```
//!
//! ### Resolving a driver's install section
//!
//! ```no_run
//! use inf_parser::{DriverInf, TargetPlatform};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let inf = DriverInf::open("e1000325.inf")?;
//! let platform = TargetPlatform::windows_xp();
//!
//! for device in inf.list_devices(&platform) {
//!     println!("{} - {}", device.hardware_id, device.description);
//! }
//!
//! if let Some(stem) = inf.device_install_section_name(r"PCI\VEN_8086&DEV_100E", &platform) {
//!     for (directive, values) in inf.install_directives(&stem, &platform)? {
//!         println!("{} = {}", directive, values.join(","));
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Supported Features
//!
//! - ASCII, Latin-1, UTF-8 and UTF-16 (LE/BE) documents, BOM preserved
//! - All AddReg value types except REG_QWORD, which AddReg cannot express
//! - Models and install section decorations for NT 5.x on x86, x64 and IA-64
//! - Service install sections (boot start, load order group)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod addreg;
pub mod directive;
pub mod document;
pub mod driver;
pub mod encoding;
pub mod error;
pub mod fs;
pub mod line;
pub mod packed;
pub mod platform;
pub mod quoted;
pub mod service;
pub mod utils;
pub mod value;

// Re-export main types for convenience
pub use addreg::{AddRegEntry, RegistryRoot, RegistryValueMatch};
pub use directive::Directive;
pub use document::{LineMatch, TextDocument};
pub use driver::{Device, DriverInf};
pub use encoding::TextEncoding;
pub use error::{InfError, Result};
pub use line::KeyValuesLine;
pub use packed::{packed_file_name, CabinetCodec};
pub use platform::{Architecture, InstallSectionMatch, TargetPlatform};
pub use value::{RegistryValue, RegistryValueKind};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
