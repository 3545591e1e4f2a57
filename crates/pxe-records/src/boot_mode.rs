//! Client firmware boot paths

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Firmware path a client takes when it network-boots.
///
/// Each mode has its own template and per-client file name convention.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum BootMode {
    /// UEFI firmware loading GRUB
    #[default]
    Uefi,

    /// Legacy BIOS loading pxelinux
    Legacy,

    /// iPXE chainloaded from the network boot ROM
    Ipxe,
}

impl BootMode {
    /// Logical template name for this mode.
    pub fn template_name(self) -> &'static str {
        match self {
            BootMode::Uefi => "grub",
            BootMode::Legacy => "pxelinux",
            BootMode::Ipxe => "ipxe",
        }
    }

    /// File name of the per-client boot file for the given canonical address.
    pub fn file_name(self, mac: &str) -> String {
        match self {
            BootMode::Uefi => format!("grub.cfg-01-{mac}"),
            BootMode::Legacy => format!("01-{mac}"),
            BootMode::Ipxe => format!("mac-{mac}.ipxe"),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            BootMode::Uefi => "uefi",
            BootMode::Legacy => "legacy",
            BootMode::Ipxe => "ipxe",
        }
    }
}

impl fmt::Display for BootMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unrecognised boot mode name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown boot mode {0:?} (expected uefi, legacy or ipxe)")]
pub struct UnknownBootModeError(String);

impl FromStr for BootMode {
    type Err = UnknownBootModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uefi" => Ok(BootMode::Uefi),
            "legacy" => Ok(BootMode::Legacy),
            "ipxe" => Ok(BootMode::Ipxe),
            _ => Err(UnknownBootModeError(s.to_string())),
        }
    }
}
