//! BootImage record
//!
//! A kernel/initrd pair registered for one operating system release.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Distributions pxeutil knows how to boot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OsName {
    Redhat,
    Fedora,
    Ubuntu,
    Rocky,
    Almalinux,
    Centos,
    Debian,
    Grml,
    Oraclelinux,
}

impl OsName {
    /// Every supported distribution, in the order they are offered to users.
    pub const ALL: [OsName; 9] = [
        OsName::Redhat,
        OsName::Fedora,
        OsName::Ubuntu,
        OsName::Rocky,
        OsName::Almalinux,
        OsName::Centos,
        OsName::Debian,
        OsName::Grml,
        OsName::Oraclelinux,
    ];

    /// Name as stored in the document and used in content paths.
    pub fn as_str(self) -> &'static str {
        match self {
            OsName::Redhat => "redhat",
            OsName::Fedora => "fedora",
            OsName::Ubuntu => "ubuntu",
            OsName::Rocky => "rocky",
            OsName::Almalinux => "almalinux",
            OsName::Centos => "centos",
            OsName::Debian => "debian",
            OsName::Grml => "grml",
            OsName::Oraclelinux => "oraclelinux",
        }
    }
}

impl fmt::Display for OsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no supported distribution or variant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported {kind}: {value:?}")]
pub struct UnknownNameError {
    kind: &'static str,
    value: String,
}

impl FromStr for OsName {
    type Err = UnknownNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OsName::ALL
            .into_iter()
            .find(|os| os.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownNameError {
                kind: "os name",
                value: s.to_string(),
            })
    }
}

/// Edition of a distribution release (e.g. the server ISO of Ubuntu).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Server,
    Workstation,
    Desktop,
}

impl Variant {
    /// Name as stored in the document and used in content paths.
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Server => "server",
            Variant::Workstation => "workstation",
            Variant::Desktop => "desktop",
        }
    }

    /// Parses a user supplied variant where the empty string means "no variant".
    pub fn parse_optional(s: &str) -> Result<Option<Variant>, UnknownNameError> {
        let s = s.trim();
        if s.is_empty() {
            Ok(None)
        } else {
            s.parse().map(Some)
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = UnknownNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "server" => Ok(Variant::Server),
            "workstation" => Ok(Variant::Workstation),
            "desktop" => Ok(Variant::Desktop),
            _ => Err(UnknownNameError {
                kind: "variant",
                value: s.to_string(),
            }),
        }
    }
}

/// A registered boot image.
///
/// Fields are declared in lexicographic order so the serialized document
/// keeps a stable key order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BootImage {
    /// Initrd file name under the image's content directory
    pub initrd: String,

    /// Kernel file name under the image's content directory
    pub kernel: String,

    /// Distribution, unique within the registry
    pub os_name: OsName,

    /// Optional edition; an empty value in the file means no variant
    #[serde(
        default,
        deserialize_with = "deserialize_variant",
        skip_serializing_if = "Option::is_none"
    )]
    pub variant: Option<Variant>,

    /// Free-form release version (e.g. "8.6")
    pub version: String,
}

impl BootImage {
    /// Create an image record without a variant.
    pub fn new(
        os_name: OsName,
        version: impl Into<String>,
        kernel: impl Into<String>,
        initrd: impl Into<String>,
    ) -> Self {
        Self {
            initrd: initrd.into(),
            kernel: kernel.into(),
            os_name,
            variant: None,
            version: version.into(),
        }
    }

    /// Same image tagged with a variant.
    pub fn with_variant(mut self, variant: Option<Variant>) -> Self {
        self.variant = variant;
        self
    }

    /// Path boot loaders use to reach the image on the TFTP/HTTP root:
    /// `images/{os_name}/{version}[/{variant}]`.
    pub fn tftp_dir(&self) -> String {
        match self.variant {
            Some(variant) => format!("images/{}/{}/{}", self.os_name, self.version, variant),
            None => format!("images/{}/{}", self.os_name, self.version),
        }
    }

    /// Directory, relative to the content root, that import copies the
    /// kernel and initrd into: `{os_name}[/{variant}]/{version}`.
    pub fn content_dir(&self) -> PathBuf {
        let mut dir = PathBuf::from(self.os_name.as_str());
        if let Some(variant) = self.variant {
            dir.push(variant.as_str());
        }
        dir.push(&self.version);
        dir
    }
}

fn deserialize_variant<'de, D>(deserializer: D) -> Result<Option<Variant>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(value) => Variant::parse_optional(&value).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tftp_dir_without_variant() {
        let image = BootImage::new(OsName::Ubuntu, "20.04", "vmlinuz", "initrd");
        assert_eq!(image.tftp_dir(), "images/ubuntu/20.04");
    }

    #[test]
    fn test_tftp_dir_with_variant() {
        let image = BootImage::new(OsName::Ubuntu, "20.04", "vmlinuz", "initrd")
            .with_variant(Some(Variant::Server));
        assert_eq!(image.tftp_dir(), "images/ubuntu/20.04/server");
    }

    #[test]
    fn test_content_dir_puts_variant_before_version() {
        let image = BootImage::new(OsName::Rocky, "8.6", "vmlinuz", "initrd.img")
            .with_variant(Some(Variant::Server));
        assert_eq!(image.content_dir(), PathBuf::from("rocky/server/8.6"));

        let plain = BootImage::new(OsName::Rocky, "8.6", "vmlinuz", "initrd.img");
        assert_eq!(plain.content_dir(), PathBuf::from("rocky/8.6"));
    }

    #[test]
    fn test_os_name_parse() {
        assert_eq!("rocky".parse::<OsName>(), Ok(OsName::Rocky));
        assert_eq!("OracleLinux".parse::<OsName>(), Ok(OsName::Oraclelinux));
        assert!("windows".parse::<OsName>().is_err(), "windows is not a supported os");
    }

    #[test]
    fn test_variant_parse_optional() {
        assert_eq!(Variant::parse_optional(""), Ok(None));
        assert_eq!(Variant::parse_optional("server"), Ok(Some(Variant::Server)));
        assert!(Variant::parse_optional("minimal").is_err());
    }

    #[test]
    fn test_empty_variant_in_yaml_reads_as_none() {
        let yaml = "initrd: initrd.img\nkernel: vmlinuz\nos_name: rocky\nvariant: ''\nversion: '8.6'\n";
        let image: BootImage = serde_yaml::from_str(yaml).expect("valid image yaml");
        assert_eq!(image.variant, None);
        assert_eq!(image.version, "8.6");
    }

    #[test]
    fn test_unknown_image_key_is_rejected() {
        let yaml = "arch: x86_64\ninitrd: initrd.img\nkernel: vmlinuz\nos_name: rocky\nversion: '8.6'\n";
        assert!(serde_yaml::from_str::<BootImage>(yaml).is_err(), "arch is not an image field");
    }
}
