//! Runtime settings
//!
//! Every directory pxeutil touches is carried in [`Settings`] and handed to
//! components when they are built. Defaults match a single-host lab setup:
//! the document under the user's data directory, content and boot files
//! under `/tmp`.

use crate::error::PxeError;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Env var overriding the directory that holds the document.
pub const ENV_CONFIG_DIR: &str = "PXEUTIL_CONFIG_DIR";
/// Env var overriding the document path itself.
pub const ENV_DB_FILE: &str = "PXEUTIL_DB_FILE";
/// Env var overriding the TFTP root.
pub const ENV_TFTP_DIR: &str = "PXEUTIL_TFTP_DIR";
/// Env var overriding where rendered boot files are written.
pub const ENV_WORK_DIR: &str = "PXEUTIL_WORK_DIR";
/// Env var pointing at a directory of `{name}.j2` templates.
pub const ENV_TEMPLATE_DIR: &str = "PXEUTIL_TEMPLATE_DIR";
/// Env var turning missing import artifacts into a hard failure.
pub const ENV_STRICT_IMPORT: &str = "PXEUTIL_STRICT_IMPORT";

/// File name of the document inside the config directory.
pub const DB_FILE_NAME: &str = "pxeimages.yaml";

const DEFAULT_TFTP_DIR: &str = "/tmp";
const DEFAULT_WORK_DIR: &str = "/tmp";

/// Directories and policies for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding the document
    pub config_dir: PathBuf,

    /// Explicit document path; `{config_dir}/pxeimages.yaml` when unset
    pub db_file: Option<PathBuf>,

    /// TFTP root; imported artifacts go under `{tftp_dir}/images`
    pub tftp_dir: PathBuf,

    /// Where per-client boot files are written
    pub work_dir: PathBuf,

    /// Template directory; built-in templates are used when unset
    pub template_dir: Option<PathBuf>,

    /// Fail an import when an artifact cannot be copied instead of
    /// registering the image anyway
    pub strict_import: bool,
}

impl Settings {
    /// Settings rooted at `config_dir` with every other value defaulted.
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            db_file: None,
            tftp_dir: PathBuf::from(DEFAULT_TFTP_DIR),
            work_dir: PathBuf::from(DEFAULT_WORK_DIR),
            template_dir: None,
            strict_import: false,
        }
    }

    /// Settings from the process environment.
    pub fn from_env() -> Result<Self, PxeError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Settings from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PxeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config_dir = match var(ENV_CONFIG_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => default_config_dir(&var)?,
        };

        let mut settings = Self::with_config_dir(config_dir);
        settings.db_file = var(ENV_DB_FILE).map(PathBuf::from);
        if let Some(dir) = var(ENV_TFTP_DIR) {
            settings.tftp_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var(ENV_WORK_DIR) {
            settings.work_dir = PathBuf::from(dir);
        }
        settings.template_dir = var(ENV_TEMPLATE_DIR).map(PathBuf::from);
        if let Some(flag) = var(ENV_STRICT_IMPORT) {
            settings.strict_import = parse_flag(ENV_STRICT_IMPORT, &flag)?;
        }

        debug!(?settings, "Loaded settings");
        Ok(settings)
    }

    /// Path of the persisted document.
    pub fn db_path(&self) -> PathBuf {
        self.db_file
            .clone()
            .unwrap_or_else(|| self.config_dir.join(DB_FILE_NAME))
    }

    /// Root of the content tree that import copies artifacts into.
    pub fn images_dir(&self) -> PathBuf {
        self.tftp_dir.join("images")
    }

    /// Directory boot files are written to.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }
}

/// `$XDG_DATA_HOME/pxeutil`, falling back to `$HOME/.local/share/pxeutil`.
fn default_config_dir<F>(var: &F) -> Result<PathBuf, PxeError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(data_home) = var("XDG_DATA_HOME") {
        return Ok(PathBuf::from(data_home).join("pxeutil"));
    }
    var("HOME")
        .map(|home| PathBuf::from(home).join(".local/share/pxeutil"))
        .ok_or_else(|| {
            PxeError::InvalidConfig(format!(
                "neither HOME nor XDG_DATA_HOME is set; set {ENV_CONFIG_DIR}"
            ))
        })
}

fn parse_flag(key: &str, value: &str) -> Result<bool, PxeError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(PxeError::InvalidConfig(format!(
            "{key} must be a boolean, got {other:?}"
        ))),
    }
}
