//! pxeutil errors

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reading or writing the persisted document.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("failed to save {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Errors loading or rendering a boot file template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("could not find template {name} in {}", dir.display())]
    NotFound { name: String, dir: PathBuf },

    #[error("failed to read template {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to build render context: {0}")]
    Context(#[from] serde_json::Error),

    #[error("failed to render template {name}: {source}")]
    Render {
        name: String,
        source: minijinja::Error,
    },
}

/// Errors copying kernel/initrd artifacts into the content tree.
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("{} is not an existing regular file", path.display())]
    MissingSource { path: PathBuf },

    #[error("{} has no file name", path.display())]
    NoFileName { path: PathBuf },

    #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
    Io {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// Errors surfaced by pxeutil commands.
#[derive(Debug, Error)]
pub enum PxeError {
    #[error("Menu {0} does not exist")]
    MenuNotFound(String),

    #[error("Cannot find pxe image {image:?} for menu {menu}")]
    ImageNotFound { menu: String, image: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Copy error: {0}")]
    Copy(#[from] CopyError),

    #[error("Failed to write boot file {}: {source}", path.display())]
    BootFile { path: PathBuf, source: io::Error },

    #[error("Invalid image version {0:?}: must be a single path component")]
    InvalidVersion(String),

    #[error("Configuration error: {0}")]
    InvalidConfig(String),
}

impl PxeError {
    /// True for the two resolution failures of `assign`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PxeError::MenuNotFound(_) | PxeError::ImageNotFound { .. })
    }
}
