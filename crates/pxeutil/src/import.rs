//! Image import
//!
//! Copies a kernel and initrd into the content tree under
//! `{images_dir}/{os_name}[/{variant}]/{version}/` and registers the image.
//!
//! By default a missing or uncopyable artifact is logged and the image is
//! registered anyway, which can leave a record pointing at a file that was
//! never copied. With `strict_import` the import fails before touching the
//! registry instead.

use crate::config::Settings;
use crate::error::{CopyError, PxeError};
use crate::registry::ImageRegistry;
use crate::store::DocumentStore;
use pxe_records::{BootImage, OsName, PxeDocument, Variant};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What to import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub os_name: OsName,
    pub version: String,
    pub variant: Option<Variant>,
    pub kernel: PathBuf,
    pub initrd: PathBuf,
}

/// Outcome of an import.
#[derive(Debug)]
pub struct ImportReport {
    /// The record that was registered
    pub image: BootImage,
    /// Directory the artifacts were copied into
    pub destination: PathBuf,
    /// Copy failures tolerated in lenient mode
    pub copy_errors: Vec<CopyError>,
    /// Document after the upsert
    pub document: PxeDocument,
}

/// Copies artifacts and registers images.
#[derive(Debug)]
pub struct ImportPipeline<'a, S: ?Sized> {
    registry: ImageRegistry<'a, S>,
    images_dir: PathBuf,
    strict: bool,
}

impl<'a, S: DocumentStore + ?Sized> ImportPipeline<'a, S> {
    /// Pipeline writing into `settings.images_dir()` and registering into `store`.
    pub fn new(store: &'a S, settings: &Settings) -> Self {
        Self {
            registry: ImageRegistry::new(store),
            images_dir: settings.images_dir(),
            strict: settings.strict_import,
        }
    }

    /// Copy the request's artifacts and upsert the image.
    pub fn run(&self, request: ImportRequest) -> Result<ImportReport, PxeError> {
        check_version(&request.version)?;
        let kernel_name = file_name(&request.kernel)?;
        let initrd_name = file_name(&request.initrd)?;

        let image = BootImage::new(request.os_name, request.version, kernel_name, initrd_name)
            .with_variant(request.variant);
        let destination = self.images_dir.join(image.content_dir());

        if self.strict {
            for source in [&request.kernel, &request.initrd] {
                if !source.is_file() {
                    return Err(CopyError::MissingSource {
                        path: source.clone(),
                    }
                    .into());
                }
            }
        }

        let mut copy_errors = Vec::new();
        for source in [&request.kernel, &request.initrd] {
            match copy_into(source, &destination) {
                Ok(copied) => info!("Copied {} to {}", source.display(), copied.display()),
                Err(err) if self.strict => return Err(err.into()),
                Err(err) => {
                    warn!("{err}; registering the image anyway");
                    copy_errors.push(err);
                }
            }
        }

        let document = self.registry.upsert(image.clone())?;
        Ok(ImportReport {
            image,
            destination,
            copy_errors,
            document,
        })
    }
}

/// The version becomes a directory under the content root, so it must not
/// climb out of it or nest.
fn check_version(version: &str) -> Result<(), PxeError> {
    let trimmed = version.trim();
    if trimmed.is_empty() || matches!(trimmed, "." | "..") || version.contains(['/', '\\']) {
        return Err(PxeError::InvalidVersion(version.to_string()));
    }
    Ok(())
}

fn file_name(path: &Path) -> Result<String, CopyError> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| CopyError::NoFileName {
            path: path.to_path_buf(),
        })
}

/// Copy `source` into `dir`, creating `dir` if needed. Returns the new path.
fn copy_into(source: &Path, dir: &Path) -> Result<PathBuf, CopyError> {
    if !source.is_file() {
        return Err(CopyError::MissingSource {
            path: source.to_path_buf(),
        });
    }
    let name = source.file_name().ok_or_else(|| CopyError::NoFileName {
        path: source.to_path_buf(),
    })?;
    let target = dir.join(name);

    let io_error = |err| CopyError::Io {
        from: source.to_path_buf(),
        to: target.clone(),
        source: err,
    };
    fs::create_dir_all(dir).map_err(io_error)?;
    fs::copy(source, &target).map_err(io_error)?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn settings(root: &Path, strict: bool) -> Settings {
        let mut settings = Settings::with_config_dir(root.join("config"));
        settings.tftp_dir = root.join("tftp");
        settings.strict_import = strict;
        settings
    }

    fn artifacts(root: &Path) -> (PathBuf, PathBuf) {
        let src = root.join("src");
        fs::create_dir_all(&src).expect("src dir");
        let kernel = src.join("vmlinuz");
        let initrd = src.join("initrd.img");
        fs::write(&kernel, b"kernel").expect("kernel");
        fs::write(&initrd, b"initrd").expect("initrd");
        (kernel, initrd)
    }

    #[test]
    fn test_import_copies_and_registers() {
        let root = tempfile::tempdir().expect("tempdir");
        let (kernel, initrd) = artifacts(root.path());
        let store = MemoryStore::new();

        let report = ImportPipeline::new(&store, &settings(root.path(), false))
            .run(ImportRequest {
                os_name: OsName::Rocky,
                version: "8.6".to_string(),
                variant: Some(Variant::Server),
                kernel,
                initrd,
            })
            .expect("import");

        let expected_dir = root.path().join("tftp/images/rocky/server/8.6");
        assert_eq!(report.destination, expected_dir);
        assert!(report.copy_errors.is_empty());
        assert_eq!(fs::read(expected_dir.join("vmlinuz")).expect("copied kernel"), b"kernel");
        assert!(expected_dir.join("initrd.img").is_file());

        let document = store.document();
        let image = &document.images()[0];
        assert_eq!(image.kernel, "vmlinuz", "only the base name is recorded");
        assert_eq!(image.initrd, "initrd.img");
        assert_eq!(image.variant, Some(Variant::Server));
    }

    #[test]
    fn test_lenient_import_registers_despite_missing_file() {
        let root = tempfile::tempdir().expect("tempdir");
        let store = MemoryStore::new();

        let report = ImportPipeline::new(&store, &settings(root.path(), false))
            .run(ImportRequest {
                os_name: OsName::Debian,
                version: "12".to_string(),
                variant: None,
                kernel: root.path().join("missing/linux"),
                initrd: root.path().join("missing/initrd.gz"),
            })
            .expect("lenient import succeeds");

        assert_eq!(report.copy_errors.len(), 2);
        assert!(matches!(report.copy_errors[0], CopyError::MissingSource { .. }));
        assert_eq!(store.document().images().len(), 1);
        assert!(!report.destination.exists(), "nothing was copied");
    }

    #[test]
    fn test_strict_import_fails_before_registering() {
        let root = tempfile::tempdir().expect("tempdir");
        let (kernel, _) = artifacts(root.path());
        let store = MemoryStore::new();

        let err = ImportPipeline::new(&store, &settings(root.path(), true))
            .run(ImportRequest {
                os_name: OsName::Rocky,
                version: "8.6".to_string(),
                variant: None,
                kernel,
                initrd: root.path().join("src/missing.img"),
            })
            .expect_err("strict import fails");

        assert!(matches!(err, PxeError::Copy(CopyError::MissingSource { .. })), "got {err:?}");
        assert_eq!(store.save_count(), 0, "registry untouched");
        assert!(!root.path().join("tftp/images/rocky/8.6/vmlinuz").exists());
    }

    #[test]
    fn test_path_without_file_name_is_rejected() {
        let root = tempfile::tempdir().expect("tempdir");
        let store = MemoryStore::new();

        let err = ImportPipeline::new(&store, &settings(root.path(), false))
            .run(ImportRequest {
                os_name: OsName::Rocky,
                version: "8.6".to_string(),
                variant: None,
                kernel: PathBuf::from("/"),
                initrd: PathBuf::from("initrd.img"),
            })
            .expect_err("no file name");
        assert!(matches!(err, PxeError::Copy(CopyError::NoFileName { .. })), "got {err:?}");
    }

    #[test]
    fn test_version_cannot_leave_content_root() {
        let root = tempfile::tempdir().expect("tempdir");
        let (kernel, initrd) = artifacts(root.path());
        let store = MemoryStore::new();
        let pipeline = ImportPipeline::new(&store, &settings(root.path(), false));

        for version in ["../../../escaped", "8/6", "..\\8.6", "..", "", "  "] {
            let err = pipeline
                .run(ImportRequest {
                    os_name: OsName::Rocky,
                    version: version.to_string(),
                    variant: None,
                    kernel: kernel.clone(),
                    initrd: initrd.clone(),
                })
                .expect_err("version must be rejected");
            assert!(matches!(err, PxeError::InvalidVersion(_)), "{version:?} gave {err:?}");
        }

        assert_eq!(store.save_count(), 0, "nothing registered");
        assert!(!root.path().join("escaped").exists(), "nothing copied outside the tree");
        assert!(!root.path().join("tftp").exists(), "nothing copied at all");
    }
}
