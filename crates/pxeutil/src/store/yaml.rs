//! YAML file backed document store

use super::DocumentStore;
use crate::error::StoreError;
use crate::fsutil::write_atomic;
use pxe_records::PxeDocument;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Stores the document as a hand-editable YAML file.
///
/// Keys are written in lexicographic order so that diffs between runs stay
/// small. The parent directory is created on first save.
#[derive(Debug, Clone)]
pub struct YamlFileStore {
    path: PathBuf,
}

impl YamlFileStore {
    /// Store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for YamlFileStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<PxeDocument, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("{} not found, starting with an empty document", self.path.display());
                return Ok(PxeDocument::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if raw.trim().is_empty() {
            debug!("{} is empty", self.path.display());
            return Ok(PxeDocument::default());
        }

        // A bare `null`/`~` document is as good as an empty one
        let document: Option<PxeDocument> =
            serde_yaml::from_str(&raw).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        let document = document.unwrap_or_default();
        debug!(
            images = document.images().len(),
            menus = document.menus().len(),
            "Loaded {}",
            self.path.display()
        );
        Ok(document)
    }

    fn save(&self, document: &PxeDocument) -> Result<(), StoreError> {
        let yaml = serde_yaml::to_string(document).map_err(StoreError::Serialize)?;
        write_atomic(&self.path, yaml.as_bytes()).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!("Saved {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pxe_records::{BootImage, BootMenu, OsName};

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = YamlFileStore::new(dir.path().join("pxeimages.yaml"));

        let doc = store.load().expect("missing file is not an error");
        assert_eq!(doc, PxeDocument::default());
        assert!(!store.path().exists(), "load must not create the file");
    }

    #[test]
    fn test_empty_and_null_files_load_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        for (name, contents) in [("empty.yaml", ""), ("blank.yaml", "\n  \n"), ("null.yaml", "~\n")] {
            let path = dir.path().join(name);
            fs::write(&path, contents).expect("write fixture");
            let doc = YamlFileStore::new(&path).load().expect("loads");
            assert_eq!(doc, PxeDocument::default(), "{name} should load empty");
        }
    }

    #[test]
    fn test_save_creates_parent_and_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = YamlFileStore::new(dir.path().join("config/pxeutil/pxeimages.yaml"));

        let mut doc = PxeDocument::default();
        doc.upsert_image(BootImage::new(OsName::Rocky, "8.6", "vmlinuz", "initrd.img"));
        doc.upsert_menu(BootMenu::new("rocky8", "rocky", "ip=dhcp"));
        store.save(&doc).expect("save");

        assert_eq!(store.load().expect("reload"), doc);
    }

    #[test]
    fn test_hand_edited_file_without_images() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("pxeimages.yaml");
        fs::write(
            &path,
            "bootmenus:\n    -   boot_args: ip=dhcp\n        image: rocky\n        menu_name: rocky8\n",
        )
        .expect("write fixture");

        let doc = YamlFileStore::new(&path).load().expect("loads");
        assert!(doc.pxeimages.is_none());
        assert_eq!(doc.menus().len(), 1);
        assert_eq!(doc.menus()[0].comment, None);
    }

    #[test]
    fn test_stray_key_is_reported_not_dropped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("pxeimages.yaml");
        let raw = "bootmenus:\n-   boot_args: ip=dhcp\n    console: ttyS0\n    image: rocky\n    menu_name: rocky8\n";
        fs::write(&path, raw).expect("write fixture");

        let store = YamlFileStore::new(&path);
        let err = store.load().expect_err("unknown menu key");
        assert!(matches!(err, StoreError::Parse { .. }), "got {err:?}");

        let err = crate::registry::MenuRegistry::new(&store)
            .upsert(BootMenu::new("other", "debian", ""))
            .expect_err("upsert must not rewrite a file it cannot read");
        assert!(matches!(err, StoreError::Parse { .. }), "got {err:?}");
        assert_eq!(fs::read_to_string(&path).expect("read back"), raw, "file untouched");
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("pxeimages.yaml");
        fs::write(&path, "pxeimages: [ {os_name: windows").expect("write fixture");

        let err = YamlFileStore::new(&path).load().expect_err("corrupt file");
        assert!(matches!(err, StoreError::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn test_save_into_unwritable_location_is_write_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").expect("write blocker");

        let store = YamlFileStore::new(blocker.join("pxeimages.yaml"));
        let err = store.save(&PxeDocument::default()).expect_err("parent is a file");
        assert!(matches!(err, StoreError::Write { .. }), "got {err:?}");
    }
}
