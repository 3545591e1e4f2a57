//! Image and menu registries
//!
//! Both registries run a single load-modify-save cycle per upsert against
//! the shared document and merge by key: an existing record with the same
//! key is overwritten in place, otherwise the new record is appended.

use crate::error::StoreError;
use crate::store::DocumentStore;
use pxe_records::{BootImage, BootMenu, PxeDocument, Upserted};
use tracing::info;

/// Boot images keyed by `os_name`.
#[derive(Debug)]
pub struct ImageRegistry<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: DocumentStore + ?Sized> ImageRegistry<'a, S> {
    /// Registry over `store`.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Insert or overwrite the image with the same `os_name` and persist.
    /// Returns the full updated document.
    pub fn upsert(&self, image: BootImage) -> Result<PxeDocument, StoreError> {
        let mut document = self.store.load()?;
        let os_name = image.os_name;
        let version = image.version.clone();

        match document.upsert_image(image) {
            Upserted::Inserted => info!(%os_name, %version, "Registered new pxe image"),
            Upserted::Updated(index) => {
                info!(%os_name, %version, index, "Updated existing pxe image");
            }
        }

        self.store.save(&document)?;
        Ok(document)
    }

    /// First image registered for `os_name`, if any.
    pub fn find(&self, os_name: &str) -> Result<Option<BootImage>, StoreError> {
        Ok(self.store.load()?.find_image(os_name).cloned())
    }

    /// All images in document order.
    pub fn list(&self) -> Result<Vec<BootImage>, StoreError> {
        Ok(self.store.load()?.images().to_vec())
    }
}

/// Boot menus keyed by `menu_name`.
///
/// The menu's `image` reference is not validated here; it is resolved when
/// a boot file is rendered.
#[derive(Debug)]
pub struct MenuRegistry<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: DocumentStore + ?Sized> MenuRegistry<'a, S> {
    /// Registry over `store`.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Insert or overwrite the menu with the same `menu_name` and persist.
    /// Returns the full updated document.
    pub fn upsert(&self, menu: BootMenu) -> Result<PxeDocument, StoreError> {
        let mut document = self.store.load()?;
        let menu_name = menu.menu_name.clone();
        let image = menu.image.clone();

        match document.upsert_menu(menu) {
            Upserted::Inserted => info!(%menu_name, %image, "Created boot menu"),
            Upserted::Updated(index) => info!(%menu_name, %image, index, "Updated boot menu"),
        }

        self.store.save(&document)?;
        Ok(document)
    }

    /// First menu named `menu_name`, if any.
    pub fn find(&self, menu_name: &str) -> Result<Option<BootMenu>, StoreError> {
        Ok(self.store.load()?.find_menu(menu_name).cloned())
    }

    /// All menus in document order.
    pub fn list(&self) -> Result<Vec<BootMenu>, StoreError> {
        Ok(self.store.load()?.menus().to_vec())
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;
