//! Persisted document
//!
//! Both registries live in one document with two independent collections,
//! `bootmenus` and `pxeimages`. Either may be absent: an absent collection
//! reads as empty and is created on first insert, so callers never have to
//! special-case a fresh file.

use crate::boot_image::BootImage;
use crate::boot_menu::BootMenu;
use serde::{Deserialize, Serialize};

/// Result of an upsert, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    /// No record had the key; the new one was appended
    Inserted,
    /// An existing record was overwritten in place at this index
    Updated(usize),
}

/// The whole pxeutil document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PxeDocument {
    /// Boot menus in insertion order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootmenus: Option<Vec<BootMenu>>,

    /// Boot images in insertion order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pxeimages: Option<Vec<BootImage>>,
}

impl PxeDocument {
    /// Registered images; empty when the collection is absent.
    pub fn images(&self) -> &[BootImage] {
        self.pxeimages.as_deref().unwrap_or_default()
    }

    /// Registered menus; empty when the collection is absent.
    pub fn menus(&self) -> &[BootMenu] {
        self.bootmenus.as_deref().unwrap_or_default()
    }

    /// Insert or overwrite the image with the same `os_name`.
    pub fn upsert_image(&mut self, image: BootImage) -> Upserted {
        let images = self.pxeimages.get_or_insert_with(Vec::new);
        upsert_by(images, image, |i| i.os_name)
    }

    /// Insert or overwrite the menu with the same `menu_name`.
    pub fn upsert_menu(&mut self, menu: BootMenu) -> Upserted {
        let menus = self.bootmenus.get_or_insert_with(Vec::new);
        upsert_by(menus, menu, |m| m.menu_name.clone())
    }

    /// First image whose `os_name` matches.
    pub fn find_image(&self, os_name: &str) -> Option<&BootImage> {
        self.images().iter().find(|i| i.os_name.as_str() == os_name)
    }

    /// First menu whose `menu_name` matches.
    pub fn find_menu(&self, menu_name: &str) -> Option<&BootMenu> {
        self.menus().iter().find(|m| m.menu_name == menu_name)
    }
}

fn upsert_by<T, K, F>(items: &mut Vec<T>, item: T, key: F) -> Upserted
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let wanted = key(&item);
    match items.iter().position(|existing| key(existing) == wanted) {
        Some(index) => {
            items[index] = item;
            Upserted::Updated(index)
        }
        None => {
            items.push(item);
            Upserted::Inserted
        }
    }
}
