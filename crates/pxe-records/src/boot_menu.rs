//! BootMenu record
//!
//! Names a boot image and the kernel command line to boot it with.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named boot menu.
///
/// `image` refers to a [`crate::BootImage`] by its `os_name`. The reference
/// is not checked when the menu is created; it is resolved when a boot file
/// is rendered, so menus may be written before their image is imported.
///
/// Unknown keys are rejected rather than dropped on the next save; extra
/// template data belongs under `vars`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BootMenu {
    /// Kernel command-line arguments
    #[serde(default)]
    pub boot_args: String,

    /// Free-form note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// `os_name` of the image this menu boots
    pub image: String,

    /// Menu name, unique within the registry
    pub menu_name: String,

    /// Extra template variables. Record fields and image fields win over
    /// these on name collision when a boot file is rendered.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vars: BTreeMap<String, String>,
}

impl BootMenu {
    /// Create a menu without a comment.
    pub fn new(
        menu_name: impl Into<String>,
        image: impl Into<String>,
        boot_args: impl Into<String>,
    ) -> Self {
        Self {
            boot_args: boot_args.into(),
            comment: None,
            image: image.into(),
            menu_name: menu_name.into(),
            vars: BTreeMap::new(),
        }
    }

    /// Same menu with a comment; blank comments are dropped.
    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment.filter(|c| !c.trim().is_empty());
        self
    }

    /// Same menu with extra template variables.
    pub fn with_vars(mut self, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        self.vars.extend(vars);
        self
    }
}
