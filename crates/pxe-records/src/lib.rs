//! pxeutil record definitions
//!
//! Typed records persisted by pxeutil: boot images, boot menus, and the
//! document that holds both collections. Also carries the client-side
//! vocabulary used when rendering boot files (boot mode, hardware address).

pub mod boot_image;
pub mod boot_menu;
pub mod boot_mode;
pub mod document;
pub mod mac;

pub use boot_image::*;
pub use boot_menu::*;
pub use boot_mode::*;
pub use document::*;
pub use mac::*;
