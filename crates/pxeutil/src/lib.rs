//! pxeutil
//!
//! Network-boot configuration management: a registry of boot images
//! (kernel/initrd pairs per distribution release), named boot menus that
//! point at an image with a kernel command line, and per-client boot files
//! rendered for UEFI (GRUB), legacy BIOS (pxelinux) or iPXE clients.
//!
//! All state lives in one YAML document. The pieces:
//! - [`store`]: load/save of that document ([`DocumentStore`])
//! - [`registry`]: merge-by-key upserts of images and menus
//! - [`render`]: menu + image resolution and boot file rendering
//! - [`import`]: copying artifacts into the content tree
//! - [`config`]: directories and policies for an invocation
//!
//! # Example
//!
//! ```no_run
//! use pxeutil::{BootFileRenderer, MenuRegistry, Settings, YamlFileStore};
//! use pxe_records::{BootMenu, BootMode};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::from_env()?;
//! let store = YamlFileStore::new(settings.db_path());
//!
//! MenuRegistry::new(&store).upsert(BootMenu::new("rocky8", "rocky", "ip=dhcp"))?;
//!
//! let mac = "3C:EC:EF:F3:29:BE".parse()?;
//! let path = BootFileRenderer::new(&store, &settings).assign("rocky8", &mac, BootMode::Uefi)?;
//! println!("wrote {}", path.display());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
mod fsutil;
pub mod import;
pub mod registry;
pub mod render;
pub mod store;
pub mod templates;

pub use config::Settings;
pub use error::*;
pub use import::{ImportPipeline, ImportReport, ImportRequest};
pub use registry::{ImageRegistry, MenuRegistry};
pub use render::{BootFileRenderer, RenderContext, build_context};
pub use store::{DocumentStore, YamlFileStore};
#[cfg(feature = "test-util")]
pub use store::MemoryStore;
pub use templates::TemplateSource;
