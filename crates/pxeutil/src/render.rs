//! Per-client boot file rendering
//!
//! Joins a boot menu with the image it references, derives the image's
//! TFTP path, and renders the template for the client's boot mode into
//! `{work_dir}/<mode specific name>`.

use crate::config::Settings;
use crate::error::{PxeError, TemplateError};
use crate::fsutil::write_atomic;
use crate::store::DocumentStore;
use crate::templates::TemplateSource;
use pxe_records::{BootImage, BootMenu, BootMode, MacAddress};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::{debug, info};

/// Key/value data handed to the template engine.
pub type RenderContext = Map<String, Value>;

/// Build the render context for `menu` booting `image`.
///
/// Precedence, lowest first: the menu's extra `vars`, the menu's own fields,
/// the image's fields, then the derived `tftp_dir`.
pub fn build_context(menu: &BootMenu, image: &BootImage) -> Result<RenderContext, TemplateError> {
    let mut context = RenderContext::new();
    for (key, value) in &menu.vars {
        context.insert(key.clone(), Value::String(value.clone()));
    }

    if let Value::Object(mut fields) = serde_json::to_value(menu)? {
        fields.remove("vars");
        context.extend(fields);
    }
    if let Value::Object(fields) = serde_json::to_value(image)? {
        context.extend(fields);
    }

    context.insert("tftp_dir".to_string(), Value::String(image.tftp_dir()));
    Ok(context)
}

/// Renders boot files for clients.
#[derive(Debug)]
pub struct BootFileRenderer<'a, S: ?Sized> {
    store: &'a S,
    templates: TemplateSource,
    work_dir: PathBuf,
}

impl<'a, S: DocumentStore + ?Sized> BootFileRenderer<'a, S> {
    /// Renderer reading menus and images from `store`, using the template
    /// source and work directory from `settings`.
    pub fn new(store: &'a S, settings: &Settings) -> Self {
        Self {
            store,
            templates: TemplateSource::from_dir(settings.template_dir.clone()),
            work_dir: settings.work_dir().to_path_buf(),
        }
    }

    /// Resolve `menu_name` to its menu and image and build the render context.
    pub fn resolve(&self, menu_name: &str) -> Result<RenderContext, PxeError> {
        let document = self.store.load()?;

        let menu = document
            .find_menu(menu_name)
            .ok_or_else(|| PxeError::MenuNotFound(menu_name.to_string()))?;
        let image = document
            .find_image(&menu.image)
            .ok_or_else(|| PxeError::ImageNotFound {
                menu: menu_name.to_string(),
                image: menu.image.clone(),
            })?;

        let context = build_context(menu, image)?;
        debug!(?context, "Resolved menu {menu_name}");
        Ok(context)
    }

    /// Where the boot file for `mac` in `mode` is written.
    pub fn output_path(&self, mode: BootMode, mac: &MacAddress) -> PathBuf {
        self.work_dir.join(mode.file_name(&mac.to_string()))
    }

    /// Render the boot file assigning `menu_name` to the client `mac`.
    ///
    /// Nothing is written unless the menu and its image resolve and the
    /// template renders; the write itself replaces any previous file
    /// atomically. Returns the path written.
    pub fn assign(
        &self,
        menu_name: &str,
        mac: &MacAddress,
        mode: BootMode,
    ) -> Result<PathBuf, PxeError> {
        let context = self.resolve(menu_name)?;
        let rendered = self.templates.render(mode.template_name(), &context)?;

        let path = self.output_path(mode, mac);
        write_atomic(&path, rendered.as_bytes()).map_err(|source| PxeError::BootFile {
            path: path.clone(),
            source,
        })?;

        info!(%mac, %mode, menu = menu_name, "Wrote {}", path.display());
        Ok(path)
    }
}
