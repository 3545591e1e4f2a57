//! Boot file templates
//!
//! Templates are Jinja2 (`.j2`) text rendered with minijinja. The three
//! logical names are `grub` (UEFI), `pxelinux` (legacy BIOS) and `ipxe`.
//! Built-in versions are embedded below; pointing pxeutil at a template
//! directory replaces them wholesale.
//!
//! Variables available to every template:
//! - `menu_name`, `boot_args`, `comment`, `image` - from the menu
//! - `os_name`, `version`, `variant`, `kernel`, `initrd` - from the image
//! - `tftp_dir` - `images/{os_name}/{version}[/{variant}]`
//! - any extra `vars` stored on the menu

use crate::error::TemplateError;
use minijinja::Environment;
use serde::Serialize;
use std::borrow::Cow;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

/// GRUB config for UEFI clients.
pub const GRUB: &str = r#"set default=0
set timeout=5
{%- if comment %}
# {{ comment }}
{%- endif %}
menuentry '{{ menu_name }}' {
    linuxefi {{ tftp_dir }}/{{ kernel }} {{ boot_args }}
    initrdefi {{ tftp_dir }}/{{ initrd }}
}
"#;

/// pxelinux config for legacy BIOS clients.
pub const PXELINUX: &str = r#"DEFAULT {{ menu_name }}
PROMPT 0
TIMEOUT 50

LABEL {{ menu_name }}
    KERNEL {{ tftp_dir }}/{{ kernel }}
    APPEND initrd={{ tftp_dir }}/{{ initrd }} {{ boot_args }}
"#;

/// iPXE script for clients chainloaded from the boot ROM.
pub const IPXE: &str = r#"#!ipxe

kernel {{ tftp_dir }}/{{ kernel }} initrd={{ initrd }} {{ boot_args }}
initrd {{ tftp_dir }}/{{ initrd }}
boot
"#;

/// Built-in template by logical name.
pub fn builtin(name: &str) -> Option<&'static str> {
    match name {
        "grub" => Some(GRUB),
        "pxelinux" => Some(PXELINUX),
        "ipxe" => Some(IPXE),
        _ => None,
    }
}

/// Where template text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// The templates embedded in this crate
    Builtin,
    /// `{dir}/{name}.j2`
    Directory(PathBuf),
}

impl TemplateSource {
    /// Directory source when `dir` is set, built-ins otherwise.
    pub fn from_dir(dir: Option<PathBuf>) -> Self {
        dir.map_or(TemplateSource::Builtin, TemplateSource::Directory)
    }

    /// Template text for `name`.
    pub fn load(&self, name: &str) -> Result<Cow<'static, str>, TemplateError> {
        match self {
            TemplateSource::Builtin => builtin(name)
                .map(Cow::Borrowed)
                .ok_or_else(|| TemplateError::NotFound {
                    name: name.to_string(),
                    dir: PathBuf::from("<builtin>"),
                }),
            TemplateSource::Directory(dir) => {
                let path = dir.join(format!("{name}.j2"));
                debug!("Loading template {}", path.display());
                match fs::read_to_string(&path) {
                    Ok(text) => Ok(Cow::Owned(text)),
                    Err(err) if err.kind() == ErrorKind::NotFound => Err(TemplateError::NotFound {
                        name: name.to_string(),
                        dir: dir.clone(),
                    }),
                    Err(source) => Err(TemplateError::Read { path, source }),
                }
            }
        }
    }

    /// Render template `name` against `context`.
    pub fn render<C: Serialize>(&self, name: &str, context: &C) -> Result<String, TemplateError> {
        let text = self.load(name)?;
        let render_error = |source| TemplateError::Render {
            name: name.to_string(),
            source,
        };

        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        let template = env
            .template_from_named_str(name, &text)
            .map_err(render_error)?;
        template.render(context).map_err(render_error)
    }
}
