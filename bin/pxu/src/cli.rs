//! Command-line surface

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pxe_records::{BootMode, MacAddress, MacParseError, OsName, Variant};
use pxeutil::Settings;
use pxeutil::config::ENV_CONFIG_DIR;
use std::env;
use std::path::PathBuf;

/// Manage PXE boot images, boot menus and per-host boot files
#[derive(Debug, Parser)]
#[command(name = "pxu", author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Overrides for the PXEUTIL_* environment variables
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Directory holding pxeimages.yaml [env: PXEUTIL_CONFIG_DIR]
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Path of the image/menu document [env: PXEUTIL_DB_FILE]
    #[arg(long, global = true, value_name = "FILE")]
    pub db_file: Option<PathBuf>,

    /// TFTP root; images are copied under <DIR>/images [env: PXEUTIL_TFTP_DIR]
    #[arg(long, global = true, value_name = "DIR")]
    pub tftp_dir: Option<PathBuf>,

    /// Where boot files are written [env: PXEUTIL_WORK_DIR]
    #[arg(long, global = true, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Directory of grub.j2 / pxelinux.j2 / ipxe.j2 templates [env: PXEUTIL_TEMPLATE_DIR]
    #[arg(long, global = true, value_name = "DIR")]
    pub template_dir: Option<PathBuf>,

    /// Fail an import if the kernel or initrd cannot be copied [env: PXEUTIL_STRICT_IMPORT]
    #[arg(long, global = true)]
    pub strict_import: bool,
}

impl GlobalArgs {
    /// Settings from the environment with these flags applied on top.
    pub fn settings(&self) -> Result<Settings> {
        let config_dir = self.config_dir.clone();
        let mut settings = Settings::from_lookup(|key| match (key, &config_dir) {
            (ENV_CONFIG_DIR, Some(dir)) => Some(dir.display().to_string()),
            _ => env::var(key).ok(),
        })
        .context("failed to load settings")?;

        if let Some(db_file) = &self.db_file {
            settings.db_file = Some(db_file.clone());
        }
        if let Some(dir) = &self.tftp_dir {
            settings.tftp_dir = dir.clone();
        }
        if let Some(dir) = &self.work_dir {
            settings.work_dir = dir.clone();
        }
        if let Some(dir) = &self.template_dir {
            settings.template_dir = Some(dir.clone());
        }
        if self.strict_import {
            settings.strict_import = true;
        }
        Ok(settings)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Copy a kernel/initrd pair into the content tree and register the image
    Import(ImportArgs),

    /// Create or update a boot menu
    Create(CreateArgs),

    /// Render the boot file that assigns a menu to a host
    Assign(AssignArgs),

    /// Show registered images and menus
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// OS distribution name
    #[arg(short = 'n', long = "os_name", visible_alias = "os-name", value_enum)]
    pub os_name: OsName,

    /// OS version
    #[arg(short = 'v', long = "version")]
    pub os_version: String,

    /// Kernel file
    #[arg(short = 'k', long)]
    pub kernel: PathBuf,

    /// initrd file
    #[arg(short = 'i', long)]
    pub initrd: PathBuf,

    /// OS variant: server, workstation, desktop, or empty for none
    // Fully qualified Option: clap must hand "" to the parser instead of
    // treating the flag as optional
    #[arg(short = 't', long, value_parser = Variant::parse_optional, default_value = "")]
    pub variant: ::std::option::Option<Variant>,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Boot menu name
    #[arg(short = 'n', long = "name")]
    pub menu_name: String,

    /// OS name of the image to boot
    #[arg(short = 'i', long)]
    pub image: String,

    /// Kernel command-line arguments
    #[arg(short = 'a', long)]
    pub boot_args: String,

    /// Free-form note stored with the menu
    #[arg(short = 'c', long)]
    pub comment: Option<String>,

    /// Extra template variable, repeatable
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub vars: Vec<(String, String)>,
}

#[derive(Debug, Args)]
pub struct AssignArgs {
    /// Host MAC address
    #[arg(short = 'm', long, value_parser = parse_mac)]
    pub mac: MacAddress,

    /// Boot menu to assign
    #[arg(short = 'n', long)]
    pub menu: String,

    /// Client firmware boot path
    #[arg(short = 'b', long, value_enum, default_value_t = BootMode::Uefi)]
    pub boot_mode: BootMode,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only list one kind of record
    #[arg(value_enum)]
    pub what: Option<ListKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    Images,
    Menus,
}

fn parse_mac(s: &str) -> Result<MacAddress, MacParseError> {
    s.parse()
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got {s:?}")),
    }
}
