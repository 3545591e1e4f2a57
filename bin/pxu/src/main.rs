//! pxu
//!
//! Manages network-boot configuration from the command line:
//! - `import`: copy a kernel/initrd pair into the TFTP tree and register it
//! - `create`: define a boot menu (image + kernel arguments)
//! - `assign`: render the per-host GRUB, pxelinux or iPXE file for a MAC
//! - `list`: show what is registered
//!
//! Logs go to stderr and are filtered with `RUST_LOG` (default `info`).

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use pxeutil::YamlFileStore;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let settings = cli.global.settings()?;
    debug!("Using document {}", settings.db_path().display());
    let store = YamlFileStore::new(settings.db_path());

    commands::run(cli.command, &settings, &store)
}
