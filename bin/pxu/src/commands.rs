//! Command handlers
//!
//! Each handler performs at most one load-modify-save cycle against the
//! document and prints a short summary on stdout.

use crate::cli::{AssignArgs, Command, CreateArgs, ImportArgs, ListArgs, ListKind};
use anyhow::{Context, Result};
use pxe_records::BootMenu;
use pxeutil::{
    BootFileRenderer, DocumentStore, ImageRegistry, ImportPipeline, ImportRequest, MenuRegistry,
    Settings,
};
use tracing::warn;

/// Run `command` against `store`.
pub fn run<S: DocumentStore + ?Sized>(command: Command, settings: &Settings, store: &S) -> Result<()> {
    match command {
        Command::Import(args) => import(args, settings, store),
        Command::Create(args) => create(args, store),
        Command::Assign(args) => assign(args, settings, store),
        Command::List(args) => list(&args, store),
    }
}

fn import<S: DocumentStore + ?Sized>(args: ImportArgs, settings: &Settings, store: &S) -> Result<()> {
    let request = ImportRequest {
        os_name: args.os_name,
        version: args.os_version,
        variant: args.variant,
        kernel: args.kernel,
        initrd: args.initrd,
    };

    let report = ImportPipeline::new(store, settings)
        .run(request)
        .context("import failed")?;

    if !report.copy_errors.is_empty() {
        warn!(
            failures = report.copy_errors.len(),
            "Image registered but some artifacts were not copied"
        );
    }
    println!(
        "Imported {} {} into {}",
        report.image.os_name,
        report.image.version,
        report.destination.display()
    );
    Ok(())
}

fn create<S: DocumentStore + ?Sized>(args: CreateArgs, store: &S) -> Result<()> {
    let menu = BootMenu::new(args.menu_name, args.image, args.boot_args)
        .with_comment(args.comment)
        .with_vars(args.vars);
    let menu_name = menu.menu_name.clone();
    let image = menu.image.clone();

    let document = MenuRegistry::new(store)
        .upsert(menu)
        .with_context(|| format!("failed to save boot menu {menu_name}"))?;

    if document.find_image(&image).is_none() {
        warn!("Menu {menu_name} refers to image {image}, which has not been imported yet");
    }
    println!("Saved boot menu {menu_name} -> {image}");
    Ok(())
}

fn assign<S: DocumentStore + ?Sized>(args: AssignArgs, settings: &Settings, store: &S) -> Result<()> {
    let path = BootFileRenderer::new(store, settings)
        .assign(&args.menu, &args.mac, args.boot_mode)
        .with_context(|| format!("failed to assign menu {} to {}", args.menu, args.mac))?;

    println!("{}", path.display());
    Ok(())
}

fn list<S: DocumentStore + ?Sized>(args: &ListArgs, store: &S) -> Result<()> {
    if args.what != Some(ListKind::Menus) {
        let images = ImageRegistry::new(store)
            .list()
            .with_context(|| format!("failed to read {}", store.location()))?;
        println!("Images:");
        for image in images {
            let variant = image.variant.map(|v| format!(" ({v})")).unwrap_or_default();
            println!(
                "  {} {}{}  kernel={} initrd={}",
                image.os_name, image.version, variant, image.kernel, image.initrd
            );
        }
    }

    if args.what != Some(ListKind::Images) {
        let menus = MenuRegistry::new(store)
            .list()
            .with_context(|| format!("failed to read {}", store.location()))?;
        println!("Menus:");
        for menu in menus {
            let comment = menu.comment.map(|c| format!("  # {c}")).unwrap_or_default();
            println!(
                "  {} -> {}  [{}]{}",
                menu.menu_name, menu.image, menu.boot_args, comment
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pxe_records::{BootMode, OsName};
    use pxeutil::{MemoryStore, PxeError};
    use std::path::Path;

    fn settings(root: &Path) -> Settings {
        let mut settings = Settings::with_config_dir(root.join("config"));
        settings.tftp_dir = root.join("tftp");
        settings.work_dir = root.join("work");
        settings
    }

    fn create_args(name: &str, image: &str) -> CreateArgs {
        CreateArgs {
            menu_name: name.to_string(),
            image: image.to_string(),
            boot_args: "ip=dhcp".to_string(),
            comment: Some("rack 4".to_string()),
            vars: vec![("console".to_string(), "ttyS0".to_string())],
        }
    }

    #[test]
    fn test_create_stores_comment_and_vars() {
        let root = tempfile::tempdir().expect("tempdir");
        let store = MemoryStore::new();

        run(Command::Create(create_args("rocky8", "rocky")), &settings(root.path()), &store)
            .expect("create");

        let document = store.document();
        let menu = document.find_menu("rocky8").expect("menu saved");
        assert_eq!(menu.comment.as_deref(), Some("rack 4"));
        assert_eq!(menu.vars.get("console").map(String::as_str), Some("ttyS0"));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_create_reports_failed_save() {
        let root = tempfile::tempdir().expect("tempdir");
        let store = MemoryStore::failing_saves();

        let err = run(Command::Create(create_args("rocky8", "rocky")), &settings(root.path()), &store)
            .expect_err("save fails");
        assert!(err.to_string().contains("rocky8"), "context names the menu: {err}");
    }

    #[test]
    fn test_import_then_assign() {
        let root = tempfile::tempdir().expect("tempdir");
        let settings = settings(root.path());
        let store = MemoryStore::new();

        let src = root.path().join("iso");
        std::fs::create_dir_all(&src).expect("iso dir");
        std::fs::write(src.join("vmlinuz"), "k").expect("kernel");
        std::fs::write(src.join("initrd.img"), "i").expect("initrd");

        let import = ImportArgs {
            os_name: OsName::Rocky,
            os_version: "8.6".to_string(),
            kernel: src.join("vmlinuz"),
            initrd: src.join("initrd.img"),
            variant: None,
        };
        run(Command::Import(import), &settings, &store).expect("import");
        run(Command::Create(create_args("rocky8", "rocky")), &settings, &store).expect("create");

        let mac = "3cec-eff3-29be".parse().expect("mac");
        let assign = AssignArgs {
            mac,
            menu: "rocky8".to_string(),
            boot_mode: BootMode::Legacy,
        };
        run(Command::Assign(assign), &settings, &store).expect("assign");

        let written = std::fs::read_to_string(root.path().join("work/01-3c:ec:ef:f3:29:be"))
            .expect("pxelinux config written");
        assert!(written.contains("KERNEL images/rocky/8.6/vmlinuz"), "{written}");
    }

    #[test]
    fn test_assign_unknown_menu_is_not_found() {
        let root = tempfile::tempdir().expect("tempdir");
        let store = MemoryStore::new();
        let assign = AssignArgs {
            mac: "3C:EC:EF:F3:29:BE".parse().expect("mac"),
            menu: "missing".to_string(),
            boot_mode: BootMode::Uefi,
        };

        let err = run(Command::Assign(assign), &settings(root.path()), &store)
            .expect_err("no such menu");
        let cause = err.downcast_ref::<PxeError>().expect("PxeError underneath");
        assert!(cause.is_not_found(), "got {cause:?}");
        assert!(!root.path().join("work").exists(), "nothing written");
    }
}
