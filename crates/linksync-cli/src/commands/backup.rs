//! Backup command implementation

use std::path::{Path, PathBuf};

use colored::Colorize;
use linksync_core::BackupManager;

use super::load_config;
use crate::cli::StoreArgs;
use crate::error::Result;

/// Run the backup command
///
/// Creates a backup of both stores, or lists existing ones with `list`.
pub fn run_backup(
    config_path: Option<&Path>,
    stores: &StoreArgs,
    dir: Option<PathBuf>,
    keep: Option<usize>,
    list: bool,
) -> Result<()> {
    let mut config = load_config(config_path, stores)?;
    if dir.is_some() {
        config.backup.directory = dir;
    }
    let manager = BackupManager::new(&config.backup_dir()?, keep.unwrap_or(config.backup.keep));

    if list {
        let backups = manager.list_backups()?;
        if backups.is_empty() {
            println!("No backups in {}", manager.backups_dir());
        }
        for backup in backups {
            println!(
                "{} {} ({} files)",
                backup.metadata.created.format("%Y-%m-%d %H:%M:%S").to_string().cyan(),
                backup.path,
                backup.metadata.files.len()
            );
        }
        return Ok(());
    }

    let backup = manager.create_backup(config.profile_dir()?, config.favorites_dir()?)?;
    println!(
        "{} Backed up {} files to {}",
        "OK".green().bold(),
        backup.metadata.files.len(),
        backup.path
    );
    Ok(())
}
