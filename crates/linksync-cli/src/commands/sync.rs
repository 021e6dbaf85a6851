//! Sync command implementation

use std::path::Path;

use colored::Colorize;
use linksync_core::{BackupManager, SyncDirection, SyncOptions, SyncReport};

use super::{build_engine, load_config};
use crate::cli::StoreArgs;
use crate::error::{CliError, Result};

/// Switches of the sync command
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncFlags {
    pub to_bookmarks: bool,
    pub to_favorites: bool,
    pub dry_run: bool,
    pub no_backup: bool,
    pub json: bool,
}

impl SyncFlags {
    /// Either direction flag restricts the run to the flagged stores.
    fn direction(&self, configured: SyncDirection) -> SyncDirection {
        if self.to_bookmarks || self.to_favorites {
            SyncDirection {
                to_bookmarks: self.to_bookmarks,
                to_favorites: self.to_favorites,
            }
        } else {
            configured
        }
    }
}

/// Run the sync command
pub fn run_sync(config_path: Option<&Path>, stores: &StoreArgs, flags: SyncFlags) -> Result<()> {
    let config = load_config(config_path, stores)?;
    let options = SyncOptions {
        dry_run: flags.dry_run,
        direction: flags.direction(config.direction),
    };

    if !flags.json {
        println!(
            "{} Synchronizing bookmarks and favorites...",
            "=>".blue().bold()
        );
    }

    if config.backup.enabled && !flags.no_backup && !flags.dry_run {
        let manager = BackupManager::new(&config.backup_dir()?, config.backup.keep);
        let backup = manager.create_backup(config.profile_dir()?, config.favorites_dir()?)?;
        if !flags.json {
            println!("   {} Backup saved to {}", "*".dimmed(), backup.path);
        }
    }

    let mut engine = build_engine(&config)?;
    let report = engine.sync_with_options(options)?;

    if flags.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if !report.success {
        return Err(CliError::user(format!(
            "{} operations failed and will be retried on the next sync",
            report.errors.len()
        )));
    }
    Ok(())
}

fn print_report(report: &SyncReport) {
    if report.dry_run {
        if report.actions.is_empty() {
            println!("{} Dry run: nothing to do.", "OK".green().bold());
        } else {
            println!("{} Dry run, no changes made:", "PLAN".cyan().bold());
            for action in &report.actions {
                println!("   {} {}", "~".cyan(), action);
            }
        }
        return;
    }

    if report.success {
        if report.actions.is_empty() {
            println!("{} Already synchronized. No changes needed.", "OK".green().bold());
        } else {
            println!("{} Synchronization complete:", "OK".green().bold());
            for action in &report.actions {
                println!("   {} {}", "+".green(), action);
            }
        }
    } else {
        println!("{} Synchronization incomplete:", "ERROR".red().bold());
        for action in &report.actions {
            println!("   {} {}", "+".green(), action);
        }
        for error in &report.errors {
            println!("   {} {}", "!".red(), error);
        }
    }

    for skipped in &report.skipped {
        println!("   {} {}", "-".dimmed(), skipped.dimmed());
    }
}
