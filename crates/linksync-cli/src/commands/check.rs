//! Check command implementation

use std::path::Path;

use colored::Colorize;
use linksync_core::CheckStatus;

use super::{build_engine, load_config};
use crate::cli::StoreArgs;
use crate::error::Result;

/// Run the check command
///
/// Plans a sync without changing either store and reports the result.
pub fn run_check(config_path: Option<&Path>, stores: &StoreArgs, json: bool) -> Result<()> {
    let config = load_config(config_path, stores)?;
    let mut engine = build_engine(&config)?;
    let report = engine.check()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match report.status {
        CheckStatus::InSync => {
            println!("{} Bookmarks and favorites are in sync.", "OK".green().bold());
        }
        CheckStatus::FirstRun => {
            println!(
                "{} Never synced. The first sync merges both stores:",
                "NEW".cyan().bold()
            );
            for op in &report.pending {
                println!("   {} {}", "+".cyan(), op);
            }
        }
        CheckStatus::Pending => {
            println!("{} Changes waiting to sync:", "PENDING".yellow().bold());
            for op in &report.pending {
                println!("   {} {}", "-".yellow(), op);
            }
            println!();
            println!("Run {} to apply.", "linksync sync".cyan());
        }
        CheckStatus::Broken => {
            println!("{} Sync state is broken:", "BROKEN".red().bold());
            for msg in &report.messages {
                println!("   {} {}", "!".red(), msg);
            }
            println!();
            println!("Manual intervention may be required.");
        }
    }
    if report.suppressed > 0 {
        println!(
            "   {}",
            format!("{} changes already present on both sides", report.suppressed).dimmed()
        );
    }

    Ok(())
}
