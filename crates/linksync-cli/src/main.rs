//! linksync CLI
//!
//! Two-way sync between a Firefox profile's bookmarks and a favorites folder.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(cmd) => execute_command(cmd, cli.config.as_deref()),
        None => {
            println!("{} Firefox bookmarks <-> favorites sync", "linksync".green().bold());
            println!();
            println!("Run {} for available commands.", "linksync --help".cyan());
            Ok(())
        }
    }
}

/// Log to stderr so `--json` output stays clean.
fn init_tracing(verbose: bool) {
    let builder = FmtSubscriber::builder().with_writer(std::io::stderr);
    let result = if verbose {
        tracing::subscriber::set_global_default(
            builder.with_max_level(Level::DEBUG).with_target(true).finish(),
        )
    } else {
        tracing::subscriber::set_global_default(
            builder
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
                )
                .finish(),
        )
    };
    match result {
        Ok(()) => tracing::debug!("Verbose mode enabled"),
        Err(e) => eprintln!("{}: {e}", "warning".yellow().bold()),
    }
}

fn execute_command(cmd: Commands, config: Option<&std::path::Path>) -> Result<()> {
    match cmd {
        Commands::Sync {
            stores,
            to_bookmarks,
            to_favorites,
            dry_run,
            no_backup,
            json,
        } => commands::run_sync(
            config,
            &stores,
            commands::SyncFlags {
                to_bookmarks,
                to_favorites,
                dry_run,
                no_backup,
                json,
            },
        ),
        Commands::Check { stores, json } => commands::run_check(config, &stores, json),
        Commands::Backup {
            stores,
            dir,
            keep,
            list,
        } => commands::run_backup(config, &stores, dir, keep, list),
    }
}
