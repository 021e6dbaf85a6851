//! CLI argument parsing using clap derive

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// linksync - Keep Firefox bookmarks and a favorites folder in sync
#[derive(Parser, Debug)]
#[command(name = "linksync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to <config dir>/linksync/config.toml)
    #[arg(long, global = true, env = "LINKSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Store locations and exclusions, overriding the configuration file
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreArgs {
    /// Firefox profile directory containing places.sqlite
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Favorites root directory
    #[arg(long)]
    pub favorites: Option<PathBuf>,

    /// Bookmark path to leave alone, e.g. "Links/Private" (repeatable)
    #[arg(long = "exclude-bookmark", value_name = "PATH")]
    pub exclude_bookmarks: Vec<String>,

    /// Favorites path to leave alone, e.g. "Links/Private" (repeatable)
    #[arg(long = "exclude-favorite", value_name = "PATH")]
    pub exclude_favorites: Vec<String>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Synchronize bookmarks and favorites
    ///
    /// Examples:
    ///   linksync sync --profile ~/.mozilla/firefox/abc.default --favorites ~/Favorites
    ///   linksync sync --to-favorites   # only copy bookmark changes into favorites
    ///   linksync sync --dry-run        # show what would change
    Sync {
        #[command(flatten)]
        stores: StoreArgs,

        /// Only apply changes to the bookmark database
        #[arg(long)]
        to_bookmarks: bool,

        /// Only apply changes to the favorites tree
        #[arg(long)]
        to_favorites: bool,

        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,

        /// Skip the backup taken before syncing
        #[arg(long)]
        no_backup: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show what the next sync would do
    Check {
        #[command(flatten)]
        stores: StoreArgs,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Back up both stores
    Backup {
        #[command(flatten)]
        stores: StoreArgs,

        /// Backup directory
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Number of backups to keep (0 keeps all)
        #[arg(long)]
        keep: Option<usize>,

        /// List existing backups instead of creating one
        #[arg(long)]
        list: bool,
    },
}
