//! Configuration file for linksync
//!
//! A single `config.toml` names the Firefox profile and favorites
//! directories, the sync direction, exclusion lists and backup settings.
//! Every section is optional; command-line values are merged on top.

use crate::sync::SyncDirection;
use crate::{Error, Result};
use linksync_fs::SyncFile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_keep() -> usize {
    5
}

fn default_enabled() -> bool {
    true
}

/// Exclusion lists, one per store, in `/`-separated hierarchy form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionSection {
    pub bookmarks: Vec<String>,
    pub favorites: Vec<String>,
}

/// Backup settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupSection {
    /// Back up both stores before each sync
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Where backups go; defaults to the local data directory
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// How many backups to keep (0 keeps all)
    #[serde(default = "default_keep")]
    pub keep: usize,
}

impl Default for BackupSection {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            directory: None,
            keep: default_keep(),
        }
    }
}

/// Parsed `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Firefox profile directory holding `places.sqlite`
    pub profile: Option<PathBuf>,
    /// Root of the favorites tree
    pub favorites: Option<PathBuf>,
    pub direction: SyncDirection,
    pub exclusions: ExclusionSection,
    pub backup: BackupSection,
}

impl SyncConfig {
    /// Parse a configuration from TOML content
    ///
    /// ```
    /// use linksync_core::config::SyncConfig;
    ///
    /// let config = SyncConfig::parse(r#"
    /// profile = "/home/me/.mozilla/firefox/abc.default"
    ///
    /// [direction]
    /// to_favorites = false
    /// "#).unwrap();
    ///
    /// assert!(config.direction.to_bookmarks);
    /// assert!(!config.direction.to_favorites);
    /// assert_eq!(config.backup.keep, 5);
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config {
            message: e.to_string(),
        })
    }

    /// Load the configuration at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }
        let content =
            fs::read_to_string(path).map_err(|e| linksync_fs::Error::io(path, e))?;
        Self::parse(&content).map_err(|e| Error::Config {
            message: format!("{}: {e}", path.display()),
        })
    }

    /// `<config dir>/linksync/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("linksync").join("config.toml"))
    }

    /// Merge `other` on top of this configuration.
    ///
    /// Paths set in `other` win and exclusion entries are appended without
    /// duplicates. Direction and backup settings are left to the caller.
    pub fn merge(&mut self, other: &SyncConfig) {
        if other.profile.is_some() {
            self.profile.clone_from(&other.profile);
        }
        if other.favorites.is_some() {
            self.favorites.clone_from(&other.favorites);
        }
        if other.backup.directory.is_some() {
            self.backup.directory.clone_from(&other.backup.directory);
        }
        for entry in &other.exclusions.bookmarks {
            if !self.exclusions.bookmarks.contains(entry) {
                self.exclusions.bookmarks.push(entry.clone());
            }
        }
        for entry in &other.exclusions.favorites {
            if !self.exclusions.favorites.contains(entry) {
                self.exclusions.favorites.push(entry.clone());
            }
        }
    }

    /// The profile directory, which must exist.
    pub fn profile_dir(&self) -> Result<&Path> {
        existing_dir(self.profile.as_deref(), "profile")
    }

    /// The favorites root, which must exist.
    pub fn favorites_dir(&self) -> Result<&Path> {
        existing_dir(self.favorites.as_deref(), "favorites")
    }

    /// Path of `places.sqlite` inside the profile directory.
    pub fn places_path(&self) -> Result<PathBuf> {
        Ok(self.profile_dir()?.join(SyncFile::PlacesDatabase))
    }

    /// Configured backup directory, or `<local data dir>/linksync/backups`.
    pub fn backup_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.backup.directory {
            return Ok(dir.clone());
        }
        dirs::data_local_dir()
            .map(|dir| dir.join("linksync").join("backups"))
            .ok_or_else(|| Error::Config {
                message: "No backup directory configured and no local data directory available"
                    .to_string(),
            })
    }
}

fn existing_dir<'a>(dir: Option<&'a Path>, name: &str) -> Result<&'a Path> {
    let dir = dir.ok_or_else(|| Error::Config {
        message: format!("No {name} directory configured"),
    })?;
    if !dir.is_dir() {
        return Err(Error::Config {
            message: format!("The {name} directory does not exist: {}", dir.display()),
        });
    }
    Ok(dir)
}
