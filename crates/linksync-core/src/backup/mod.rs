//! Backups of both stores taken before a sync
//!
//! Each backup is a timestamped directory holding a copy of
//! `places.sqlite`, the bookmarks manifest, the whole favorites tree and a
//! `metadata.toml` describing what was copied.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use linksync_fs::{NormalizedPath, SyncFile, io};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Directory inside a backup that holds the favorites tree copy
const FAVORITES_DIR: &str = "favorites";

/// Metadata for a backup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupMetadata {
    /// When the backup was created
    pub created: DateTime<Utc>,
    /// Profile directory the database was copied from
    pub profile: String,
    /// Favorites root the tree was copied from
    pub favorites: String,
    /// Backed up files, relative to the backup directory
    pub files: Vec<String>,
}

/// Information about one backup
#[derive(Debug, Clone)]
pub struct Backup {
    /// Path to the backup directory
    pub path: NormalizedPath,
    pub metadata: BackupMetadata,
}

/// Manages backups under one directory
pub struct BackupManager {
    backups_dir: NormalizedPath,
    /// Number of backups to retain; 0 keeps all
    keep: usize,
}

impl BackupManager {
    pub fn new(backups_dir: &Path, keep: usize) -> Self {
        Self {
            backups_dir: NormalizedPath::new(backups_dir),
            keep,
        }
    }

    pub fn backups_dir(&self) -> &NormalizedPath {
        &self.backups_dir
    }

    /// Copy both stores into a new backup, then prune old ones.
    ///
    /// Missing sources are skipped; the favorites root must exist.
    pub fn create_backup(&self, profile_dir: &Path, favorites_dir: &Path) -> Result<Backup> {
        if !favorites_dir.is_dir() {
            return Err(Error::Backup {
                message: format!("Favorites directory not found: {}", favorites_dir.display()),
            });
        }

        let created = Utc::now();
        let backup_dir = self.unique_dir(&created);
        create_dir(&backup_dir)?;

        let mut files = Vec::new();
        for file in [SyncFile::PlacesDatabase, SyncFile::BookmarksManifest] {
            let source = profile_dir.join(file);
            if source.is_file() {
                copy_file(&source, &backup_dir.join(file.as_str()))?;
                files.push(file.as_str().to_string());
            }
        }

        let favorites_root = NormalizedPath::new(favorites_dir);
        let favorites_copy = backup_dir.join(FAVORITES_DIR);
        for entry in WalkDir::new(favorites_dir).follow_links(false).sort_by_file_name() {
            let entry = entry?;
            // The root itself has no segments below it.
            let Some(relative) = NormalizedPath::new(entry.path()).segments_below(&favorites_root) else {
                create_dir(&favorites_copy)?;
                continue;
            };
            let name = entry.file_name().to_string_lossy();
            let dest = favorites_copy.join_all(&relative).join(&name);
            if entry.file_type().is_dir() {
                create_dir(&dest)?;
            } else if entry.file_type().is_file() {
                copy_file(entry.path(), &dest)?;
                let mut parts = vec![FAVORITES_DIR.to_string()];
                parts.extend(relative);
                parts.push(name.into_owned());
                files.push(parts.join("/"));
            }
        }

        let metadata = BackupMetadata {
            created,
            profile: NormalizedPath::new(profile_dir).as_str().to_string(),
            favorites: favorites_root.as_str().to_string(),
            files,
        };
        let content = toml::to_string_pretty(&metadata)?;
        io::write_atomic(&backup_dir.join(SyncFile::BackupMetadata.as_str()), content.as_bytes())?;

        tracing::info!(path = %backup_dir, files = metadata.files.len(), "Created backup");
        let backup = Backup {
            path: backup_dir,
            metadata,
        };

        let pruned = self.prune()?;
        if pruned > 0 {
            tracing::debug!(pruned, "Pruned old backups");
        }
        Ok(backup)
    }

    /// List all backups, oldest first.
    ///
    /// Directories without readable metadata are ignored.
    pub fn list_backups(&self) -> Result<Vec<Backup>> {
        if !self.backups_dir.is_dir() {
            return Ok(Vec::new());
        }

        let native = self.backups_dir.to_native();
        let mut backups = Vec::new();
        for entry in fs::read_dir(&native).map_err(|e| linksync_fs::Error::io(&native, e))? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let path = NormalizedPath::new(entry.path());
            let metadata_path = path.join(SyncFile::BackupMetadata.as_str());
            if !metadata_path.is_file() {
                continue;
            }
            match io::read_text(&metadata_path)
                .map_err(Error::from)
                .and_then(|content| toml::from_str::<BackupMetadata>(&content).map_err(Error::from))
            {
                Ok(metadata) => backups.push(Backup { path, metadata }),
                Err(e) => tracing::warn!(path = %path, "Ignoring backup: {e}"),
            }
        }

        backups.sort_by(|a, b| {
            a.metadata
                .created
                .cmp(&b.metadata.created)
                .then_with(|| a.path.as_str().cmp(b.path.as_str()))
        });
        Ok(backups)
    }

    /// Delete the oldest backups beyond the retention count.
    ///
    /// Returns the number of backups deleted.
    pub fn prune(&self) -> Result<usize> {
        if self.keep == 0 {
            return Ok(0);
        }
        let backups = self.list_backups()?;
        let excess = backups.len().saturating_sub(self.keep);
        for backup in &backups[..excess] {
            io::remove_dir_all(&backup.path)?;
        }
        Ok(excess)
    }

    fn unique_dir(&self, created: &DateTime<Utc>) -> NormalizedPath {
        let stamp = created.format("%Y%m%d-%H%M%S-%3f").to_string();
        let mut candidate = self.backups_dir.join(&stamp);
        let mut suffix = 1;
        while candidate.exists() {
            candidate = self.backups_dir.join(&format!("{stamp}-{suffix}"));
            suffix += 1;
        }
        candidate
    }
}

fn create_dir(path: &NormalizedPath) -> Result<()> {
    let native = path.to_native();
    fs::create_dir_all(&native).map_err(|e| linksync_fs::Error::io(&native, e))?;
    Ok(())
}

fn copy_file(source: &Path, dest: &NormalizedPath) -> Result<()> {
    fs::copy(source, dest.to_native()).map_err(|e| linksync_fs::Error::io(source, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sources(temp: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
        let profile = temp.path().join("profile");
        let favorites = temp.path().join("favorites");
        fs::create_dir_all(&profile).unwrap();
        fs::create_dir_all(favorites.join("Links").join("Work")).unwrap();
        fs::write(profile.join("places.sqlite"), b"db").unwrap();
        fs::write(
            favorites.join("Links").join("Work").join("site.url"),
            "[InternetShortcut]\r\nURL=http://example.com\r\n",
        )
        .unwrap();
        (profile, favorites)
    }

    #[test]
    fn backup_copies_database_and_tree() {
        let temp = TempDir::new().unwrap();
        let (profile, favorites) = sources(&temp);
        let manager = BackupManager::new(&temp.path().join("backups"), 5);

        let backup = manager.create_backup(&profile, &favorites).unwrap();

        assert_eq!(
            backup.metadata.files,
            vec![
                "places.sqlite".to_string(),
                "favorites/Links/Work/site.url".to_string()
            ]
        );
        let root = backup.path.to_native();
        assert_eq!(fs::read(root.join("places.sqlite")).unwrap(), b"db");
        assert!(root.join("favorites/Links/Work/site.url").is_file());
        assert!(root.join("metadata.toml").is_file());
    }

    #[test]
    fn list_reads_metadata_back() {
        let temp = TempDir::new().unwrap();
        let (profile, favorites) = sources(&temp);
        let manager = BackupManager::new(&temp.path().join("backups"), 0);

        let created = manager.create_backup(&profile, &favorites).unwrap();
        fs::create_dir_all(temp.path().join("backups").join("stray")).unwrap();

        let listed = manager.list_backups().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].metadata, created.metadata);
    }

    #[test]
    fn prune_keeps_newest() {
        let temp = TempDir::new().unwrap();
        let (profile, favorites) = sources(&temp);
        let manager = BackupManager::new(&temp.path().join("backups"), 2);

        let mut created = Vec::new();
        for _ in 0..3 {
            created.push(manager.create_backup(&profile, &favorites).unwrap());
        }

        let listed = manager.list_backups().unwrap();
        assert_eq!(listed.len(), 2);
        assert!(!created[0].path.exists());
        assert!(created[2].path.exists());
    }

    #[test]
    fn missing_favorites_is_an_error() {
        let temp = TempDir::new().unwrap();
        let manager = BackupManager::new(&temp.path().join("backups"), 5);
        let result = manager.create_backup(temp.path(), &temp.path().join("absent"));
        assert!(matches!(result, Err(Error::Backup { .. })));
    }

    #[test]
    fn no_backups_dir_lists_nothing() {
        let temp = TempDir::new().unwrap();
        let manager = BackupManager::new(&temp.path().join("none"), 5);
        assert!(manager.list_backups().unwrap().is_empty());
    }
}
