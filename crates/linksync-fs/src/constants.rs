//! Well-known file names used by linksync inside the synced stores.

use std::path::Path;

/// Extension of internet shortcut files in the favorites tree.
pub const SHORTCUT_EXTENSION: &str = "url";

/// Files linksync reads or writes at fixed locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncFile {
    /// The Firefox bookmark database inside a profile directory
    PlacesDatabase,
    /// Snapshot of the bookmark tree, kept in the profile directory
    BookmarksManifest,
    /// Snapshot of the favorites tree, kept in the favorites root
    FavoritesManifest,
    /// Description of a backup, kept in each backup directory
    BackupMetadata,
}

impl SyncFile {
    /// Get the file name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlacesDatabase => "places.sqlite",
            Self::BookmarksManifest => ".linksync-bookmarks.toml",
            Self::FavoritesManifest => ".linksync-favorites.toml",
            Self::BackupMetadata => "metadata.toml",
        }
    }
}

impl AsRef<Path> for SyncFile {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for SyncFile {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for SyncFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
