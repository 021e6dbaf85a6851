//! Error types for linksync-core

use std::path::PathBuf;

/// Result type for linksync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in linksync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An ancestor directory required to place an entry does not exist
    #[error("Hierarchy corruption: missing parent directory '{path}' for {entry}")]
    HierarchyCorruption { entry: String, path: String },

    /// The bookmark database was queried before its connection was opened
    #[error("Bookmark store is not open: {path}")]
    StoreNotOpen { path: PathBuf },

    /// A manifest file exists but cannot be parsed
    #[error("Manifest at {path} is corrupt: {message}. Delete it to force a first run")]
    ManifestCorrupt { path: PathBuf, message: String },

    /// Directory rows whose parent chain never reaches the root
    #[error("Tree construction stalled with {} unplaceable directory rows: {ids:?}", .ids.len())]
    ConstructionNonTermination { ids: Vec<i64> },

    /// Entry kinds that cannot be created in a store
    #[error("Cannot create unresolved entry '{title}'")]
    UnsupportedResource { title: String },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Backup creation failed
    #[error("Backup error: {message}")]
    Backup { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from linksync-fs
    #[error(transparent)]
    Fs(#[from] linksync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Bookmark database error
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Favorites directory walk error
    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    /// Whether this error ends the whole run rather than a single operation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::StoreNotOpen { .. } | Self::ManifestCorrupt { .. })
    }
}
