//! Manifests: snapshots of each store as of the last sync
//!
//! A manifest records every node of one store right after a sync. The
//! next run compares the live store against it to tell new entries from
//! deleted ones. Manifests are always rewritten whole from a fresh
//! enumeration, never patched.

use crate::node::{LinkNode, StoreKind};
use crate::{Error, Result};
use linksync_fs::{NormalizedPath, SyncFile, io};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Manifest format version written by this crate.
pub const MANIFEST_VERSION: &str = "1.0";

/// The snapshot of one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Format version for forward compatibility
    version: String,
    store: StoreKind,
    #[serde(default)]
    nodes: Vec<LinkNode>,
}

impl Manifest {
    /// Create an empty manifest for `store`.
    pub fn new(store: StoreKind) -> Self {
        Self::from_nodes(store, Vec::new())
    }

    pub fn from_nodes(store: StoreKind, nodes: Vec<LinkNode>) -> Self {
        Self {
            version: MANIFEST_VERSION.to_string(),
            store,
            nodes,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn store(&self) -> StoreKind {
        self.store
    }

    pub fn nodes(&self) -> &[LinkNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<LinkNode> {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Load a manifest from a TOML file under a shared lock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestCorrupt`] if the file cannot be read or
    /// parsed, or if it belongs to the other store.
    pub fn load(path: &Path, store: StoreKind) -> Result<Self> {
        let corrupt = |message: String| Error::ManifestCorrupt {
            path: path.to_path_buf(),
            message,
        };

        let content = io::read_locked(&NormalizedPath::new(path)).map_err(|e| corrupt(e.to_string()))?;
        let mut manifest: Manifest = toml::from_str(&content).map_err(|e| corrupt(e.to_string()))?;

        if manifest.store != store {
            return Err(corrupt(format!(
                "expected a {store} manifest, found {}",
                manifest.store
            )));
        }

        let before = manifest.nodes.len();
        manifest.nodes.retain(|node| !node.is_placeholder());
        if manifest.nodes.len() != before {
            tracing::debug!(
                dropped = before - manifest.nodes.len(),
                ?path,
                "Dropped placeholder entries from manifest"
            );
        }

        Ok(manifest)
    }

    /// Save the manifest atomically, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        io::write_text(&NormalizedPath::new(path), &content)?;
        Ok(())
    }
}

/// Locates and persists the manifests of both stores.
///
/// The bookmarks manifest lives in the profile directory next to
/// `places.sqlite`; the favorites manifest lives in the favorites root.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    bookmarks: PathBuf,
    favorites: PathBuf,
}

impl ManifestStore {
    pub fn new(profile_dir: &Path, favorites_dir: &Path) -> Self {
        Self {
            bookmarks: profile_dir.join(SyncFile::BookmarksManifest),
            favorites: favorites_dir.join(SyncFile::FavoritesManifest),
        }
    }

    pub fn path(&self, store: StoreKind) -> &Path {
        match store {
            StoreKind::Bookmarks => &self.bookmarks,
            StoreKind::Favorites => &self.favorites,
        }
    }

    pub fn exists(&self, store: StoreKind) -> bool {
        self.path(store).is_file()
    }

    /// A store that has never been synced has no manifest.
    pub fn is_first_run(&self) -> bool {
        !self.exists(StoreKind::Bookmarks) || !self.exists(StoreKind::Favorites)
    }

    /// Load the manifest of `store`, or an empty one if it was never saved.
    pub fn load(&self, store: StoreKind) -> Result<Manifest> {
        let path = self.path(store);
        if !path.exists() {
            tracing::debug!(%store, "No manifest yet, starting empty");
            return Ok(Manifest::new(store));
        }
        Manifest::load(path, store)
    }

    /// Replace the manifest of `store` with `nodes`.
    pub fn save(&self, store: StoreKind, nodes: &[LinkNode]) -> Result<()> {
        Manifest::from_nodes(store, nodes.to_vec()).save(self.path(store))
    }

    /// Write empty manifests for both stores.
    pub fn reset(&self) -> Result<()> {
        self.save(StoreKind::Bookmarks, &[])?;
        self.save(StoreKind::Favorites, &[])
    }
}
