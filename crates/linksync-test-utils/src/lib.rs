//! Shared test utilities for the linksync workspace.
//!
//! This crate provides standardised fixtures for both stores. It is a
//! dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`places`]: a Firefox-style `places.sqlite` seeded with the built-in folders
//! - [`favorites`]: a favorites tree of directories and `.url` shortcuts
//! - [`SyncFixture`]: both stores side by side in one temporary directory

pub mod favorites;
pub mod places;

pub use favorites::FavoritesFixture;
pub use places::PlacesFixture;

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A profile directory with a seeded database next to a favorites root.
///
/// ```rust,no_run
/// use linksync_test_utils::{PlacesFixture, SyncFixture};
///
/// let fixture = SyncFixture::new();
/// fixture.places.add_link(PlacesFixture::TOOLBAR, "Docs", "https://docs.rs");
/// fixture.favorites.shortcut("Links/Rust", "https://www.rust-lang.org");
/// ```
pub struct SyncFixture {
    temp_dir: TempDir,
    pub places: PlacesFixture,
    pub favorites: FavoritesFixture,
}

impl Default for SyncFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let profile = temp_dir.path().join("profile");
        let favorites = temp_dir.path().join("favorites");
        fs::create_dir_all(&profile).unwrap();
        fs::create_dir_all(&favorites).unwrap();

        Self {
            places: PlacesFixture::create(&profile.join("places.sqlite")),
            favorites: FavoritesFixture::new(&favorites),
            temp_dir,
        }
    }

    /// Root of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn profile_dir(&self) -> PathBuf {
        self.root().join("profile")
    }

    pub fn favorites_dir(&self) -> PathBuf {
        self.root().join("favorites")
    }

    pub fn places_path(&self) -> PathBuf {
        self.places.path().to_path_buf()
    }
}
