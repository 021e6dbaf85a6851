//! Command implementations for linksync-cli

pub mod backup;
pub mod check;
pub mod sync;

pub use backup::run_backup;
pub use check::run_check;
pub use sync::{SyncFlags, run_sync};

use std::path::Path;

use linksync_core::store::{FavoritesStore, PlacesDb, PlacesStore};
use linksync_core::{ExclusionList, ManifestStore, SyncConfig, SyncEngine};

use crate::cli::StoreArgs;
use crate::error::{CliError, Result};

/// Load the configuration file and apply command-line overrides.
///
/// Without `--config` the default location is used; a missing file means
/// defaults.
pub fn load_config(config_path: Option<&Path>, stores: &StoreArgs) -> Result<SyncConfig> {
    let mut config = match config_path
        .map(Path::to_path_buf)
        .or_else(SyncConfig::default_path)
    {
        Some(path) => SyncConfig::load(&path)?,
        None => SyncConfig::default(),
    };

    let mut overrides = SyncConfig {
        profile: stores.profile.clone(),
        favorites: stores.favorites.clone(),
        ..SyncConfig::default()
    };
    overrides.exclusions.bookmarks.clone_from(&stores.exclude_bookmarks);
    overrides.exclusions.favorites.clone_from(&stores.exclude_favorites);
    config.merge(&overrides);

    if config.profile.is_none() {
        return Err(CliError::user(
            "No Firefox profile given. Pass --profile or set `profile` in the configuration file",
        ));
    }
    if config.favorites.is_none() {
        return Err(CliError::user(
            "No favorites directory given. Pass --favorites or set `favorites` in the configuration file",
        ));
    }
    Ok(config)
}

/// Open the bookmark database and wire both stores into an engine.
pub fn build_engine(config: &SyncConfig) -> Result<SyncEngine> {
    let profile = config.profile_dir()?;
    let favorites = config.favorites_dir()?;
    let places = config.places_path()?;
    if !places.is_file() {
        return Err(CliError::user(format!(
            "No bookmark database found at {}",
            places.display()
        )));
    }

    let db = PlacesDb::open(&places)?;
    let bookmarks = PlacesStore::new(
        db,
        favorites,
        ExclusionList::new(&config.exclusions.bookmarks),
    );
    let favorites_store = FavoritesStore::new(
        favorites,
        ExclusionList::for_favorites(favorites, &config.exclusions.favorites),
    );
    let manifests = ManifestStore::new(profile, favorites);

    Ok(SyncEngine::new(
        Box::new(bookmarks),
        Box::new(favorites_store),
        manifests,
    ))
}
