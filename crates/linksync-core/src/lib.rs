//! Core of linksync: two-way sync between a Firefox bookmark database and a
//! favorites directory tree
//!
//! This crate provides:
//!
//! - **LinkNode model**: one representation for bookmarks, shortcut files
//!   and the directories holding them
//! - **TreeBuilder**: rebuilds the bookmark hierarchy from flat database rows
//!   and normalizes titles and path lengths
//! - **Congruence**: structural identity across stores and across runs
//! - **Manifests**: per-store snapshots of the last successful sync
//! - **SyncEngine**: classifies changes against the manifests and applies
//!   them to the opposite store
//!
//! # Architecture
//!
//! ```text
//!                 linksync-cli
//!                      |
//!                linksync-core
//!       +------+-------+--------+---------+
//!       |      |       |        |         |
//!     tree  manifest  store   sync    backup/config
//!                      |
//!                 linksync-fs
//! ```

pub mod backup;
pub mod config;
pub mod congruence;
pub mod error;
pub mod exclusion;
pub mod manifest;
pub mod node;
pub mod path_map;
pub mod store;
pub mod sync;
pub mod tree;

pub use backup::{Backup, BackupManager, BackupMetadata};
pub use config::SyncConfig;
pub use error::{Error, Result};
pub use exclusion::ExclusionList;
pub use manifest::{Manifest, ManifestStore};
pub use node::{LinkNode, NodeOrigin, ResourceKind, StoreKind};
pub use store::{FavoritesStore, LinkStore, PlacesDb, PlacesStore};
pub use sync::{
    CheckReport, CheckStatus, OperationKind, SyncDirection, SyncEngine, SyncOperation, SyncOptions,
    SyncPhase, SyncPlan, SyncReport,
};
pub use tree::{BookmarkRow, BookmarkTree, PlaceRow, TreeBuilder};
