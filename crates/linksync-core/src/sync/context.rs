//! Per-run state of a sync

use crate::node::{LinkNode, StoreKind};

/// The collections one sync run works on.
///
/// Built fresh by every run and dropped at its end. Live collections are
/// updated in place as operations are applied.
#[derive(Debug, Clone, Default)]
pub struct SyncContext {
    pub bookmarks: Vec<LinkNode>,
    pub favorites: Vec<LinkNode>,
    pub bookmarks_manifest: Vec<LinkNode>,
    pub favorites_manifest: Vec<LinkNode>,
    /// Whether either manifest was missing when the run started
    pub first_run: bool,
}

impl SyncContext {
    pub fn live(&self, store: StoreKind) -> &[LinkNode] {
        match store {
            StoreKind::Bookmarks => &self.bookmarks,
            StoreKind::Favorites => &self.favorites,
        }
    }

    pub fn live_mut(&mut self, store: StoreKind) -> &mut Vec<LinkNode> {
        match store {
            StoreKind::Bookmarks => &mut self.bookmarks,
            StoreKind::Favorites => &mut self.favorites,
        }
    }

    pub fn manifest(&self, store: StoreKind) -> &[LinkNode] {
        match store {
            StoreKind::Bookmarks => &self.bookmarks_manifest,
            StoreKind::Favorites => &self.favorites_manifest,
        }
    }
}
