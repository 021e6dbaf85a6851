//! The bookmark database as a [`LinkStore`]

use super::{LinkStore, PlacesDb};
use crate::exclusion::ExclusionList;
use crate::node::{LinkNode, NodeOrigin, ResourceKind, StoreKind};
use crate::path_map::{self, BOOKMARKS_MENU, Container};
use crate::tree::{BookmarkRow, TreeBuilder};
use crate::{Error, Result};
use std::path::Path;

/// Bookmarks in a Firefox profile.
pub struct PlacesStore {
    db: PlacesDb,
    favorites_root: String,
    exclusions: ExclusionList,
    normalized: Vec<BookmarkRow>,
}

impl PlacesStore {
    /// `favorites_root` is where bookmarks end up as favorites; paths are
    /// shortened against it during enumeration.
    pub fn new(db: PlacesDb, favorites_root: &Path, exclusions: ExclusionList) -> Self {
        Self {
            db,
            favorites_root: favorites_root.to_string_lossy().into_owned(),
            exclusions,
            normalized: Vec::new(),
        }
    }

    /// Database id and canonical path of the folder `subject` goes into.
    fn resolve_parent(&self, subject: &LinkNode, live: &[LinkNode]) -> Result<(i64, Vec<String>)> {
        let entry = subject.to_string();
        if subject.path.is_empty() {
            let menu = live.iter().find(|node| {
                node.system
                    && node.is_directory()
                    && Container::from_title(&node.title) == Some(Container::Menu)
            });
            return menu
                .and_then(LinkNode::bookmark_id)
                .map(|id| (id, Vec::new()))
                .ok_or_else(|| Error::HierarchyCorruption {
                    entry,
                    path: BOOKMARKS_MENU.to_string(),
                });
        }

        path_map::validate_hierarchy(&subject.path, live, &entry)?;
        path_map::find_directory(&subject.path, live)
            .and_then(|index| live[index].bookmark_id())
            .map(|id| (id, subject.path.clone()))
            .ok_or_else(|| Error::HierarchyCorruption {
                entry,
                path: subject.path.join("/"),
            })
    }

    /// Id of the `moz_places` row for `url`, inserting one if needed.
    fn place_for(&self, url: &str, title: &str) -> Result<i64> {
        if let Some(id) = self.db.place_id_for_url(url)? {
            return Ok(id);
        }
        let id = self.db.max_place_id()? + 1;
        self.db.insert_place(id, url, title)?;
        Ok(id)
    }
}

impl LinkStore for PlacesStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Bookmarks
    }

    fn enumerate(&mut self) -> Result<Vec<LinkNode>> {
        let rows = self.db.bookmark_rows()?;
        let places = self.db.place_rows()?;

        let tree = TreeBuilder::new(self.favorites_root.as_str(), &self.exclusions).build(&rows, &places);
        if let Some(stalled) = tree.stalled() {
            tracing::warn!("{stalled}");
        }
        if !tree.orphans.is_empty() {
            tracing::warn!(ids = ?tree.orphans, "Bookmarks dropped: parent folder missing");
        }

        tracing::debug!(
            rows = rows.len(),
            nodes = tree.nodes.len(),
            renamed = tree.renamed.len(),
            "Enumerated bookmarks"
        );
        self.normalized = tree.renamed;
        Ok(tree.nodes)
    }

    fn persist_normalization(&mut self) -> Result<usize> {
        let rows = std::mem::take(&mut self.normalized);
        for row in &rows {
            self.db.replace_bookmark(row)?;
        }
        if !rows.is_empty() {
            tracing::info!(count = rows.len(), "Wrote normalized bookmark titles back");
        }
        Ok(rows.len())
    }

    fn create(&mut self, subject: &LinkNode, live: &[LinkNode]) -> Result<LinkNode> {
        let row_type = subject
            .kind
            .row_type()
            .ok_or_else(|| Error::UnsupportedResource {
                title: subject.title.clone(),
            })?;
        let (parent, path) = self.resolve_parent(subject, live)?;

        let place_id = match (subject.kind, subject.url.as_deref()) {
            (ResourceKind::Link, Some(url)) => Some(self.place_for(url, &subject.title)?),
            (ResourceKind::Link, None) => {
                return Err(Error::UnsupportedResource {
                    title: subject.title.clone(),
                });
            }
            _ => None,
        };

        let id = self.db.max_bookmark_id()? + 1;
        let position = live
            .iter()
            .filter(|node| matches!(node.origin, NodeOrigin::Bookmark { parent: p, .. } if p == parent))
            .count() as i64;
        let row = BookmarkRow {
            id,
            row_type,
            parent,
            place_id,
            position,
            title: Some(subject.title.clone()),
        };
        self.db.insert_bookmark(&row)?;

        let node = LinkNode::new(
            subject.kind,
            subject.url.clone(),
            subject.title.clone(),
            path,
            NodeOrigin::Bookmark {
                id,
                parent,
                position,
                place_id,
            },
        );
        tracing::info!(id, parent, "Created bookmark {node}");
        let excluded = self.exclusions.is_excluded(&node.full_path());
        Ok(node.with_excluded(excluded))
    }

    fn remove(&mut self, target: &LinkNode, _live: &[LinkNode]) -> Result<()> {
        let Some(id) = target.bookmark_id() else {
            return Ok(());
        };
        self.db.delete_bookmark(id)?;
        if let Some(place_id) = target.place_id()
            && self.db.delete_place_if_unused(place_id)?
        {
            tracing::debug!(place_id, "Deleted unreferenced place");
        }
        tracing::info!(id, "Deleted bookmark {target}");
        Ok(())
    }
}
