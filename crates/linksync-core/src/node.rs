//! The LinkNode model shared by both stores
//!
//! A [`LinkNode`] is one entry of either the bookmark database or the
//! favorites tree. Its `path` holds the names of the ancestor directories
//! from the store root down to the node's parent, always written in the
//! favorites naming convention (see [`crate::path_map`]), so nodes from the
//! two stores can be compared directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What an entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Link,
    Directory,
    /// A row whose type or URL could not be resolved
    Unresolved,
}

impl ResourceKind {
    /// Map a `moz_bookmarks.type` value.
    pub fn from_row_type(row_type: i64) -> Self {
        match row_type {
            1 => Self::Link,
            2 => Self::Directory,
            _ => Self::Unresolved,
        }
    }

    /// The `moz_bookmarks.type` value, if this kind can be stored.
    pub fn row_type(self) -> Option<i64> {
        match self {
            Self::Link => Some(1),
            Self::Directory => Some(2),
            Self::Unresolved => None,
        }
    }
}

/// Which store a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// The relational bookmark database (`places.sqlite`)
    Bookmarks,
    /// The filesystem favorites tree
    Favorites,
}

impl StoreKind {
    pub fn opposite(self) -> Self {
        match self {
            Self::Bookmarks => Self::Favorites,
            Self::Favorites => Self::Bookmarks,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bookmarks => "bookmarks",
            Self::Favorites => "favorites",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store-specific bookkeeping. Never used for comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "store", rename_all = "snake_case")]
pub enum NodeOrigin {
    Bookmark {
        id: i64,
        parent: i64,
        #[serde(default)]
        position: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        place_id: Option<i64>,
    },
    Favorite {
        location: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        modified: Option<DateTime<Utc>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        created: Option<DateTime<Utc>>,
    },
}

/// One link or directory in either store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkNode {
    pub kind: ResourceKind,
    /// Target URL, present only for links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub title: String,
    /// Ancestor directory names from the store root to the parent
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub excluded: bool,
    /// Built-in container (root, menu, toolbar, tags, ...)
    #[serde(default)]
    pub system: bool,
    pub origin: NodeOrigin,
}

impl LinkNode {
    /// Build a node, dropping the URL unless `kind` is a link.
    pub fn new(
        kind: ResourceKind,
        url: Option<String>,
        title: impl Into<String>,
        path: Vec<String>,
        origin: NodeOrigin,
    ) -> Self {
        Self {
            kind,
            url: url.filter(|_| kind == ResourceKind::Link),
            title: title.into(),
            path,
            excluded: false,
            system: false,
            origin,
        }
    }

    pub fn with_system(mut self, system: bool) -> Self {
        self.system = system;
        self
    }

    pub fn with_excluded(mut self, excluded: bool) -> Self {
        self.excluded = excluded && !self.system;
        self
    }

    pub fn store(&self) -> StoreKind {
        match self.origin {
            NodeOrigin::Bookmark { .. } => StoreKind::Bookmarks,
            NodeOrigin::Favorite { .. } => StoreKind::Favorites,
        }
    }

    pub fn is_link(&self) -> bool {
        self.kind == ResourceKind::Link
    }

    pub fn is_directory(&self) -> bool {
        self.kind == ResourceKind::Directory
    }

    /// The hierarchy of this node followed by its own title.
    pub fn full_path(&self) -> Vec<String> {
        let mut full = self.path.clone();
        full.push(self.title.clone());
        full
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// `moz_bookmarks.id` for bookmark nodes.
    pub fn bookmark_id(&self) -> Option<i64> {
        match self.origin {
            NodeOrigin::Bookmark { id, .. } => Some(id),
            NodeOrigin::Favorite { .. } => None,
        }
    }

    /// `moz_places.id` for bookmark links.
    pub fn place_id(&self) -> Option<i64> {
        match self.origin {
            NodeOrigin::Bookmark { place_id, .. } => place_id,
            NodeOrigin::Favorite { .. } => None,
        }
    }

    /// Absolute location of a favorites entry.
    pub fn location(&self) -> Option<&str> {
        match &self.origin {
            NodeOrigin::Favorite { location, .. } => Some(location),
            NodeOrigin::Bookmark { .. } => None,
        }
    }

    /// An entry left behind by a damaged manifest: no title, no URL.
    pub fn is_placeholder(&self) -> bool {
        !self.system && self.title.trim().is_empty() && self.url.is_none()
    }
}

impl fmt::Display for LinkNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ResourceKind::Link => "link",
            ResourceKind::Directory => "directory",
            ResourceKind::Unresolved => "unresolved",
        };
        write!(f, "{kind} '{}'", self.full_path().join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bookmark_origin() -> NodeOrigin {
        NodeOrigin::Bookmark {
            id: 10,
            parent: 3,
            position: 0,
            place_id: Some(7),
        }
    }

    #[test]
    fn url_only_kept_for_links() {
        let dir = LinkNode::new(
            ResourceKind::Directory,
            Some("http://x".into()),
            "Work",
            vec![],
            bookmark_origin(),
        );
        assert_eq!(dir.url, None);

        let link = LinkNode::new(
            ResourceKind::Link,
            Some("http://x".into()),
            "site",
            vec!["Links".into()],
            bookmark_origin(),
        );
        assert_eq!(link.url.as_deref(), Some("http://x"));
        assert_eq!(link.full_path(), vec!["Links".to_string(), "site".to_string()]);
        assert_eq!(link.store(), StoreKind::Bookmarks);
        assert_eq!(link.place_id(), Some(7));
    }

    #[test]
    fn system_nodes_are_never_excluded() {
        let node = LinkNode::new(ResourceKind::Directory, None, "Links", vec![], bookmark_origin())
            .with_system(true)
            .with_excluded(true);
        assert!(!node.excluded);
    }

    #[test]
    fn row_types_map_both_ways() {
        assert_eq!(ResourceKind::from_row_type(1), ResourceKind::Link);
        assert_eq!(ResourceKind::from_row_type(2), ResourceKind::Directory);
        assert_eq!(ResourceKind::from_row_type(3), ResourceKind::Unresolved);
        assert_eq!(ResourceKind::Unresolved.row_type(), None);
        assert_eq!(StoreKind::Bookmarks.opposite(), StoreKind::Favorites);
    }
}
