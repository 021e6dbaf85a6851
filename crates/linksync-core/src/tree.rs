//! Reconstruction of the bookmark tree from `moz_bookmarks` rows
//!
//! Rows come back from the database in no useful order. Directories are
//! first arranged in construction order (every directory after its
//! parent, the root first), then built one by one so each can derive its
//! hierarchy from already-built ancestors. Links come last.
//!
//! Directory rows that can never be placed, because their parent chain
//! is dangling or cyclic, are dropped and reported. The rest of the tree
//! is still built.

use crate::exclusion::ExclusionList;
use crate::node::{LinkNode, NodeOrigin, ResourceKind};
use crate::path_map::{Container, MAX_PARENT_PATH_LEN, MAX_PATH_LEN, mapped_len};
use crate::Error;
use linksync_fs::{char_len, sanitize_component, truncate_chars};
use std::collections::{HashMap, HashSet};

/// Id of the untitled root row.
pub const ROOT_ID: i64 = 1;

/// Parent id of the root row.
pub const NO_PARENT: i64 = 0;

/// Title given to entries whose title normalizes away entirely.
pub const UNTITLED: &str = "Untitled";

/// Built-in rows always have ids below this.
pub const SYSTEM_ID_CEILING: i64 = 24;

const SYSTEM_TITLES: [&str; 14] = [
    "Bookmarks Menu",
    "menu",
    "Bookmarks Toolbar",
    "toolbar",
    "Unsorted Bookmarks",
    "Other Bookmarks",
    "unfiled",
    "Tags",
    "tags",
    "Recently Bookmarked",
    "Recent Tags",
    "History",
    "Downloads",
    "All Bookmarks",
];

/// A `moz_bookmarks` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkRow {
    pub id: i64,
    pub row_type: i64,
    pub parent: i64,
    pub place_id: Option<i64>,
    pub position: i64,
    pub title: Option<String>,
}

impl BookmarkRow {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

/// A `moz_places` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceRow {
    pub id: i64,
    pub url: String,
}

/// Whether a row is one of the built-in folders.
///
/// Built-in folders hang directly off the root; a user folder that shares
/// a title with one of them is an ordinary entry.
pub fn is_system_entry(row: &BookmarkRow) -> bool {
    let title = row.title();
    title.is_empty()
        || (row.id < SYSTEM_ID_CEILING
            && row.parent == ROOT_ID
            && SYSTEM_TITLES.contains(&title))
}

/// Placement of directory rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstructionOrder {
    /// Indices into the input, every directory after its parent
    pub placed: Vec<usize>,
    /// Indices of rows whose parent chain never reaches the root
    pub unplaced: Vec<usize>,
}

/// Arrange directory rows so every row follows its parent.
///
/// The root row comes first. Each pass places every remaining row whose
/// parent is already placed, in input order; passes stop when one places
/// nothing.
pub fn construction_order(directories: &[BookmarkRow]) -> ConstructionOrder {
    let Some(root) = directories.iter().position(|row| row.id == ROOT_ID) else {
        return ConstructionOrder {
            placed: Vec::new(),
            unplaced: (0..directories.len()).collect(),
        };
    };

    let mut placed = vec![root];
    let mut placed_ids = HashSet::from([ROOT_ID]);
    let mut pending: Vec<usize> = (0..directories.len()).filter(|&i| i != root).collect();

    loop {
        let before = pending.len();
        let mut remaining = Vec::with_capacity(before);
        for index in pending {
            let row = &directories[index];
            if placed_ids.contains(&row.parent) && !placed_ids.contains(&row.id) {
                placed.push(index);
                placed_ids.insert(row.id);
            } else {
                remaining.push(index);
            }
        }
        pending = remaining;
        if pending.is_empty() || pending.len() == before {
            break;
        }
    }

    ConstructionOrder {
        placed,
        unplaced: pending,
    }
}

/// The bookmark tree of one enumeration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookmarkTree {
    /// Directories in construction order, then links
    pub nodes: Vec<LinkNode>,
    /// Ids of the placed directories, in construction order
    pub construction_order: Vec<i64>,
    /// Directory rows dropped because they could not be placed
    pub unplaced: Vec<i64>,
    /// Link rows dropped because their parent directory is missing
    pub orphans: Vec<i64>,
    /// Rows whose title or parent changed during normalization
    pub renamed: Vec<BookmarkRow>,
}

impl BookmarkTree {
    /// The non-termination report for unplaced directories, if any.
    pub fn stalled(&self) -> Option<Error> {
        (!self.unplaced.is_empty()).then(|| Error::ConstructionNonTermination {
            ids: self.unplaced.clone(),
        })
    }

    pub fn is_corrupt(&self) -> bool {
        !self.unplaced.is_empty() || !self.orphans.is_empty()
    }
}

struct PlacedDirectory {
    title: String,
    parent: i64,
    container: Option<Container>,
    /// Inside a built-in folder with no favorites counterpart (tags)
    hidden: bool,
}

type Placed = HashMap<i64, PlacedDirectory>;

/// Builds [`LinkNode`]s from bookmark rows.
pub struct TreeBuilder<'a> {
    favorites_root: String,
    exclusions: &'a ExclusionList,
}

impl<'a> TreeBuilder<'a> {
    /// `favorites_root` is the directory entries would be written to; it
    /// counts against the path length ceilings.
    pub fn new(favorites_root: impl Into<String>, exclusions: &'a ExclusionList) -> Self {
        Self {
            favorites_root: favorites_root.into(),
            exclusions,
        }
    }

    pub fn build(&self, rows: &[BookmarkRow], places: &[PlaceRow]) -> BookmarkTree {
        let urls: HashMap<i64, &str> = places.iter().map(|p| (p.id, p.url.as_str())).collect();

        let mut directories = Vec::new();
        let mut links = Vec::new();
        for row in rows {
            match ResourceKind::from_row_type(row.row_type) {
                ResourceKind::Directory => directories.push(row.clone()),
                ResourceKind::Link => links.push(row),
                ResourceKind::Unresolved => {
                    tracing::debug!(id = row.id, row_type = row.row_type, "Skipping bookmark row");
                }
            }
        }

        let order = construction_order(&directories);
        let mut tree = BookmarkTree {
            unplaced: order.unplaced.iter().map(|&i| directories[i].id).collect(),
            ..BookmarkTree::default()
        };
        if !tree.unplaced.is_empty() {
            tracing::warn!(
                ids = ?tree.unplaced,
                "Hierarchy corruption: directory rows never reach the root and were dropped"
            );
        }

        let mut placed: Placed = HashMap::new();
        for &index in &order.placed {
            let row = &directories[index];
            let Some(node) = self.construct(row, None, &placed, &mut tree) else {
                continue;
            };
            let NodeOrigin::Bookmark { parent, .. } = node.origin else {
                continue;
            };
            let container = if node.system {
                Container::from_title(&node.title)
            } else {
                None
            };
            let hidden = node.system && container.is_none();
            placed.insert(
                row.id,
                PlacedDirectory {
                    title: node.title.clone(),
                    parent,
                    container,
                    hidden,
                },
            );
            tree.construction_order.push(row.id);
            tree.nodes.push(node);
        }

        for row in links {
            let url = row
                .place_id
                .and_then(|fk| urls.get(&fk))
                .map(|url| url.to_string());
            if url.is_none() {
                tracing::debug!(id = row.id, place_id = ?row.place_id, "Bookmark has no resolvable URL");
            }
            if let Some(node) = self.construct(row, url, &placed, &mut tree) {
                tree.nodes.push(node);
            }
        }

        tree
    }

    fn construct(
        &self,
        row: &BookmarkRow,
        url: Option<String>,
        placed: &Placed,
        tree: &mut BookmarkTree,
    ) -> Option<LinkNode> {
        let mut kind = ResourceKind::from_row_type(row.row_type);
        if kind == ResourceKind::Link && url.is_none() {
            kind = ResourceKind::Unresolved;
        }

        let mut path = if row.id == ROOT_ID {
            Vec::new()
        } else {
            match self.derive_path(row.parent, placed) {
                Ok(path) => path,
                Err(missing) => {
                    tracing::warn!(
                        id = row.id,
                        missing,
                        "Hierarchy corruption: parent directory not found, entry dropped"
                    );
                    tree.orphans.push(row.id);
                    return None;
                }
            }
        };

        let system = is_system_entry(row)
            || placed.get(&row.parent).is_some_and(|directory| directory.hidden);
        let mut title = row.title().to_string();
        let mut parent = row.parent;
        if !system && self.normalize(&mut title, &mut parent, &mut path, placed) {
            tracing::debug!(id = row.id, %title, "Normalized bookmark for the favorites tree");
            tree.renamed.push(BookmarkRow {
                title: Some(title.clone()),
                parent,
                ..row.clone()
            });
        }

        let origin = NodeOrigin::Bookmark {
            id: row.id,
            parent,
            position: row.position,
            place_id: row.place_id,
        };
        let node = LinkNode::new(kind, url, title, path, origin).with_system(system);
        let excluded = self.exclusions.is_excluded(&node.full_path());
        Some(node.with_excluded(excluded))
    }

    /// Walk from `parent` up to a container, collecting directory names.
    ///
    /// Fails with the id of the first ancestor that is not placed or is
    /// reached twice.
    fn derive_path(&self, parent: i64, placed: &Placed) -> std::result::Result<Vec<String>, i64> {
        let mut segments = Vec::new();
        let mut visited = HashSet::new();
        let mut current = parent;
        loop {
            let Some(directory) = placed.get(&current) else {
                return Err(current);
            };
            if !visited.insert(current) {
                return Err(current);
            }
            match directory.container {
                Some(container) => {
                    segments.extend(container.favorites_name().map(str::to_string));
                    break;
                }
                None => {
                    segments.push(directory.title.clone());
                    current = directory.parent;
                }
            }
        }
        segments.reverse();
        Ok(segments)
    }

    /// Strip invalid characters, then bring the mapped path under the
    /// length ceiling: re-parent upward while the parent path is too long,
    /// then truncate the title by the excess. A title left blank becomes
    /// [`UNTITLED`] and truncation keeps at least one character. Returns
    /// whether anything changed.
    fn normalize(
        &self,
        title: &mut String,
        parent: &mut i64,
        path: &mut Vec<String>,
        placed: &Placed,
    ) -> bool {
        let mut changed = false;

        let (clean, stripped) = sanitize_component(title);
        if stripped {
            *title = clean;
            changed = true;
        }
        if title.trim().is_empty() {
            *title = UNTITLED.to_string();
            changed = true;
        }

        let root = self.favorites_root.as_str();
        if mapped_len(root, path, Some(title)) <= MAX_PATH_LEN {
            return changed;
        }

        while !path.is_empty() && mapped_len(root, path, None) > MAX_PARENT_PATH_LEN {
            let Some(grandparent) = placed.get(parent).map(|d| d.parent) else {
                break;
            };
            let Ok(shorter) = self.derive_path(grandparent, placed) else {
                break;
            };
            *parent = grandparent;
            *path = shorter;
            changed = true;
        }

        let len = mapped_len(root, path, Some(title));
        if len > MAX_PATH_LEN {
            let keep = char_len(title).saturating_sub(len - MAX_PATH_LEN).max(1);
            *title = truncate_chars(title, keep);
            changed = true;
        }

        changed
    }
}
