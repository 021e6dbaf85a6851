//! Mapping between bookmark and favorites directory conventions
//!
//! The bookmark database keeps its links below built-in containers
//! (menu, toolbar, unsorted) while the favorites tree has a plain root
//! with a `Links` folder for the toolbar. Hierarchies are stored in the
//! favorites convention everywhere. This module names the containers and
//! their favorites folders, resolves parent directories and enforces the
//! length limits of the favorites side.

use crate::congruence;
use crate::node::{LinkNode, ResourceKind};
use crate::{Error, Result};
use linksync_fs::char_len;

/// Favorites folder holding toolbar links.
pub const FAVORITES_BAR: &str = "Links";

/// Favorites folder holding links from the unsorted bookmarks container.
pub const UNCATEGORIZED: &str = "” UNCATEGORIZED ”";

/// Titles the bookmark database uses for its built-in containers.
pub const BOOKMARKS_MENU: &str = "Bookmarks Menu";
pub const BOOKMARKS_TOOLBAR: &str = "Bookmarks Toolbar";
pub const UNSORTED_BOOKMARKS: &str = "Unsorted Bookmarks";

/// Ceiling for a full mapped path, in characters.
pub const MAX_PATH_LEN: usize = 250;

/// Ceiling for a mapped parent path when shortening by re-parenting.
pub const MAX_PARENT_PATH_LEN: usize = 240;

const MENU_TITLES: [&str; 2] = [BOOKMARKS_MENU, "menu"];
const TOOLBAR_TITLES: [&str; 2] = [BOOKMARKS_TOOLBAR, "toolbar"];
const UNSORTED_TITLES: [&str; 3] = [UNSORTED_BOOKMARKS, "Other Bookmarks", "unfiled"];

/// Built-in bookmark containers with a special place in the favorites tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// The untitled root row
    Root,
    /// Maps to the favorites root itself
    Menu,
    /// Maps to [`FAVORITES_BAR`]
    Toolbar,
    /// Maps to [`UNCATEGORIZED`]
    Unsorted,
}

impl Container {
    /// Recognize a container by its title. Only meaningful for system rows.
    pub fn from_title(title: &str) -> Option<Self> {
        if title.is_empty() {
            Some(Self::Root)
        } else if MENU_TITLES.contains(&title) {
            Some(Self::Menu)
        } else if TOOLBAR_TITLES.contains(&title) {
            Some(Self::Toolbar)
        } else if UNSORTED_TITLES.contains(&title) {
            Some(Self::Unsorted)
        } else {
            None
        }
    }

    /// Directory name this container takes in the favorites tree.
    ///
    /// `None` means the container is the favorites root.
    pub fn favorites_name(self) -> Option<&'static str> {
        match self {
            Self::Root | Self::Menu => None,
            Self::Toolbar => Some(FAVORITES_BAR),
            Self::Unsorted => Some(UNCATEGORIZED),
        }
    }
}

/// Whether `name` is a root-level favorites folder that stands in for a
/// bookmark container.
pub fn is_special_favorites_folder(name: &str) -> bool {
    name == FAVORITES_BAR || name == UNCATEGORIZED
}

/// The favorites location a node maps to, as `root/dir/.../title`.
pub fn mapped_path(favorites_root: &str, path: &[String], title: Option<&str>) -> String {
    let mut mapped = favorites_root.trim_end_matches(['/', '\\']).to_string();
    for segment in path.iter().map(String::as_str).chain(title) {
        mapped.push('/');
        mapped.push_str(segment);
    }
    mapped
}

/// Length in characters of [`mapped_path`].
pub fn mapped_len(favorites_root: &str, path: &[String], title: Option<&str>) -> usize {
    char_len(&mapped_path(favorites_root, path, title))
}

/// Check that every ancestor of `path` exists as a directory in `live`.
///
/// `live` holds the nodes of the store the entry is about to be created
/// in; `entry` only labels the error.
pub fn validate_hierarchy(path: &[String], live: &[LinkNode], entry: &str) -> Result<()> {
    match missing_ancestor(path, live, 1) {
        Some(missing) => Err(Error::HierarchyCorruption {
            entry: entry.to_string(),
            path: missing.join("/"),
        }),
        None => Ok(()),
    }
}

/// The shortest prefix of `path`, at least `from_depth` long, that is not
/// a directory in `live`.
pub fn missing_ancestor<'p>(
    path: &'p [String],
    live: &[LinkNode],
    from_depth: usize,
) -> Option<&'p [String]> {
    (from_depth.max(1)..=path.len())
        .map(|depth| &path[..depth])
        .find(|prefix| find_directory(prefix, live).is_none())
}

/// Index of the directory in `live` whose canonical full path is `full_path`.
///
/// Built-in folders other than the containers (tag folders and the like)
/// never hold synced entries, so they are not candidates.
pub fn find_directory(full_path: &[String], live: &[LinkNode]) -> Option<usize> {
    live.iter().position(|node| {
        node.kind == ResourceKind::Directory
            && (!node.system || congruence::is_container(node))
            && congruence::canonical_full_path(node) == full_path
    })
}
