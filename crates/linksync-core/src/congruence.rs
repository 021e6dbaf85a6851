//! Structural equivalence between nodes of either store
//!
//! Titles and hierarchies are the only identity shared by the bookmark
//! database and the favorites tree, so two nodes are the same entry when
//! their kind, canonical title, hierarchy and (for links) URL agree.
//! Hierarchies are already canonical; titles of bookmark containers are
//! replaced by the name of their favorites counterpart.

use crate::node::{LinkNode, ResourceKind, StoreKind};
use crate::path_map::{Container, is_special_favorites_folder};

/// The title a node is compared by.
///
/// System bookmark containers compare as their favorites folder name; the
/// root and menu have none and compare as the empty title.
pub fn canonical_title(node: &LinkNode) -> &str {
    if node.system
        && node.store() == StoreKind::Bookmarks
        && node.is_directory()
        && let Some(container) = Container::from_title(&node.title)
    {
        return container.favorites_name().unwrap_or("");
    }
    &node.title
}

/// Canonical hierarchy plus canonical title.
///
/// Empty for the bookmark root and menu, which both stand for the
/// favorites root.
pub fn canonical_full_path(node: &LinkNode) -> Vec<String> {
    let mut full = node.path.clone();
    let title = canonical_title(node);
    if !title.is_empty() || !node.system {
        full.push(title.to_string());
    }
    full
}

impl LinkNode {
    /// Whether `other` is the same entry as `self`.
    ///
    /// Directories compare by title and hierarchy. Links, and unresolved
    /// entries, also compare by URL. The relation only looks at values
    /// each node computes on its own, so it is symmetric.
    pub fn is_congruent_to(&self, other: &LinkNode) -> bool {
        if self.kind != other.kind {
            return false;
        }
        if self.kind != ResourceKind::Directory && self.url != other.url {
            return false;
        }
        canonical_title(self) == canonical_title(other) && self.path == other.path
    }

    /// Whether this node lives somewhere below `ancestor`.
    pub fn is_child_of(&self, ancestor: &LinkNode) -> bool {
        if !ancestor.is_directory() {
            return false;
        }
        let prefix = canonical_full_path(ancestor);
        !prefix.is_empty() && self.path.starts_with(&prefix)
    }
}

/// Index of the first node in `nodes` congruent to `subject`.
pub fn find_congruent(nodes: &[LinkNode], subject: &LinkNode) -> Option<usize> {
    nodes.iter().position(|node| node.is_congruent_to(subject))
}

/// Whether any node in `nodes` is congruent to `subject`.
pub fn contains_congruent(nodes: &[LinkNode], subject: &LinkNode) -> bool {
    find_congruent(nodes, subject).is_some()
}

/// Index of the user entry in `nodes` congruent to `subject`.
///
/// System entries never stand in for a user entry: they are not deleted
/// in its place, and their presence does not make it redundant.
pub fn find_counterpart(nodes: &[LinkNode], subject: &LinkNode) -> Option<usize> {
    nodes
        .iter()
        .position(|node| !node.system && node.is_congruent_to(subject))
}

/// Whether `node` is a built-in folder both stores share: a bookmark
/// container or the favorites folder standing in for it.
pub fn is_container(node: &LinkNode) -> bool {
    if !node.system || !node.is_directory() || !node.path.is_empty() {
        return false;
    }
    match node.store() {
        StoreKind::Bookmarks => Container::from_title(&node.title).is_some(),
        StoreKind::Favorites => is_special_favorites_folder(&node.title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeOrigin;
    use pretty_assertions::assert_eq;

    fn bookmark(kind: ResourceKind, title: &str, path: &[&str], url: Option<&str>) -> LinkNode {
        LinkNode::new(
            kind,
            url.map(str::to_string),
            title,
            path.iter().map(|s| s.to_string()).collect(),
            NodeOrigin::Bookmark {
                id: 100,
                parent: 3,
                position: 0,
                place_id: None,
            },
        )
    }

    fn favorite(kind: ResourceKind, title: &str, path: &[&str], url: Option<&str>) -> LinkNode {
        LinkNode::new(
            kind,
            url.map(str::to_string),
            title,
            path.iter().map(|s| s.to_string()).collect(),
            NodeOrigin::Favorite {
                location: format!("/fav/{title}"),
                modified: None,
                created: None,
            },
        )
    }

    #[test]
    fn links_across_stores_are_congruent() {
        let a = bookmark(ResourceKind::Link, "site", &["Links", "Work"], Some("http://e.com"));
        let b = favorite(ResourceKind::Link, "site", &["Links", "Work"], Some("http://e.com"));
        assert!(a.is_congruent_to(&b));
        assert!(b.is_congruent_to(&a));
    }

    #[test]
    fn links_differing_in_url_are_not_congruent() {
        let a = bookmark(ResourceKind::Link, "site", &[], Some("http://e.com"));
        let b = favorite(ResourceKind::Link, "site", &[], Some("http://other.com"));
        assert!(!a.is_congruent_to(&b));
    }

    #[test]
    fn kind_mismatch_is_not_congruent() {
        let a = bookmark(ResourceKind::Directory, "Work", &[], None);
        let b = favorite(ResourceKind::Link, "Work", &[], Some("http://e.com"));
        assert!(!a.is_congruent_to(&b));
    }

    #[test]
    fn toolbar_container_matches_links_folder() {
        let toolbar = bookmark(ResourceKind::Directory, "Bookmarks Toolbar", &[], None).with_system(true);
        let links = favorite(ResourceKind::Directory, "Links", &[], None).with_system(true);
        assert!(toolbar.is_congruent_to(&links));
        assert_eq!(canonical_full_path(&toolbar), vec!["Links".to_string()]);
    }

    #[test]
    fn menu_stands_for_the_root() {
        let menu = bookmark(ResourceKind::Directory, "Bookmarks Menu", &[], None).with_system(true);
        assert!(canonical_full_path(&menu).is_empty());

        let child = favorite(ResourceKind::Link, "a", &[], Some("http://a"));
        assert!(!child.is_child_of(&menu));
    }

    #[test]
    fn child_of_requires_full_prefix() {
        let work = favorite(ResourceKind::Directory, "Work", &["Links"], None);
        let inside = favorite(ResourceKind::Link, "x", &["Links", "Work", "Deep"], Some("http://x"));
        let elsewhere = favorite(ResourceKind::Link, "y", &["Other", "Work"], Some("http://y"));
        assert!(inside.is_child_of(&work));
        assert!(!elsewhere.is_child_of(&work));
        assert!(!work.is_child_of(&work));
    }

    #[test]
    fn counterpart_skips_system_nodes() {
        let nodes = vec![
            favorite(ResourceKind::Directory, "Links", &[], None).with_system(true),
            favorite(ResourceKind::Directory, "Links", &[], None),
        ];
        let subject = bookmark(ResourceKind::Directory, "Links", &[], None);
        assert_eq!(find_congruent(&nodes, &subject), Some(0));
        assert_eq!(find_counterpart(&nodes, &subject), Some(1));
    }

    #[test]
    fn only_top_level_built_in_folders_are_containers() {
        let toolbar = bookmark(ResourceKind::Directory, "Bookmarks Toolbar", &[], None).with_system(true);
        let tags = bookmark(ResourceKind::Directory, "Tags", &[], None).with_system(true);
        let links = favorite(ResourceKind::Directory, "Links", &[], None).with_system(true);
        let user_links = favorite(ResourceKind::Directory, "Links", &["Work"], None);
        assert!(is_container(&toolbar));
        assert!(is_container(&links));
        assert!(!is_container(&tags));
        assert!(!is_container(&user_links));
    }
}
