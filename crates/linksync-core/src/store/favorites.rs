//! The favorites directory tree as a [`LinkStore`]

use super::LinkStore;
use crate::exclusion::ExclusionList;
use crate::node::{LinkNode, NodeOrigin, ResourceKind, StoreKind};
use crate::path_map::{self, is_special_favorites_folder};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use linksync_fs::{InternetShortcut, NormalizedPath, SHORTCUT_EXTENSION, io};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Directories and `.url` shortcuts below a favorites root.
pub struct FavoritesStore {
    root: NormalizedPath,
    exclusions: ExclusionList,
}

impl FavoritesStore {
    pub fn new(root: &Path, exclusions: ExclusionList) -> Self {
        Self {
            root: NormalizedPath::new(root),
            exclusions,
        }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    fn location(&self, path: &[String], title: &str, kind: ResourceKind) -> NormalizedPath {
        let parent = self.root.join_all(path);
        match kind {
            ResourceKind::Link => parent.join(&format!("{title}.{SHORTCUT_EXTENSION}")),
            _ => parent.join(title),
        }
    }

    fn node_at(
        &self,
        kind: ResourceKind,
        url: Option<String>,
        title: &str,
        path: Vec<String>,
        location: &NormalizedPath,
    ) -> LinkNode {
        let metadata = fs::metadata(location.to_native()).ok();
        let origin = NodeOrigin::Favorite {
            location: location.as_str().to_string(),
            modified: metadata
                .as_ref()
                .and_then(|m| m.modified().ok())
                .map(DateTime::<Utc>::from),
            created: metadata
                .as_ref()
                .and_then(|m| m.created().ok())
                .map(DateTime::<Utc>::from),
        };
        let system =
            kind == ResourceKind::Directory && path.is_empty() && is_special_favorites_folder(title);
        let node = LinkNode::new(kind, url, title, path, origin).with_system(system);
        let excluded = self.exclusions.is_excluded(&node.full_path());
        node.with_excluded(excluded)
    }

    fn directory_node(&self, location: &NormalizedPath) -> Option<LinkNode> {
        let title = location.file_name()?.to_string();
        let path = location.segments_below(&self.root)?;
        Some(self.node_at(ResourceKind::Directory, None, &title, path, location))
    }

    fn link_node(&self, location: &NormalizedPath) -> Option<LinkNode> {
        let shortcut = match InternetShortcut::read(location) {
            Ok(shortcut) => shortcut,
            Err(e) => {
                tracing::warn!("Skipping favorite: {e}");
                return None;
            }
        };
        let title = location.file_stem()?.to_string();
        let path = location.segments_below(&self.root)?;
        Some(self.node_at(ResourceKind::Link, Some(shortcut.url), &title, path, location))
    }

    /// Make sure the parent directory of an entry at `path` exists.
    ///
    /// The root-level folders standing in for bookmark containers are
    /// created on demand; any other missing ancestor is corruption.
    fn ensure_parent(&self, path: &[String], live: &[LinkNode], entry: &str) -> Result<()> {
        let mut from_depth = 1;
        if let Some(first) = path.first()
            && is_special_favorites_folder(first)
        {
            let folder = self.root.join(first);
            if !folder.is_dir() {
                fs::create_dir_all(folder.to_native())
                    .map_err(|e| linksync_fs::Error::io(folder.to_native(), e))?;
                tracing::info!(path = %folder, "Created favorites folder");
            }
            from_depth = 2;
        }

        match path_map::missing_ancestor(path, live, from_depth) {
            Some(missing) => Err(Error::HierarchyCorruption {
                entry: entry.to_string(),
                path: missing.join("/"),
            }),
            None => Ok(()),
        }
    }
}

impl LinkStore for FavoritesStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Favorites
    }

    fn enumerate(&mut self) -> Result<Vec<LinkNode>> {
        if !self.root.is_dir() {
            let missing = std::io::Error::from(std::io::ErrorKind::NotFound);
            return Err(linksync_fs::Error::io(self.root.to_native(), missing).into());
        }

        let mut nodes = Vec::new();
        let mut shortcuts = Vec::new();
        for entry in WalkDir::new(self.root.to_native())
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry?;
            let location = NormalizedPath::new(entry.path());
            if entry.file_type().is_dir() {
                nodes.extend(self.directory_node(&location));
            } else if entry.file_type().is_file()
                && location
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(SHORTCUT_EXTENSION))
            {
                shortcuts.push(location);
            }
        }

        // Links resolve their hierarchy against the finished directory index.
        let directories: HashSet<Vec<String>> = nodes.iter().map(LinkNode::full_path).collect();
        let links: Vec<LinkNode> = shortcuts
            .par_iter()
            .filter_map(|location| self.link_node(location))
            .collect();

        for link in links {
            if link.path.is_empty() || directories.contains(&link.path) {
                nodes.push(link);
            } else {
                tracing::warn!("Hierarchy corruption: no directory entry for {link}");
            }
        }

        tracing::debug!(root = %self.root, nodes = nodes.len(), "Enumerated favorites");
        Ok(nodes)
    }

    fn create(&mut self, subject: &LinkNode, live: &[LinkNode]) -> Result<LinkNode> {
        let entry = subject.to_string();
        self.ensure_parent(&subject.path, live, &entry)?;

        let location = self.location(&subject.path, &subject.title, subject.kind);
        match (subject.kind, subject.url.as_deref()) {
            (ResourceKind::Directory, _) => {
                fs::create_dir_all(location.to_native())
                    .map_err(|e| linksync_fs::Error::io(location.to_native(), e))?;
            }
            (ResourceKind::Link, Some(url)) => {
                InternetShortcut::new(url).write(&location)?;
            }
            _ => {
                return Err(Error::UnsupportedResource {
                    title: subject.title.clone(),
                });
            }
        }

        tracing::info!(path = %location, "Created favorite {entry}");
        Ok(self.node_at(
            subject.kind,
            subject.url.clone(),
            &subject.title,
            subject.path.clone(),
            &location,
        ))
    }

    fn remove(&mut self, target: &LinkNode, _live: &[LinkNode]) -> Result<()> {
        let location = match target.location() {
            Some(location) => NormalizedPath::new(location),
            None => self.location(&target.path, &target.title, target.kind),
        };

        if target.is_directory() {
            io::remove_dir_all(&location)?;
        } else {
            // The file may have been rewritten for another URL since it
            // was enumerated.
            if let Ok(current) = InternetShortcut::read(&location)
                && target.url.as_deref() != Some(current.url.as_str())
            {
                tracing::debug!(path = %location, "Favorite now points elsewhere, kept");
                return Ok(());
            }
            io::remove_file(&location)?;
        }

        tracing::info!(path = %location, "Deleted favorite {target}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_shortcut(root: &Path, relative: &str, url: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("[InternetShortcut]\r\nURL={url}\r\n")).unwrap();
    }

    #[test]
    fn enumerates_directories_before_links() {
        let temp = TempDir::new().unwrap();
        write_shortcut(temp.path(), "Links/Work/site.url", "http://example.com");
        write_shortcut(temp.path(), "top.url", "http://top.test");
        fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

        let mut store = FavoritesStore::new(temp.path(), ExclusionList::default());
        let nodes = store.enumerate().unwrap();

        let summary: Vec<(ResourceKind, String)> = nodes
            .iter()
            .map(|n| (n.kind, n.full_path().join("/")))
            .collect();
        assert_eq!(
            summary,
            vec![
                (ResourceKind::Directory, "Links".to_string()),
                (ResourceKind::Directory, "Links/Work".to_string()),
                (ResourceKind::Link, "Links/Work/site".to_string()),
                (ResourceKind::Link, "top".to_string()),
            ]
        );
        assert!(nodes[0].system);
        assert!(!nodes[1].system);
        assert_eq!(nodes[2].url.as_deref(), Some("http://example.com"));
    }

    #[test]
    fn broken_shortcuts_are_skipped() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("broken.url"), "[InternetShortcut]\r\n").unwrap();
        write_shortcut(temp.path(), "ok.url", "http://ok.test");

        let mut store = FavoritesStore::new(temp.path(), ExclusionList::default());
        let nodes = store.enumerate().unwrap();

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].title, "ok");
    }

    #[test]
    fn missing_root_is_an_error() {
        let temp = TempDir::new().unwrap();
        let mut store = FavoritesStore::new(&temp.path().join("absent"), ExclusionList::default());
        assert!(store.enumerate().is_err());
    }

    #[test]
    fn create_requires_existing_parent() {
        let temp = TempDir::new().unwrap();
        let mut store = FavoritesStore::new(temp.path(), ExclusionList::default());
        let subject = LinkNode::new(
            ResourceKind::Link,
            Some("http://x".into()),
            "x",
            vec!["Nowhere".into()],
            NodeOrigin::Bookmark {
                id: 30,
                parent: 20,
                position: 0,
                place_id: Some(1),
            },
        );

        let result = store.create(&subject, &[]);
        assert!(matches!(result, Err(Error::HierarchyCorruption { .. })));
        assert!(!temp.path().join("Nowhere").exists());
    }

    #[test]
    fn create_makes_special_folders_on_demand() {
        let temp = TempDir::new().unwrap();
        let mut store = FavoritesStore::new(temp.path(), ExclusionList::default());
        let subject = LinkNode::new(
            ResourceKind::Link,
            Some("http://x".into()),
            "x",
            vec![path_map::UNCATEGORIZED.into()],
            NodeOrigin::Bookmark {
                id: 30,
                parent: 5,
                position: 0,
                place_id: Some(1),
            },
        );

        let created = store.create(&subject, &[]).unwrap();

        assert!(created.is_congruent_to(&subject));
        assert!(temp.path().join(path_map::UNCATEGORIZED).join("x.url").is_file());
    }

    #[test]
    fn remove_deletes_directories_recursively() {
        let temp = TempDir::new().unwrap();
        write_shortcut(temp.path(), "Old/a.url", "http://a");
        let mut store = FavoritesStore::new(temp.path(), ExclusionList::default());
        let nodes = store.enumerate().unwrap();

        store.remove(&nodes[0], &nodes).unwrap();
        assert!(!temp.path().join("Old").exists());

        // Already gone: nothing to do.
        store.remove(&nodes[1], &nodes).unwrap();
    }

    #[test]
    fn remove_keeps_a_shortcut_rewritten_for_another_url() {
        let temp = TempDir::new().unwrap();
        write_shortcut(temp.path(), "site.url", "http://old.test");
        let mut store = FavoritesStore::new(temp.path(), ExclusionList::default());
        let stale = store.enumerate().unwrap();
        write_shortcut(temp.path(), "site.url", "http://new.test");

        store.remove(&stale[0], &stale).unwrap();

        let path = NormalizedPath::new(temp.path().join("site.url"));
        assert_eq!(InternetShortcut::read(&path).unwrap().url, "http://new.test");
    }
}
