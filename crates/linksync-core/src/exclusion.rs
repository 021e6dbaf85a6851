//! User-supplied exclusion lists
//!
//! Entries are paths in the favorites convention, separated by `/` or `\`.
//! A node is excluded when an entry names it or one of its ancestors.

use linksync_fs::{NormalizedPath, SHORTCUT_EXTENSION};
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionList {
    entries: Vec<Vec<String>>,
}

impl ExclusionList {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = paths
            .into_iter()
            .map(|p| split_segments(p.as_ref()))
            .filter(|segments| !segments.is_empty())
            .collect();
        Self { entries }
    }

    /// Build a favorites exclusion list, pruning entries that name neither
    /// a directory nor a shortcut below `root`.
    pub fn for_favorites<I, S>(root: &Path, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let root = NormalizedPath::new(root);
        let entries = paths
            .into_iter()
            .map(|p| split_segments(p.as_ref()))
            .filter(|segments| !segments.is_empty())
            .filter(|segments| {
                let target = root.join_all(segments);
                let shortcut = NormalizedPath::new(format!("{target}.{SHORTCUT_EXTENSION}"));
                let exists = target.exists() || shortcut.exists();
                if !exists {
                    warn!(path = %target, "Ignoring favorites exclusion: no such file or directory");
                }
                exists
            })
            .collect();
        Self { entries }
    }

    /// Whether a node with this full path (hierarchy plus title) is excluded.
    pub fn is_excluded(&self, full_path: &[String]) -> bool {
        self.entries
            .iter()
            .any(|entry| full_path.starts_with(entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn split_segments(path: &str) -> Vec<String> {
    path.split(['/', '\\'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
