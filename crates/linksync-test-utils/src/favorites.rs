//! [`FavoritesFixture`]: a favorites tree on disk.

use std::fs;
use std::path::{Path, PathBuf};

/// Helpers for building and inspecting a favorites root. Relative paths
/// use `/` separators.
pub struct FavoritesFixture {
    root: PathBuf,
}

impl FavoritesFixture {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }

    fn shortcut_path(&self, relative: &str) -> PathBuf {
        let path = self.resolve(relative);
        let name = format!("{}.url", path.file_name().unwrap().to_string_lossy());
        path.with_file_name(name)
    }

    /// Create a directory and its parents.
    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let path = self.resolve(relative);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Write `<relative>.url` pointing at `url`, creating parent directories.
    pub fn shortcut(&self, relative: &str, url: &str) -> PathBuf {
        let path = self.shortcut_path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, format!("[InternetShortcut]\r\nURL={url}\r\n")).unwrap();
        path
    }

    /// Delete a directory tree.
    pub fn remove_dir(&self, relative: &str) {
        fs::remove_dir_all(self.resolve(relative)).unwrap();
    }

    /// Delete `<relative>.url`.
    pub fn remove_shortcut(&self, relative: &str) {
        fs::remove_file(self.shortcut_path(relative)).unwrap();
    }

    pub fn has_dir(&self, relative: &str) -> bool {
        self.resolve(relative).is_dir()
    }

    pub fn has_shortcut(&self, relative: &str) -> bool {
        self.shortcut_path(relative).is_file()
    }

    /// URL stored in `<relative>.url`.
    pub fn url_of(&self, relative: &str) -> Option<String> {
        let content = fs::read_to_string(self.shortcut_path(relative)).ok()?;
        content
            .lines()
            .filter_map(|line| line.split_once('='))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("url"))
            .map(|(_, value)| value.trim().to_string())
    }
}
