//! Internet shortcut files (`.url`)
//!
//! A shortcut is a small INI-style text block:
//!
//! ```text
//! [InternetShortcut]
//! URL=https://example.com/
//! ```
//!
//! Only the `URL` key is interpreted. Other keys written by browsers
//! (`IconFile`, `HotKey`, ...) are ignored on read and never written.

use crate::{Error, NormalizedPath, Result, io};

/// Section header written as the first line of every shortcut.
pub const SHORTCUT_HEADER: &str = "[InternetShortcut]";

/// The target of an internet shortcut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternetShortcut {
    pub url: String,
}

impl InternetShortcut {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Parse shortcut text, returning `None` when no `URL` line exists.
    ///
    /// The key is matched case-insensitively; the value is taken verbatim
    /// after the first `=`.
    pub fn parse(content: &str) -> Option<Self> {
        content.lines().find_map(|line| {
            let (key, value) = line.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("url")
                .then(|| Self::new(value.trim_end_matches(['\r', '\n'])))
        })
    }

    /// Render the shortcut with CRLF line endings.
    pub fn render(&self) -> String {
        format!("{SHORTCUT_HEADER}\r\nURL={}\r\n", self.url)
    }

    /// Read and parse the shortcut at `path`.
    pub fn read(path: &NormalizedPath) -> Result<Self> {
        let content = io::read_text(path)?;
        Self::parse(&content).ok_or_else(|| Error::ShortcutMissingUrl {
            path: path.to_native(),
        })
    }

    /// Write this shortcut to `path`, replacing any existing file.
    pub fn write(&self, path: &NormalizedPath) -> Result<()> {
        io::write_text(path, &self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("[InternetShortcut]\r\nURL=http://example.com\r\n", "http://example.com")]
    #[case("[InternetShortcut]\nurl=https://a.test/?q=1\n", "https://a.test/?q=1")]
    #[case(
        "[DEFAULT]\nBASEURL=http://base.test\n[InternetShortcut]\nURL=http://real.test\nIconIndex=0\n",
        "http://real.test"
    )]
    fn parses_url_line(#[case] content: &str, #[case] expected: &str) {
        let shortcut = InternetShortcut::parse(content).unwrap();
        assert_eq!(shortcut.url, expected);
    }

    #[test]
    fn missing_url_is_none() {
        assert_eq!(InternetShortcut::parse("[InternetShortcut]\nIconIndex=0\n"), None);
    }

    #[test]
    fn render_starts_with_header() {
        let text = InternetShortcut::new("http://example.com").render();
        assert_eq!(text, "[InternetShortcut]\r\nURL=http://example.com\r\n");
        assert_eq!(
            InternetShortcut::parse(&text),
            Some(InternetShortcut::new("http://example.com"))
        );
    }
}
