//! Filename sanitizing for titles that become file or directory names.

/// Characters Windows refuses in a file or directory name.
const INVALID_NAME_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Strip characters that are invalid in a file or directory name.
///
/// Characters are removed, not replaced. The flag reports whether
/// anything was stripped.
pub fn sanitize_component(name: &str) -> (String, bool) {
    let cleaned: String = name
        .chars()
        .filter(|c| !c.is_control() && !INVALID_NAME_CHARS.contains(c))
        .collect();
    let changed = cleaned.len() != name.len();
    (cleaned, changed)
}

/// Number of characters in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Keep at most `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
