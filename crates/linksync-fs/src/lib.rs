//! Filesystem primitives for linksync
//!
//! Path normalization, locked atomic writes, filename sanitizing and the
//! internet shortcut (`.url`) format used by the favorites tree.

pub mod constants;
pub mod error;
pub mod io;
pub mod name;
pub mod path;
pub mod shortcut;

pub use constants::{SHORTCUT_EXTENSION, SyncFile};
pub use error::{Error, Result};
pub use name::{char_len, sanitize_component, truncate_chars};
pub use path::NormalizedPath;
pub use shortcut::InternetShortcut;
