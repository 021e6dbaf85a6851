//! Store collaborators
//!
//! Provides a unified interface over the two kinds of link collections:
//! the Firefox bookmark database and the filesystem favorites tree.

mod favorites;
mod places;
mod places_db;

pub use favorites::FavoritesStore;
pub use places::PlacesStore;
pub use places_db::PlacesDb;

use crate::Result;
use crate::node::{LinkNode, StoreKind};

/// Trait for reading and mutating one store.
///
/// Stores hold no view of their own contents between calls: the engine
/// owns the live collections and passes them in.
pub trait LinkStore: Send {
    /// Which store this is.
    fn kind(&self) -> StoreKind;

    /// Read every entry of the store.
    ///
    /// Directories come before links, and every directory comes after
    /// its parent.
    fn enumerate(&mut self) -> Result<Vec<LinkNode>>;

    /// Write back fixes made while enumerating (stripped characters,
    /// shortened paths). Returns how many entries were rewritten.
    fn persist_normalization(&mut self) -> Result<usize> {
        Ok(0)
    }

    /// Create the counterpart of `subject`, a node of the opposite store.
    ///
    /// `live` is this store's current collection, used to resolve the
    /// parent directory. Returns the node as it now exists in this store.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::HierarchyCorruption`] if the parent
    /// directory does not exist in this store.
    fn create(&mut self, subject: &LinkNode, live: &[LinkNode]) -> Result<LinkNode>;

    /// Delete `target`, a node of this store. Deleting a target that is
    /// already gone succeeds.
    fn remove(&mut self, target: &LinkNode, live: &[LinkNode]) -> Result<()>;
}
