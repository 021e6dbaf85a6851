//! Classification of live entries into sync operations
//!
//! Each store is compared with its own manifest: entries that appeared
//! since the last sync become adds, entries that disappeared become
//! removes. The opposite store then vetoes operations it already reflects.

use super::context::SyncContext;
use super::engine::SyncPhase;
use super::operation::{OperationKind, SyncOperation};
use crate::congruence::{contains_congruent, find_counterpart};
use crate::node::{LinkNode, ResourceKind, StoreKind};
use serde::Serialize;

/// The operations of one run, before and after cross-store deduplication.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncPlan {
    pub first_run: bool,
    /// Everything the manifests say changed
    pub classified: Vec<SyncOperation>,
    /// What is left to apply
    pub operations: Vec<SyncOperation>,
    /// Classified operations the opposite store already reflects
    pub suppressed: Vec<SyncOperation>,
}

impl SyncPlan {
    /// Run the classification phases over `ctx`.
    ///
    /// Adds are listed before removes; within each kind, favorites changes
    /// come first and every store keeps its enumeration order, so
    /// directories precede their contents.
    pub fn build(ctx: &SyncContext) -> Self {
        tracing::debug!(phase = ?SyncPhase::ClassifyAdds, "Sync phase");
        let mut classified = Vec::new();
        for store in [StoreKind::Favorites, StoreKind::Bookmarks] {
            classified.extend(classify_adds(store, ctx.live(store), ctx.manifest(store)));
        }

        tracing::debug!(phase = ?SyncPhase::ClassifyRemoves, "Sync phase");
        for store in [StoreKind::Favorites, StoreKind::Bookmarks] {
            classified.extend(classify_removes(store, ctx.live(store), ctx.manifest(store)));
        }

        tracing::debug!(phase = ?SyncPhase::CrossDedup, classified = classified.len(), "Sync phase");
        let (operations, suppressed) = cross_dedup(classified.clone(), ctx);

        Self {
            first_run: ctx.first_run,
            classified,
            operations,
            suppressed,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }
}

/// Adds for every live entry of `origin` its manifest does not know.
///
/// System and excluded entries never produce adds, and neither do
/// bookmarks whose URL cannot be resolved.
pub fn classify_adds(origin: StoreKind, live: &[LinkNode], manifest: &[LinkNode]) -> Vec<SyncOperation> {
    live.iter()
        .filter(|node| !node.system && !node.excluded)
        .filter(|node| {
            if node.kind == ResourceKind::Unresolved {
                tracing::debug!("Skipping unresolved entry {node}");
                return false;
            }
            true
        })
        .filter(|node| !contains_congruent(manifest, node))
        .map(|node| SyncOperation::add(origin, node.clone()))
        .collect()
}

/// Removes for every manifest entry of `origin` that is no longer live.
pub fn classify_removes(
    origin: StoreKind,
    live: &[LinkNode],
    manifest: &[LinkNode],
) -> Vec<SyncOperation> {
    manifest
        .iter()
        .filter(|node| !contains_congruent(live, node))
        .map(|node| SyncOperation::remove(origin, node.clone()))
        .collect()
}

/// Split operations into those to apply and those the target store
/// already reflects.
///
/// An add is redundant when its target already holds a congruent user
/// entry; a remove is redundant when its target holds none. System entries
/// never count.
pub fn cross_dedup(
    operations: Vec<SyncOperation>,
    ctx: &SyncContext,
) -> (Vec<SyncOperation>, Vec<SyncOperation>) {
    operations.into_iter().partition(|op| {
        let present = find_counterpart(ctx.live(op.target()), &op.subject).is_some();
        match op.kind {
            OperationKind::Add => !present,
            OperationKind::Remove => present,
        }
    })
}
