//! Synchronization between the bookmark database and the favorites tree
//!
//! This module provides:
//! - **plan**: classify live entries against the manifests into add and
//!   remove operations, then drop the ones the other store already reflects
//! - **engine**: run a full cycle (enumerate, plan, apply, refresh manifests)
//! - **check**: a read-only summary of what a sync would do

mod check;
mod context;
mod engine;
mod operation;
mod plan;

pub use check::{CheckReport, CheckStatus};
pub use context::SyncContext;
pub use engine::{SyncDirection, SyncEngine, SyncOptions, SyncPhase, SyncReport};
pub use operation::{OperationKind, SyncOperation};
pub use plan::{SyncPlan, classify_adds, classify_removes, cross_dedup};
