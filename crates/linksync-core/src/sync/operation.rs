//! Operations produced by a sync run

use crate::node::{LinkNode, StoreKind};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Add,
    Remove,
}

/// A change observed in one store, to be mirrored in the other.
///
/// `origin` is the store where the change was observed; the operation is
/// applied to [`SyncOperation::target`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncOperation {
    pub origin: StoreKind,
    pub kind: OperationKind,
    pub subject: LinkNode,
}

impl SyncOperation {
    pub fn add(origin: StoreKind, subject: LinkNode) -> Self {
        Self {
            origin,
            kind: OperationKind::Add,
            subject,
        }
    }

    pub fn remove(origin: StoreKind, subject: LinkNode) -> Self {
        Self {
            origin,
            kind: OperationKind::Remove,
            subject,
        }
    }

    /// The store this operation changes.
    pub fn target(&self) -> StoreKind {
        self.origin.opposite()
    }

    pub fn is_add(&self) -> bool {
        self.kind == OperationKind::Add
    }
}

impl fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            OperationKind::Add => write!(f, "add {} to {}", self.subject, self.target()),
            OperationKind::Remove => write!(f, "remove {} from {}", self.subject, self.target()),
        }
    }
}
