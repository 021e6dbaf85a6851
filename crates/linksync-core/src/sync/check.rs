//! Check types for SyncEngine status reporting

use super::plan::SyncPlan;
use serde::{Deserialize, Serialize};

/// Status of the synchronization check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    /// Both stores agree with their manifests and with each other
    InSync,
    /// No manifests yet; the next sync merges both stores
    FirstRun,
    /// The next sync would apply operations
    Pending,
    /// A manifest or store could not be read
    Broken,
}

/// Report from a synchronization check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    /// Overall status of the check
    pub status: CheckStatus,
    /// Operations the next sync would apply
    pub pending: Vec<String>,
    /// Operations already reflected by the opposite store
    pub suppressed: usize,
    /// Additional messages about the check
    pub messages: Vec<String>,
}

impl CheckReport {
    /// Summarize a plan built without side effects.
    pub fn from_plan(plan: &SyncPlan) -> Self {
        let status = if plan.first_run {
            CheckStatus::FirstRun
        } else if plan.is_empty() {
            CheckStatus::InSync
        } else {
            CheckStatus::Pending
        };
        Self {
            status,
            pending: plan.operations.iter().map(ToString::to_string).collect(),
            suppressed: plan.suppressed.len(),
            messages: Vec::new(),
        }
    }

    /// Create a check report indicating a store or manifest is unreadable
    pub fn broken(message: String) -> Self {
        Self {
            status: CheckStatus::Broken,
            pending: Vec::new(),
            suppressed: 0,
            messages: vec![message],
        }
    }
}
