//! SyncEngine implementation
//!
//! One run walks through [`SyncPhase`] in order: enumerate both stores and
//! load their manifests, classify adds and removes, drop operations the
//! opposite store already reflects, apply the rest, and rewrite both
//! manifests from a fresh enumeration.

use std::cmp::Reverse;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::check::CheckReport;
use super::context::SyncContext;
use super::operation::{OperationKind, SyncOperation};
use super::plan::SyncPlan;
use crate::Result;
use crate::congruence::{contains_congruent, find_counterpart};
use crate::manifest::ManifestStore;
use crate::node::{LinkNode, StoreKind};
use crate::store::LinkStore;

/// Phases of a sync run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncPhase {
    Enumerate,
    ClassifyAdds,
    ClassifyRemoves,
    CrossDedup,
    Apply,
    Refresh,
}

/// Which stores a run may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncDirection {
    /// Mirror favorites changes into the bookmark database
    pub to_bookmarks: bool,
    /// Mirror bookmark changes into the favorites tree
    pub to_favorites: bool,
}

impl SyncDirection {
    pub fn both() -> Self {
        Self {
            to_bookmarks: true,
            to_favorites: true,
        }
    }

    pub fn allows(self, target: StoreKind) -> bool {
        match target {
            StoreKind::Bookmarks => self.to_bookmarks,
            StoreKind::Favorites => self.to_favorites,
        }
    }
}

impl Default for SyncDirection {
    fn default() -> Self {
        Self::both()
    }
}

/// Options for sync operations
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// If true, plan without touching either store or the manifests.
    /// Actions are prefixed with "[dry-run] Would ..."
    pub dry_run: bool,
    /// Operations targeting a disabled store are deferred to a later run
    pub direction: SyncDirection,
}

/// Report from a sync operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncReport {
    /// Whether every operation was applied
    pub success: bool,
    pub dry_run: bool,
    /// Whether the run started without manifests
    pub first_run: bool,
    /// Operations left after cross-store deduplication
    pub planned: Vec<String>,
    /// Number of operations the opposite store already reflected
    pub suppressed: usize,
    /// Actions taken during the operation
    pub actions: Vec<String>,
    /// Operations not applied, with the reason
    pub skipped: Vec<String>,
    /// Errors encountered during the operation
    pub errors: Vec<String>,
}

impl SyncReport {
    /// Create a successful sync report
    pub fn success() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    /// Add an action to the report
    pub fn with_action(mut self, action: String) -> Self {
        self.actions.push(action);
        self
    }
}

enum Outcome {
    Applied(String),
    Skipped(String),
}

/// Engine for synchronizing a bookmark store with a favorites store
pub struct SyncEngine {
    bookmarks: Box<dyn LinkStore>,
    favorites: Box<dyn LinkStore>,
    manifests: ManifestStore,
}

impl SyncEngine {
    pub fn new(
        bookmarks: Box<dyn LinkStore>,
        favorites: Box<dyn LinkStore>,
        manifests: ManifestStore,
    ) -> Self {
        Self {
            bookmarks,
            favorites,
            manifests,
        }
    }

    pub fn manifests(&self) -> &ManifestStore {
        &self.manifests
    }

    fn store_mut(&mut self, kind: StoreKind) -> &mut dyn LinkStore {
        match kind {
            StoreKind::Bookmarks => self.bookmarks.as_mut(),
            StoreKind::Favorites => self.favorites.as_mut(),
        }
    }

    /// Load both manifests and enumerate both stores.
    ///
    /// Manifests are read first so an unreadable one stops the run before
    /// anything else happens. A missing manifest on either side makes this
    /// a first run, with both manifests treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ManifestCorrupt`] for an unreadable manifest
    /// and [`crate::Error::StoreNotOpen`] if the bookmark database is closed.
    pub fn enumerate(&mut self) -> Result<SyncContext> {
        tracing::debug!(phase = ?SyncPhase::Enumerate, "Sync phase");

        let first_run = self.manifests.is_first_run();
        let (bookmarks_manifest, favorites_manifest) = if first_run {
            (Vec::new(), Vec::new())
        } else {
            (
                self.manifests.load(StoreKind::Bookmarks)?.into_nodes(),
                self.manifests.load(StoreKind::Favorites)?.into_nodes(),
            )
        };

        let favorites = self.favorites.enumerate()?;
        let bookmarks = self.bookmarks.enumerate()?;

        Ok(SyncContext {
            bookmarks,
            favorites,
            bookmarks_manifest,
            favorites_manifest,
            first_run,
        })
    }

    /// Plan a sync without changing anything.
    pub fn plan(&mut self) -> Result<SyncPlan> {
        let ctx = self.enumerate()?;
        Ok(SyncPlan::build(&ctx))
    }

    /// Check the synchronization state
    ///
    /// Unreadable manifests and a closed store are reported as broken
    /// rather than returned as errors.
    pub fn check(&mut self) -> Result<CheckReport> {
        match self.plan() {
            Ok(plan) => Ok(CheckReport::from_plan(&plan)),
            Err(e) if e.is_fatal() => Ok(CheckReport::broken(e.to_string())),
            Err(e) => Err(e),
        }
    }

    /// Synchronize both stores with options
    ///
    /// Per-operation failures are recorded in the report and the operation
    /// stays pending for the next run; only fatal errors are returned.
    pub fn sync_with_options(&mut self, options: SyncOptions) -> Result<SyncReport> {
        let mut ctx = self.enumerate()?;
        let mut report = SyncReport::success();
        report.dry_run = options.dry_run;
        report.first_run = ctx.first_run;

        if ctx.first_run {
            if options.dry_run {
                report = report.with_action("[dry-run] Would create empty manifests".to_string());
            } else {
                self.manifests.reset()?;
                report = report.with_action("Created empty manifests".to_string());
            }
        }

        let plan = SyncPlan::build(&ctx);
        report.planned = plan.operations.iter().map(ToString::to_string).collect();
        report.suppressed = plan.suppressed.len();

        if options.dry_run {
            for op in &plan.operations {
                report = report.with_action(format!("[dry-run] Would {op}"));
            }
            return Ok(report);
        }

        tracing::debug!(phase = ?SyncPhase::Apply, operations = plan.len(), "Sync phase");
        for store in [StoreKind::Bookmarks, StoreKind::Favorites] {
            if !options.direction.allows(store) {
                continue;
            }
            match self.store_mut(store).persist_normalization() {
                Ok(0) => {}
                Ok(count) => {
                    report = report.with_action(format!("Normalized {count} {store} entries"));
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => report.errors.push(format!("Failed to normalize {store}: {e}")),
            }
        }
        let deferred = self.apply(&mut ctx, &plan.operations, options.direction, &mut report)?;

        tracing::debug!(phase = ?SyncPhase::Refresh, deferred = deferred.len(), "Sync phase");
        self.refresh(&deferred)?;

        report.success = report.errors.is_empty();
        Ok(report)
    }

    /// Synchronize both stores in both directions
    pub fn sync(&mut self) -> Result<SyncReport> {
        self.sync_with_options(SyncOptions::default())
    }

    /// Apply `operations`, removes first. Returns the operations left
    /// pending.
    ///
    /// An add may write to the location a remove is about to clear, as
    /// when a link keeps its title and changes its URL.
    fn apply(
        &mut self,
        ctx: &mut SyncContext,
        operations: &[SyncOperation],
        direction: SyncDirection,
        report: &mut SyncReport,
    ) -> Result<Vec<SyncOperation>> {
        let mut deferred = Vec::new();

        let removes = operations.iter().filter(|op| !op.is_add());
        for op in removes.chain(operations.iter().filter(|op| op.is_add())) {
            if op.subject.system || op.subject.excluded {
                report.skipped.push(format!("{op}: system or excluded entry"));
                continue;
            }
            if !direction.allows(op.target()) {
                report.skipped.push(format!("{op}: sync to {} disabled", op.target()));
                deferred.push(op.clone());
                continue;
            }

            let outcome = match op.kind {
                OperationKind::Add => self.apply_add(ctx, op),
                OperationKind::Remove => self.apply_remove(ctx, op),
            };
            match outcome {
                Ok(Outcome::Applied(action)) => report.actions.push(action),
                Ok(Outcome::Skipped(reason)) => report.skipped.push(format!("{op}: {reason}")),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!("Deferred {op}: {e}");
                    report.errors.push(format!("Failed to {op}: {e}"));
                    deferred.push(op.clone());
                }
            }
        }

        Ok(deferred)
    }

    fn apply_add(&mut self, ctx: &mut SyncContext, op: &SyncOperation) -> Result<Outcome> {
        let target = op.target();
        if find_counterpart(ctx.live(target), &op.subject).is_some() {
            return Ok(Outcome::Skipped("already present".to_string()));
        }

        let created = self.store_mut(target).create(&op.subject, ctx.live(target))?;
        ctx.live_mut(target).push(created);
        Ok(Outcome::Applied(format!("Added {} to {target}", op.subject)))
    }

    /// Remove the target's counterpart of the subject. Directories take
    /// their contents with them, deepest entries first.
    fn apply_remove(&mut self, ctx: &mut SyncContext, op: &SyncOperation) -> Result<Outcome> {
        let target = op.target();
        let live = ctx.live(target);
        let Some(index) = find_counterpart(live, &op.subject) else {
            return Ok(Outcome::Skipped("already absent".to_string()));
        };
        if live[index].excluded {
            return Ok(Outcome::Skipped(format!("{} is excluded", live[index])));
        }

        let mut doomed: Vec<usize> = if live[index].is_directory() {
            live.iter()
                .enumerate()
                .filter(|(_, node)| !node.system && node.is_child_of(&live[index]))
                .map(|(i, _)| i)
                .collect()
        } else {
            Vec::new()
        };
        doomed.sort_by_key(|&i| (Reverse(live[i].depth()), live[i].is_directory()));
        doomed.push(index);
        let nodes: Vec<LinkNode> = doomed.iter().map(|&i| live[i].clone()).collect();

        let mut removed = HashSet::new();
        let mut failure = None;
        for (&i, node) in doomed.iter().zip(&nodes) {
            if let Err(e) = self.store_mut(target).remove(node, ctx.live(target)) {
                failure = Some(e);
                break;
            }
            removed.insert(i);
        }

        let mut position = 0;
        ctx.live_mut(target).retain(|_| {
            let keep = !removed.contains(&position);
            position += 1;
            keep
        });

        if let Some(e) = failure {
            return Err(e);
        }
        Ok(Outcome::Applied(format!(
            "Removed {} from {target} ({} entries)",
            op.subject,
            removed.len()
        )))
    }

    /// Rewrite both manifests from a fresh enumeration.
    ///
    /// Deferred adds are left out of their origin's manifest and deferred
    /// removes are kept in it, so the next run classifies them again.
    fn refresh(&mut self, deferred: &[SyncOperation]) -> Result<()> {
        let mut favorites = self.favorites.enumerate()?;
        let mut bookmarks = self.bookmarks.enumerate()?;

        for op in deferred {
            let manifest = match op.origin {
                StoreKind::Bookmarks => &mut bookmarks,
                StoreKind::Favorites => &mut favorites,
            };
            match op.kind {
                OperationKind::Add => manifest.retain(|node| !node.is_congruent_to(&op.subject)),
                OperationKind::Remove => {
                    if !contains_congruent(manifest, &op.subject) {
                        manifest.push(op.subject.clone());
                    }
                }
            }
        }

        self.manifests.save(StoreKind::Bookmarks, &bookmarks)?;
        self.manifests.save(StoreKind::Favorites, &favorites)?;
        tracing::debug!(
            bookmarks = bookmarks.len(),
            favorites = favorites.len(),
            "Manifests refreshed"
        );
        Ok(())
    }
}
