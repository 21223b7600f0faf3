//! Reconciliation engine: merge a fresh harvest into the local glossary.
//!
//! [`reconcile`] is a pure fold over four immutable inputs (local glossary,
//! harvested pairs, previous snapshot, deletion ledger) that returns the next
//! glossary, the next snapshot, and per-outcome counters. It performs no I/O;
//! see [`crate::update`] for the cycle that loads and persists the files.
//!
//! Per harvested source term `s` with canonical value `new_tw`:
//!
//! - **unchanged upstream** (`snapshot[s] == new_tw`): the local entry wins
//!   untouched. If `s` is missing locally it is adopted, minus any targets
//!   the ledger says were deleted.
//! - **changed upstream** (different, or new to the snapshot): without ledger
//!   entries the local entry is overwritten with `new_tw`. With ledger
//!   entries only the never-deleted targets are merged into the local set;
//!   if none remain, `s` is skipped for this cycle.
//!
//! Local terms the harvest does not mention are never touched.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::glossary::Glossary;
use crate::ledger::DeletionLedger;
use crate::snapshot::Snapshot;
use crate::term::{TargetSet, TermPair};

/// What happened to one harvested source term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TermOutcome {
    Added,
    Updated,
    Preserved,
    SkippedDeleted,
}

/// Counters for one reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    /// Distinct source terms in the harvest.
    pub harvested: usize,
    pub added: usize,
    pub updated: usize,
    pub preserved: usize,
    /// Terms whose every harvested target is in the deletion ledger.
    pub skipped_deleted: usize,
}

impl ReconcileStats {
    fn count(&mut self, outcome: TermOutcome) {
        match outcome {
            TermOutcome::Added => self.added += 1,
            TermOutcome::Updated => self.updated += 1,
            TermOutcome::Preserved => self.preserved += 1,
            TermOutcome::SkippedDeleted => self.skipped_deleted += 1,
        }
    }

    /// Whether the run changed the glossary.
    pub fn changed(&self) -> bool {
        self.added > 0 || self.updated > 0
    }
}

impl fmt::Display for ReconcileStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "harvested {} terms: {} added, {} updated, {} preserved, {} skipped (deleted)",
            self.harvested, self.added, self.updated, self.preserved, self.skipped_deleted
        )
    }
}

/// Result of a reconciliation run.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// The next local glossary.
    pub glossary: Glossary,
    /// The harvested `{source: joined targets}` map, to become the next baseline.
    pub snapshot: Snapshot,
    pub stats: ReconcileStats,
    /// Outcome per harvested source term, in source order.
    pub outcomes: BTreeMap<String, TermOutcome>,
}

/// Group raw pairs by source into canonical target sets.
///
/// Joined targets inside a pair are split, self-mappings dropped, and
/// sources left without any target omitted.
pub fn collapse(pairs: &[TermPair]) -> BTreeMap<String, TargetSet> {
    let mut grouped: BTreeMap<String, TargetSet> = BTreeMap::new();
    for pair in pairs {
        let source = pair.source.trim();
        if source.is_empty() || pair.is_self_mapping() {
            continue;
        }
        let targets = TargetSet::parse(&pair.target).without([source]);
        if targets.is_empty() {
            continue;
        }
        let slot = grouped.entry(source.to_string()).or_default();
        *slot = slot.union(&targets);
    }
    grouped
}

/// Merge `harvested` into `local`. See the module docs for the rules.
pub fn reconcile(
    local: &Glossary,
    harvested: &[TermPair],
    previous: &Snapshot,
    ledger: &DeletionLedger,
) -> Reconciliation {
    let grouped = collapse(harvested);
    let mut glossary = local.clone();
    let mut stats = ReconcileStats {
        harvested: grouped.len(),
        ..Default::default()
    };
    let mut outcomes = BTreeMap::new();

    for (source, targets) in &grouped {
        let new_tw = targets.joined();
        let unchanged = previous.get(source) == Some(new_tw.as_str());
        let current = local.get(source);

        let outcome = match (unchanged, current) {
            (true, Some(_)) => {
                tracing::debug!(source = %source, "upstream unchanged, keeping local entry");
                TermOutcome::Preserved
            }
            (true, None) => apply(&mut glossary, source, None, allowed(targets, source, ledger)),
            (false, _) => match ledger.deleted_targets(source) {
                None => apply(&mut glossary, source, current, Some(targets.clone())),
                Some(_) => {
                    let merged = allowed(targets, source, ledger).map(|remaining| match current {
                        Some(cur) => cur.union(&remaining),
                        None => remaining,
                    });
                    apply(&mut glossary, source, current, merged)
                }
            },
        };

        stats.count(outcome);
        outcomes.insert(source.clone(), outcome);
    }

    let snapshot: Snapshot = grouped
        .iter()
        .map(|(s, t)| (s.clone(), t.joined()))
        .collect();

    tracing::info!(
        harvested = stats.harvested,
        added = stats.added,
        updated = stats.updated,
        preserved = stats.preserved,
        skipped_deleted = stats.skipped_deleted,
        "reconciliation complete"
    );

    Reconciliation {
        glossary,
        snapshot,
        stats,
        outcomes,
    }
}

/// Harvested targets minus those the ledger records as deleted.
/// `None` if nothing remains.
fn allowed(targets: &TargetSet, source: &str, ledger: &DeletionLedger) -> Option<TargetSet> {
    let remaining = match ledger.deleted_targets(source) {
        Some(deleted) => targets.difference(deleted),
        None => targets.clone(),
    };
    if remaining.is_empty() {
        tracing::info!(source, targets = %targets, "all harvested targets were deleted locally, skipping");
        None
    } else {
        if remaining.len() < targets.len() {
            tracing::info!(
                source,
                kept = %remaining,
                "merging only targets not in the deletion ledger"
            );
        }
        Some(remaining)
    }
}

/// Write `next` for `source` and classify the change against `current`.
fn apply(
    glossary: &mut Glossary,
    source: &str,
    current: Option<&TargetSet>,
    next: Option<TargetSet>,
) -> TermOutcome {
    let Some(next) = next else {
        return TermOutcome::SkippedDeleted;
    };
    match current {
        Some(cur) if *cur == next => TermOutcome::Preserved,
        Some(cur) => {
            tracing::info!(source, old = %cur, new = %next, "updated term");
            glossary.insert(source, next);
            TermOutcome::Updated
        }
        None => {
            tracing::info!(source, targets = %next, "added term");
            glossary.insert(source, next);
            TermOutcome::Added
        }
    }
}
