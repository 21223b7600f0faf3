//! One glossary update cycle: harvest, reconcile, persist.
//!
//! The harvest runs first; if the fetch or the parse fails, the cycle stops
//! before any file is modified. Only after a successful reconciliation is the
//! glossary backed up and overwritten, then the snapshot replaced. A cycle
//! that adds or updates nothing leaves an existing glossary file alone.

use std::path::PathBuf;

use crate::config::TermsConfig;
use crate::error::TermsResult;
use crate::glossary::Glossary;
use crate::harvest::TermSource;
use crate::ledger::DeletionLedger;
use crate::reconcile::{ReconcileStats, reconcile};
use crate::snapshot::Snapshot;

/// What an update cycle did.
#[derive(Debug, Clone)]
pub struct UpdateReport {
    pub stats: ReconcileStats,
    /// Where the previous glossary was moved, if it was rewritten.
    pub backup: Option<PathBuf>,
    /// Terms in the glossary after the update.
    pub total_terms: usize,
}

/// Run one full cycle against the files named in `config`.
pub fn run_update(config: &TermsConfig, source: &dyn TermSource) -> TermsResult<UpdateReport> {
    tracing::info!(origin = %source.origin(), "starting glossary update");
    let harvested = source.harvest()?;

    let local = Glossary::load(&config.glossary)?;
    let previous = Snapshot::load(&config.snapshot)?;
    let ledger = DeletionLedger::open(&config.ledger)?;

    let result = reconcile(&local, &harvested, &previous, &ledger);

    let backup = if result.stats.changed() || !config.glossary.exists() {
        result.glossary.save_with_backup(&config.glossary)?
    } else {
        tracing::info!(path = %config.glossary.display(), "glossary unchanged, not rewritten");
        None
    };
    result.snapshot.save(&config.snapshot)?;

    tracing::info!(stats = %result.stats, "glossary update complete");
    Ok(UpdateReport {
        stats: result.stats,
        backup,
        total_terms: result.glossary.len(),
    })
}
