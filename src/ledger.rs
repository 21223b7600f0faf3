//! Append-only ledger of maintainer deletions (`deleted_terms.txt`).
//!
//! Each line is `source,target`: a standing decision that `target` must
//! not be re-added to `source` by an automated merge. Records are
//! deduplicated by exact text and never removed by this crate.
//!
//! A record is split at its first comma, so neither side may contain a
//! comma or a line break; [`DeletionLedger::record`] rejects such terms.

use std::collections::{BTreeMap, HashSet};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{GlossaryError, GlossaryResult};
use crate::term::TargetSet;

/// In-memory view of the ledger file, kept in sync with every append.
#[derive(Debug, Clone)]
pub struct DeletionLedger {
    path: PathBuf,
    records: HashSet<String>,
    by_source: BTreeMap<String, TargetSet>,
    /// The file's last line has no trailing newline (hand-edited).
    unterminated: bool,
}

impl DeletionLedger {
    /// Read the whole ledger. A missing file is an empty ledger.
    pub fn open(path: &Path) -> GlossaryResult<Self> {
        let mut ledger = Self {
            path: path.to_path_buf(),
            records: HashSet::new(),
            by_source: BTreeMap::new(),
            unterminated: false,
        };
        if !path.exists() {
            return Ok(ledger);
        }

        let data = std::fs::read_to_string(path).map_err(|e| GlossaryError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        ledger.unterminated = !data.is_empty() && !data.ends_with('\n');
        for line in data.lines() {
            let line = line.trim();
            if !line.is_empty() {
                ledger.remember(line);
            }
        }
        tracing::debug!(path = %path.display(), records = ledger.records.len(), "loaded deletion ledger");
        Ok(ledger)
    }

    /// An empty ledger that is never written to disk until the first append.
    pub fn in_memory(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            records: HashSet::new(),
            by_source: BTreeMap::new(),
            unterminated: false,
        }
    }

    fn remember(&mut self, record: &str) {
        if let Some((source, target)) = record.split_once(',') {
            // Whole-entry deletions were once recorded with the joined target list.
            let targets = TargetSet::parse(target);
            let slot = self.by_source.entry(source.trim().to_string()).or_default();
            *slot = slot.union(&targets);
        } else {
            tracing::warn!(record, "ignoring ledger line without a comma");
        }
        self.records.insert(record.to_string());
    }

    /// Append `source,target` unless that exact record already exists.
    ///
    /// Returns `true` if a line was written. Terms containing a comma or a
    /// line break cannot be read back and are rejected before any write.
    pub fn record(&mut self, source: &str, target: &str) -> GlossaryResult<bool> {
        if [source, target]
            .iter()
            .any(|t| t.contains([',', '\n', '\r']))
        {
            return Err(GlossaryError::Unrecordable {
                term: source.to_string(),
                target: target.to_string(),
            });
        }
        let record = format!("{source},{target}");
        if self.records.contains(&record) {
            tracing::info!(record = %record, "deletion already recorded");
            return Ok(false);
        }

        let io_err = |e: std::io::Error| GlossaryError::Io {
            path: self.path.display().to_string(),
            source: e,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        if self.unterminated {
            writeln!(file).map_err(io_err)?;
        }
        writeln!(file, "{record}").map_err(io_err)?;
        self.unterminated = false;

        tracing::info!(record = %record, "recorded deletion");
        self.remember(&record);
        Ok(true)
    }

    /// Targets the maintainer removed from `source`.
    pub fn deleted_targets(&self, source: &str) -> Option<&TargetSet> {
        self.by_source.get(source).filter(|t| !t.is_empty())
    }

    pub fn has_entries_for(&self, source: &str) -> bool {
        self.deleted_targets(source).is_some()
    }

    pub fn contains(&self, source: &str, target: &str) -> bool {
        self.by_source
            .get(source)
            .is_some_and(|t| t.contains(target))
    }

    /// Number of distinct records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
