//! Snapshot of the last harvested glossary state.
//!
//! The snapshot is only ever compared per key against a fresh harvest to
//! tell whether the upstream table changed. Its content is never merged
//! into the local glossary directly.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::GlossaryResult;
use crate::glossary::{read_table, write_table};

/// `{source_term: joined_targets}` exactly as harvested on a previous run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: BTreeMap<String, String>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the snapshot, or an empty one on the first run.
    pub fn load(path: &Path) -> GlossaryResult<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let entries = read_table(path)?.into_iter().collect();
        Ok(Self { entries })
    }

    /// Overwrite the snapshot file.
    pub fn save(&self, path: &Path) -> GlossaryResult<()> {
        let rows: Vec<(String, String)> = self
            .entries
            .iter()
            .map(|(s, t)| (s.clone(), t.clone()))
            .collect();
        write_table(path, &rows)?;
        tracing::info!(path = %path.display(), terms = self.len(), "saved snapshot");
        Ok(())
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries.get(source).map(String::as_str)
    }

    pub fn insert(&mut self, source: impl Into<String>, joined: impl Into<String>) {
        self.entries.insert(source.into(), joined.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, t)| (s.as_str(), t.as_str()))
    }
}

impl<S: Into<String>, T: Into<String>> FromIterator<(S, T)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(s, t)| (s.into(), t.into()))
                .collect(),
        }
    }
}
