//! Core term types shared by the glossary, ledger, and reconciliation.
//!
//! A source term (Mainland form) maps to a non-empty set of target terms
//! (Taiwan forms). On disk and in the snapshot the set is stored as its
//! canonical joined form: the sorted targets separated by `;`.

use std::collections::BTreeSet;
use std::fmt;

/// Separator between multiple targets in a joined target string.
pub const TARGET_SEPARATOR: char = ';';

/// A sorted, deduplicated set of target terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TargetSet(BTreeSet<String>);

impl TargetSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a joined target string on `;`, trimming parts and dropping empties.
    pub fn parse(joined: &str) -> Self {
        joined
            .split(TARGET_SEPARATOR)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The canonical joined form: sorted targets separated by `;`.
    pub fn joined(&self) -> String {
        let parts: Vec<&str> = self.0.iter().map(String::as_str).collect();
        parts.join(&TARGET_SEPARATOR.to_string())
    }

    pub fn insert(&mut self, target: impl Into<String>) -> bool {
        self.0.insert(target.into())
    }

    pub fn remove(&mut self, target: &str) -> bool {
        self.0.remove(target)
    }

    pub fn contains(&self, target: &str) -> bool {
        self.0.contains(target)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Targets in `self` that are not in `other`.
    pub fn difference(&self, other: &TargetSet) -> TargetSet {
        self.0.difference(&other.0).cloned().collect()
    }

    pub fn union(&self, other: &TargetSet) -> TargetSet {
        self.0.union(&other.0).cloned().collect()
    }

    /// Targets not listed in `excluded`.
    pub fn without<'a>(&self, excluded: impl IntoIterator<Item = &'a str>) -> TargetSet {
        let mut out = self.clone();
        for t in excluded {
            out.0.remove(t);
        }
        out
    }
}

impl FromIterator<String> for TargetSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for TargetSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}

impl fmt::Display for TargetSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

/// A validated glossary entry.
///
/// The source term is non-empty, the target set is non-empty, and the
/// source never appears among its own targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermEntry {
    pub source: String,
    pub targets: TargetSet,
}

impl TermEntry {
    /// Build an entry, dropping any self-mapping target.
    ///
    /// Returns `None` if the source is blank or no targets remain.
    pub fn new(source: &str, mut targets: TargetSet) -> Option<Self> {
        let source = source.trim();
        if source.is_empty() {
            return None;
        }
        targets.remove(source);
        if targets.is_empty() {
            return None;
        }
        Some(Self {
            source: source.to_string(),
            targets,
        })
    }

    pub fn joined_targets(&self) -> String {
        self.targets.joined()
    }
}

/// One raw `(source, target)` pair as reported by a harvester.
///
/// `target` may itself be a joined string when the harvester fanned a
/// table row out to several targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TermPair {
    pub source: String,
    pub target: String,
}

impl TermPair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn is_self_mapping(&self) -> bool {
        self.source == self.target
    }
}
