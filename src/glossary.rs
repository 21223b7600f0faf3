//! The local glossary table (`terms.csv`).
//!
//! A UTF-8 CSV file with a `cn,tw` header. Each row maps one Mainland term
//! to its `;`-joined Taiwan targets. The same two-column shape is used by
//! the snapshot file, so the low-level table reader and writer live here.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{GlossaryError, GlossaryResult};
use crate::term::{TargetSet, TermEntry};

/// Column holding the Mainland (source) term.
pub const SOURCE_COLUMN: &str = "cn";
/// Column holding the joined Taiwan (target) terms.
pub const TARGET_COLUMN: &str = "tw";

/// The locally curated glossary, ordered by source term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Glossary {
    entries: BTreeMap<String, TargetSet>,
}

impl Glossary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the glossary, starting empty if the file does not exist yet.
    pub fn load(path: &Path) -> GlossaryResult<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no glossary yet, starting empty");
            return Ok(Self::new());
        }
        Self::open(path)
    }

    /// Load an existing glossary. A missing file is an error.
    pub fn open(path: &Path) -> GlossaryResult<Self> {
        let rows = read_table(path)?;
        let glossary = Self::from_rows(rows);
        tracing::debug!(path = %path.display(), terms = glossary.len(), "loaded glossary");
        Ok(glossary)
    }

    /// Build from raw `(source, joined targets)` rows.
    ///
    /// Blank sources and self-mappings are dropped. Repeated sources
    /// accumulate their targets.
    pub fn from_rows<I, S, T>(rows: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut glossary = Self::new();
        for (source, joined) in rows {
            let (source, joined) = (source.as_ref(), joined.as_ref());
            match TermEntry::new(source, TargetSet::parse(joined)) {
                Some(entry) => {
                    let slot = glossary.entries.entry(entry.source).or_default();
                    *slot = slot.union(&entry.targets);
                }
                None => {
                    tracing::warn!(source, targets = joined, "dropping empty or self-mapping row");
                }
            }
        }
        glossary
    }

    pub fn get(&self, source: &str) -> Option<&TargetSet> {
        self.entries.get(source)
    }

    pub fn contains(&self, source: &str) -> bool {
        self.entries.contains_key(source)
    }

    /// Insert or replace an entry. Returns `false` and leaves the glossary
    /// untouched if the entry would be empty or a self-mapping.
    pub fn insert(&mut self, source: &str, targets: TargetSet) -> bool {
        match TermEntry::new(source, targets) {
            Some(entry) => {
                self.entries.insert(entry.source, entry.targets);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, source: &str) -> Option<TargetSet> {
        self.entries.remove(source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending source-term order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TargetSet)> {
        self.entries.iter().map(|(s, t)| (s.as_str(), t))
    }

    fn rows(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(s, t)| (s.to_string(), t.joined()))
            .collect()
    }

    /// Overwrite the glossary file in place.
    pub fn save(&self, path: &Path) -> GlossaryResult<()> {
        write_table(path, &self.rows())?;
        tracing::info!(path = %path.display(), terms = self.len(), "saved glossary");
        Ok(())
    }

    /// Rename the existing file to a timestamped backup, then write.
    ///
    /// Returns the backup path, if a previous file existed. A failure after
    /// the rename leaves only the backup on disk and is reported as
    /// [`GlossaryError::WriteAfterBackup`].
    pub fn save_with_backup(&self, path: &Path) -> GlossaryResult<Option<PathBuf>> {
        let backup = if path.exists() {
            let backup = backup_path(path);
            std::fs::rename(path, &backup).map_err(|e| GlossaryError::Backup {
                path: path.display().to_string(),
                backup: backup.display().to_string(),
                source: e,
            })?;
            tracing::info!(backup = %backup.display(), "created glossary backup");
            Some(backup)
        } else {
            None
        };

        if let Err(e) = write_table(path, &self.rows()) {
            return Err(match &backup {
                Some(b) => GlossaryError::WriteAfterBackup {
                    path: path.display().to_string(),
                    backup: b.display().to_string(),
                    message: e.to_string(),
                },
                None => e,
            });
        }
        tracing::info!(path = %path.display(), terms = self.len(), "saved glossary");
        Ok(backup)
    }
}

/// `<path>.backup.<YYYYmmdd_HHMMSS>`, with a numeric suffix if that name is taken.
fn backup_path(path: &Path) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let base = format!("{}.backup.{stamp}", path.display());
    let mut candidate = PathBuf::from(&base);
    let mut n = 1;
    while candidate.exists() {
        candidate = PathBuf::from(format!("{base}.{n}"));
        n += 1;
    }
    candidate
}

/// Read a two-column `cn,tw` table into rows, in file order.
pub(crate) fn read_table(path: &Path) -> GlossaryResult<Vec<(String, String)>> {
    let display = path.display().to_string();
    let data = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            GlossaryError::FileNotFound {
                path: display.clone(),
            }
        } else {
            GlossaryError::Io {
                path: display.clone(),
                source: e,
            }
        }
    })?;

    let csv_err = |message: String| GlossaryError::Csv {
        path: display.clone(),
        message,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(data.as_slice());
    let headers = reader
        .headers()
        .map_err(|e| csv_err(format!("header: {e}")))?
        .clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().trim_start_matches('\u{feff}') == name)
            .ok_or_else(|| csv_err(format!("missing `{name}` column")))
    };
    let cn_idx = column(SOURCE_COLUMN)?;
    let tw_idx = column(TARGET_COLUMN)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_err(e.to_string()))?;
        let source = record.get(cn_idx).unwrap_or("").trim();
        let targets = record.get(tw_idx).unwrap_or("").trim();
        if source.is_empty() && targets.is_empty() {
            continue;
        }
        rows.push((source.to_string(), targets.to_string()));
    }
    Ok(rows)
}

/// Write a `cn,tw` table through a temp file in the same directory, then
/// move it into place so readers never observe a half-written file.
pub(crate) fn write_table(path: &Path, rows: &[(String, String)]) -> GlossaryResult<()> {
    let io_err = |e: std::io::Error| GlossaryError::Io {
        path: path.display().to_string(),
        source: e,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(io_err)?;

    let mut temp = NamedTempFile::new_in(parent).map_err(io_err)?;
    {
        let mut writer = csv::Writer::from_writer(temp.as_file_mut());
        writer
            .write_record([SOURCE_COLUMN, TARGET_COLUMN])
            .map_err(|e| GlossaryError::Csv {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        for (source, targets) in rows {
            writer
                .write_record([source, targets])
                .map_err(|e| GlossaryError::Csv {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
        }
        writer.flush().map_err(io_err)?;
    }
    temp.as_file_mut().flush().map_err(io_err)?;
    temp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
