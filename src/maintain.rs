//! Manual maintenance of the local glossary.
//!
//! Every target a maintainer removes is appended to the deletion ledger, so
//! later reconciliation runs never add it back. The ledger is always written
//! before the glossary: a removed target never lacks a record. All
//! operations are idempotent: repeating one writes nothing new.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{GlossaryError, GlossaryResult};
use crate::glossary::Glossary;
use crate::ledger::DeletionLedger;
use crate::term::TargetSet;

/// What an edit wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditOutcome {
    /// The glossary file was rewritten.
    pub glossary_written: bool,
    /// The whole entry is gone from the glossary.
    pub entry_removed: bool,
    /// Targets appended to the ledger by this edit.
    pub recorded: Vec<String>,
    /// Removed targets whose ledger record already existed.
    pub already_recorded: Vec<String>,
}

impl EditOutcome {
    pub fn is_noop(&self) -> bool {
        !self.glossary_written && self.recorded.is_empty()
    }
}

/// Edits an on-disk glossary and records removals in the ledger.
pub struct GlossaryEditor {
    path: PathBuf,
    glossary: Glossary,
    ledger: DeletionLedger,
}

impl GlossaryEditor {
    /// Open an existing glossary and its ledger (which may not exist yet).
    pub fn open(glossary_path: &Path, ledger_path: &Path) -> GlossaryResult<Self> {
        Ok(Self {
            path: glossary_path.to_path_buf(),
            glossary: Glossary::open(glossary_path)?,
            ledger: DeletionLedger::open(ledger_path)?,
        })
    }

    pub fn glossary(&self) -> &Glossary {
        &self.glossary
    }

    pub fn ledger(&self) -> &DeletionLedger {
        &self.ledger
    }

    fn current(&self, source: &str) -> GlossaryResult<TargetSet> {
        self.glossary
            .get(source)
            .cloned()
            .ok_or_else(|| GlossaryError::TermNotFound {
                term: source.to_string(),
            })
    }

    /// Remove one target from `source`, dropping the entry if it was the
    /// last one, and record `(source, target)` as deleted.
    pub fn remove_target(&mut self, source: &str, target: &str) -> GlossaryResult<EditOutcome> {
        let mut targets = self.current(source)?;
        let mut outcome = EditOutcome::default();
        self.record(source, [target], &mut outcome)?;

        if targets.remove(target) {
            if targets.is_empty() {
                self.glossary.remove(source);
                outcome.entry_removed = true;
            } else {
                self.glossary.insert(source, targets);
            }
            self.glossary.save(&self.path)?;
            outcome.glossary_written = true;
        } else {
            tracing::info!(source, target, "target not in glossary, ensured ledger record");
        }
        Ok(outcome)
    }

    /// Replace the full target set of `source`. Targets present before but
    /// absent after are recorded as deleted. An empty set removes the entry.
    pub fn replace_targets(
        &mut self,
        source: &str,
        new_targets: TargetSet,
    ) -> GlossaryResult<EditOutcome> {
        let old = self.current(source)?;
        let new_targets = new_targets.without([source]);
        if new_targets.is_empty() {
            return self.remove_entry(source);
        }
        if new_targets == old {
            tracing::info!(source, "targets unchanged, nothing to write");
            return Ok(EditOutcome::default());
        }

        let removed = old.difference(&new_targets);
        let mut outcome = EditOutcome::default();
        self.record(source, removed.iter(), &mut outcome)?;

        self.glossary.insert(source, new_targets);
        self.glossary.save(&self.path)?;
        outcome.glossary_written = true;
        Ok(outcome)
    }

    /// Remove the whole entry and record every one of its targets.
    pub fn remove_entry(&mut self, source: &str) -> GlossaryResult<EditOutcome> {
        let old = self.current(source)?;
        let mut outcome = EditOutcome::default();
        self.record(source, old.iter(), &mut outcome)?;

        self.glossary.remove(source);
        self.glossary.save(&self.path)?;
        outcome.glossary_written = true;
        outcome.entry_removed = true;
        Ok(outcome)
    }

    fn record<'a>(
        &mut self,
        source: &str,
        targets: impl IntoIterator<Item = &'a str>,
        outcome: &mut EditOutcome,
    ) -> GlossaryResult<()> {
        for target in targets {
            if self.ledger.record(source, target)? {
                outcome.recorded.push(target.to_string());
            } else {
                outcome.already_recorded.push(target.to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        _dir: tempfile::TempDir,
        glossary: PathBuf,
        ledger: PathBuf,
    }

    fn fixture(rows: &[(&str, &str)]) -> Fixture {
        let dir = tempfile::TempDir::new().unwrap();
        let glossary = dir.path().join("terms.csv");
        let ledger = dir.path().join("deleted_terms.txt");
        Glossary::from_rows(rows.iter().copied())
            .save(&glossary)
            .unwrap();
        Fixture {
            _dir: dir,
            glossary,
            ledger,
        }
    }

    fn editor(f: &Fixture) -> GlossaryEditor {
        GlossaryEditor::open(&f.glossary, &f.ledger).unwrap()
    }

    fn ledger_text(f: &Fixture) -> String {
        std::fs::read_to_string(&f.ledger).unwrap_or_default()
    }

    #[test]
    fn remove_target_keeps_other_targets() {
        let f = fixture(&[("程序", "程式;程序集")]);
        let outcome = editor(&f).remove_target("程序", "程式").unwrap();
        assert!(outcome.glossary_written);
        assert!(!outcome.entry_removed);
        assert_eq!(outcome.recorded, vec!["程式"]);

        let g = Glossary::open(&f.glossary).unwrap();
        assert_eq!(g.get("程序").unwrap().joined(), "程序集");
        assert_eq!(ledger_text(&f), "程序,程式\n");
    }

    #[test]
    fn remove_last_target_drops_entry() {
        let f = fixture(&[("程序", "程式"), ("算法", "演算法")]);
        let outcome = editor(&f).remove_target("程序", "程式").unwrap();
        assert!(outcome.entry_removed);
        let g = Glossary::open(&f.glossary).unwrap();
        assert!(!g.contains("程序"));
        assert!(g.contains("算法"));
    }

    #[test]
    fn remove_target_twice_writes_nothing_new() {
        let f = fixture(&[("程序", "程式;程序集")]);
        editor(&f).remove_target("程序", "程式").unwrap();
        let again = editor(&f).remove_target("程序", "程式").unwrap();
        assert!(again.is_noop());
        assert_eq!(again.already_recorded, vec!["程式"]);
        assert_eq!(ledger_text(&f), "程序,程式\n");
    }

    #[test]
    fn unknown_source_is_not_found() {
        let f = fixture(&[("程序", "程式")]);
        let mut ed = editor(&f);
        assert!(matches!(
            ed.remove_target("软件", "軟體"),
            Err(GlossaryError::TermNotFound { .. })
        ));
        assert!(matches!(
            ed.replace_targets("软件", TargetSet::parse("軟體")),
            Err(GlossaryError::TermNotFound { .. })
        ));
        assert!(!f.ledger.exists());
    }

    #[test]
    fn replace_records_only_dropped_targets() {
        let f = fixture(&[("软件", "軟件;軟體")]);
        let outcome = editor(&f)
            .replace_targets("软件", TargetSet::parse("軟體;軟體程式"))
            .unwrap();
        assert_eq!(outcome.recorded, vec!["軟件"]);

        let g = Glossary::open(&f.glossary).unwrap();
        assert_eq!(g.get("软件").unwrap().joined(), "軟體;軟體程式");
        assert_eq!(ledger_text(&f), "软件,軟件\n");
    }

    #[test]
    fn replace_with_same_set_is_noop() {
        let f = fixture(&[("软件", "軟件;軟體")]);
        let before = std::fs::read(&f.glossary).unwrap();
        let outcome = editor(&f)
            .replace_targets("软件", TargetSet::parse("軟體;軟件"))
            .unwrap();
        assert!(outcome.is_noop());
        assert_eq!(std::fs::read(&f.glossary).unwrap(), before);
        assert!(!f.ledger.exists());
    }

    #[test]
    fn rejected_ledger_record_leaves_glossary_untouched() {
        let f = fixture(&[("字符,串", "字串;字元串"), ("程序", "程式")]);
        let before = std::fs::read(&f.glossary).unwrap();
        let mut ed = editor(&f);

        assert!(matches!(
            ed.remove_target("字符,串", "字串"),
            Err(GlossaryError::Unrecordable { .. })
        ));
        assert!(matches!(
            ed.replace_targets("字符,串", TargetSet::parse("字元串")),
            Err(GlossaryError::Unrecordable { .. })
        ));
        assert!(matches!(
            ed.remove_entry("字符,串"),
            Err(GlossaryError::Unrecordable { .. })
        ));

        assert_eq!(std::fs::read(&f.glossary).unwrap(), before);
        assert!(ed.glossary().contains("字符,串"));
        assert!(!f.ledger.exists());
    }

    #[test]
    fn failed_glossary_save_keeps_ledger_record() {
        let f = fixture(&[("程序", "程式")]);
        let mut ed = editor(&f);
        std::fs::remove_file(&f.glossary).unwrap();
        std::fs::create_dir(&f.glossary).unwrap();

        assert!(ed.remove_target("程序", "程式").is_err());
        assert_eq!(ledger_text(&f), "程序,程式\n");
    }

    #[test]
    fn replace_with_empty_set_removes_entry() {
        let f = fixture(&[("软件", "軟件;軟體")]);
        let outcome = editor(&f).replace_targets("软件", TargetSet::new()).unwrap();
        assert!(outcome.entry_removed);
        assert_eq!(outcome.recorded, vec!["軟件", "軟體"]);
        assert_eq!(ledger_text(&f), "软件,軟件\n软件,軟體\n");
    }
}
