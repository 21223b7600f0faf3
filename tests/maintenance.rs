//! Manual edits followed by update cycles.
//!
//! A target removed by a maintainer must stay removed no matter how often
//! the upstream table is harvested again.

use std::path::{Path, PathBuf};

use tw_terms::config::TermsConfig;
use tw_terms::error::GlossaryError;
use tw_terms::glossary::Glossary;
use tw_terms::harvest::HtmlFileSource;
use tw_terms::ledger::DeletionLedger;
use tw_terms::maintain::GlossaryEditor;
use tw_terms::reconcile::TermOutcome;
use tw_terms::term::TargetSet;
use tw_terms::update::run_update;

fn fixture(name: &str) -> HtmlFileSource {
    HtmlFileSource::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name))
}

fn setup(dir: &Path) -> TermsConfig {
    let cfg = TermsConfig::discover(dir).unwrap();
    run_update(&cfg, &fixture("terms_v1.html")).unwrap();
    cfg
}

fn editor(cfg: &TermsConfig) -> GlossaryEditor {
    GlossaryEditor::open(&cfg.glossary, &cfg.ledger).unwrap()
}

#[test]
fn deleted_term_is_not_resurrected() {
    let dir = tempfile::TempDir::new().unwrap();
    let cfg = setup(dir.path());

    let outcome = editor(&cfg).remove_target("程序", "程式").unwrap();
    assert!(outcome.entry_removed);
    assert_eq!(std::fs::read_to_string(&cfg.ledger).unwrap(), "程序,程式\n");

    for _ in 0..2 {
        let report = run_update(&cfg, &fixture("terms_v1.html")).unwrap();
        assert_eq!(report.stats.skipped_deleted, 1);
        assert!(!Glossary::open(&cfg.glossary).unwrap().contains("程序"));
    }
}

#[test]
fn upstream_change_adds_only_undeleted_targets() {
    let dir = tempfile::TempDir::new().unwrap();
    let cfg = setup(dir.path());
    editor(&cfg).remove_target("程序", "程式").unwrap();

    let report = run_update(&cfg, &fixture("terms_v2.html")).unwrap();
    assert_eq!(report.stats.added, 2);

    let glossary = Glossary::open(&cfg.glossary).unwrap();
    assert_eq!(glossary.get("程序").unwrap().joined(), "程式碼");
}

#[test]
fn manual_additions_survive_unchanged_upstream() {
    let dir = tempfile::TempDir::new().unwrap();
    let cfg = setup(dir.path());

    let outcome = editor(&cfg)
        .replace_targets("软件", TargetSet::parse("軟體;軟件"))
        .unwrap();
    assert!(outcome.glossary_written);
    assert!(outcome.recorded.is_empty());

    run_update(&cfg, &fixture("terms_v2.html")).unwrap();
    let glossary = Glossary::open(&cfg.glossary).unwrap();
    assert_eq!(glossary.get("软件").unwrap().joined(), "軟件;軟體");
}

#[test]
fn removed_entry_blocks_every_target() {
    let dir = tempfile::TempDir::new().unwrap();
    let cfg = setup(dir.path());

    let outcome = editor(&cfg).remove_entry("默认").unwrap();
    assert_eq!(outcome.recorded, vec!["預設"]);

    let ledger = DeletionLedger::open(&cfg.ledger).unwrap();
    assert!(ledger.contains("默认", "預設"));

    let glossary = Glossary::load(&cfg.glossary).unwrap();
    let harvested = tw_terms::harvest::parse_term_tables(
        &std::fs::read_to_string(fixture("terms_v2.html").path).unwrap(),
    );
    let result = tw_terms::reconcile::reconcile(
        &glossary,
        &harvested,
        &tw_terms::snapshot::Snapshot::load(&cfg.snapshot).unwrap(),
        &ledger,
    );
    assert_eq!(result.outcomes["默认"], TermOutcome::SkippedDeleted);
    assert_eq!(result.outcomes["缺省"], TermOutcome::Preserved);
}

#[test]
fn legacy_joined_record_blocks_each_target() {
    let dir = tempfile::TempDir::new().unwrap();
    let cfg = setup(dir.path());
    std::fs::remove_file(&cfg.snapshot).unwrap();
    editor(&cfg).remove_entry("程序").unwrap();
    std::fs::write(&cfg.ledger, "程序,程式;程式碼\n").unwrap();

    let report = run_update(&cfg, &fixture("terms_v2.html")).unwrap();
    assert!(report.stats.skipped_deleted >= 1);
    assert!(!Glossary::open(&cfg.glossary).unwrap().contains("程序"));
}

#[test]
fn editing_unknown_term_fails_without_writing() {
    let dir = tempfile::TempDir::new().unwrap();
    let cfg = setup(dir.path());
    let before = std::fs::read(&cfg.glossary).unwrap();

    let err = editor(&cfg).remove_target("硬件", "硬體").unwrap_err();
    assert!(matches!(err, GlossaryError::TermNotFound { .. }));
    assert_eq!(std::fs::read(&cfg.glossary).unwrap(), before);
    assert!(!cfg.ledger.exists());
}
