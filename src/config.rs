//! Configuration: file locations and harvester settings.
//!
//! Persisted as TOML (`tw-terms.toml` in the data directory). Every field has
//! a default, so an absent or partial file is fine. Relative paths resolve
//! against the data directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::harvest::WikiTableSource;

/// Name of the config file looked up in the data directory.
pub const CONFIG_FILE: &str = "tw-terms.toml";

/// Upstream comparison table: Wikibooks "大陆台湾计算机术语对照表".
pub const DEFAULT_SOURCE_URL: &str = "https://zh.wikibooks.org/w/index.php?title=%E5%A4%A7%E9%99%86%E5%8F%B0%E6%B9%BE%E8%AE%A1%E7%AE%97%E6%9C%BA%E6%9C%AF%E8%AF%AD%E5%AF%B9%E7%85%A7%E8%A1%A8&variant=zh";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TermsConfig {
    /// Local glossary table.
    #[serde(default = "default_glossary")]
    pub glossary: PathBuf,
    /// Snapshot of the previous harvest.
    #[serde(default = "default_snapshot")]
    pub snapshot: PathBuf,
    /// Append-only deletion ledger.
    #[serde(default = "default_ledger")]
    pub ledger: PathBuf,
    /// Vocabulary used for conversion. Defaults to the glossary.
    #[serde(default)]
    pub vocabulary: Option<PathBuf>,
    #[serde(default = "default_source_url")]
    pub source_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_glossary() -> PathBuf {
    "terms.csv".into()
}
fn default_snapshot() -> PathBuf {
    "terms_snapshot.csv".into()
}
fn default_ledger() -> PathBuf {
    "deleted_terms.txt".into()
}
fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    concat!("tw-terms/", env!("CARGO_PKG_VERSION")).into()
}

impl Default for TermsConfig {
    fn default() -> Self {
        Self {
            glossary: default_glossary(),
            snapshot: default_snapshot(),
            ledger: default_ledger(),
            vocabulary: None,
            source_url: default_source_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl TermsConfig {
    /// Parse a config file. Paths stay as written; see [`resolve`](Self::resolve).
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Read `tw-terms.toml` from `data_dir` if present, else defaults, and
    /// resolve paths against `data_dir`.
    pub fn discover(data_dir: &Path) -> ConfigResult<Self> {
        let file = data_dir.join(CONFIG_FILE);
        let config = if file.exists() {
            tracing::debug!(path = %file.display(), "loading config");
            Self::load(&file)?
        } else {
            Self::default()
        };
        Ok(config.resolve(data_dir))
    }

    /// Make every relative path absolute against `base`.
    pub fn resolve(mut self, base: &Path) -> Self {
        let join = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                base.join(p)
            }
        };
        self.glossary = join(&self.glossary);
        self.snapshot = join(&self.snapshot);
        self.ledger = join(&self.ledger);
        self.vocabulary = self.vocabulary.as_deref().map(join);
        self
    }

    /// The file conversion sessions load.
    pub fn vocabulary_path(&self) -> &Path {
        self.vocabulary.as_deref().unwrap_or(&self.glossary)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The configured upstream harvester.
    pub fn wiki_source(&self) -> WikiTableSource {
        WikiTableSource::new(&self.source_url, self.timeout(), &self.user_agent)
    }
}
