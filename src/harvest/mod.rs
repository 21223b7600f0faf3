//! Harvesters: producers of raw `(mainland, taiwan)` term pairs.
//!
//! The reconciliation engine does not care where pairs come from. The
//! default source downloads the Wikibooks Mainland/Taiwan computing term
//! comparison page with a single HTTP GET (no retries); a saved copy of the
//! page can be used instead for offline runs.

pub mod table;

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{HarvestError, HarvestResult};
use crate::term::TermPair;

pub use table::parse_term_tables;

/// Anything that can produce a list of raw term pairs.
pub trait TermSource {
    /// Where the pairs come from, for logs and error messages.
    fn origin(&self) -> String;

    /// Produce the pairs. An empty harvest is an error.
    fn harvest(&self) -> HarvestResult<Vec<TermPair>>;
}

/// Downloads and parses the upstream comparison page.
pub struct WikiTableSource {
    pub url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl WikiTableSource {
    pub fn new(url: impl Into<String>, timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout,
            user_agent: user_agent.into(),
        }
    }

    /// Fetch the page body. One attempt only.
    pub fn fetch(&self) -> HarvestResult<String> {
        tracing::info!(url = %self.url, "fetching comparison table");
        let agent = ureq::AgentBuilder::new()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build();

        let response = agent.get(&self.url).call().map_err(|e| HarvestError::Fetch {
            url: self.url.clone(),
            message: e.to_string(),
        })?;
        response.into_string().map_err(|e| HarvestError::Fetch {
            url: self.url.clone(),
            message: format!("read body: {e}"),
        })
    }
}

impl TermSource for WikiTableSource {
    fn origin(&self) -> String {
        self.url.clone()
    }

    fn harvest(&self) -> HarvestResult<Vec<TermPair>> {
        let html = self.fetch()?;
        non_empty(parse_term_tables(&html), self.origin())
    }
}

/// Parses a saved copy of the comparison page.
pub struct HtmlFileSource {
    pub path: PathBuf,
}

impl HtmlFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TermSource for HtmlFileSource {
    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    fn harvest(&self) -> HarvestResult<Vec<TermPair>> {
        let html = std::fs::read_to_string(&self.path).map_err(|e| HarvestError::Read {
            path: self.origin(),
            source: e,
        })?;
        non_empty(parse_term_tables(&html), self.origin())
    }
}

fn non_empty(pairs: Vec<TermPair>, origin: String) -> HarvestResult<Vec<TermPair>> {
    if pairs.is_empty() {
        return Err(HarvestError::EmptyHarvest { origin });
    }
    tracing::info!(origin = %origin, pairs = pairs.len(), "harvested term pairs");
    Ok(pairs)
}
