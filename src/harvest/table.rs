//! Term pair extraction from MediaWiki comparison tables.
//!
//! The upstream page lists one concept per row: column 1 holds the Taiwan
//! terms, column 2 the Mainland terms. A cell may hold several terms
//! separated by `；`, whitespace, `,`, `，`, or `、`, often annotated with
//! bracketed notes that are stripped.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::term::{TargetSet, TermPair};

static TABLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.wikitable").expect("static selector must parse"));
static ROW_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("static selector must parse"));
static CELL_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td, th").expect("static selector must parse"));

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static RE_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s,，、]").unwrap());
static RE_SQUARE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[.*?\]").unwrap());
static RE_PAREN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(.*?\)").unwrap());
static RE_FULLWIDTH_PAREN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"（.*?）").unwrap());
static RE_SYMBOLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s\x{4e00}-\x{9fff}]").unwrap());

/// Column holding the Taiwan terms.
const TAIWAN_CELL: usize = 1;
/// Column holding the Mainland terms.
const MAINLAND_CELL: usize = 2;

/// Extract `(mainland, taiwan)` pairs from every `table.wikitable`.
///
/// When a row lists as many Mainland terms as Taiwan terms they pair up by
/// position. Otherwise every Mainland term maps to the whole sorted set of
/// Taiwan terms in that row. That fallback over-generates for rows whose
/// cells are merely ordered differently; it is kept because the page has
/// no reliable alignment markup.
///
/// Self-pairs and repeated pairs are dropped; first occurrence order is kept.
pub fn parse_term_tables(html: &str) -> Vec<TermPair> {
    let document = Html::parse_document(html);
    let mut pairs = Vec::new();
    let mut seen = HashSet::new();

    for table in document.select(&TABLE_SEL) {
        for row in table.select(&ROW_SEL).skip(1) {
            let cells: Vec<ElementRef<'_>> = row.select(&CELL_SEL).collect();
            if cells.len() <= MAINLAND_CELL {
                continue;
            }
            let mainland = terms_in(&cell_text(&cells[MAINLAND_CELL]));
            let taiwan = terms_in(&cell_text(&cells[TAIWAN_CELL]));
            if mainland.is_empty() || taiwan.is_empty() {
                continue;
            }

            let row_pairs: Vec<TermPair> = if mainland.len() == taiwan.len() {
                mainland
                    .into_iter()
                    .zip(taiwan)
                    .map(|(cn, tw)| TermPair::new(cn, tw))
                    .collect()
            } else {
                let joined = taiwan.iter().map(String::as_str).collect::<TargetSet>().joined();
                mainland
                    .into_iter()
                    .map(|cn| TermPair::new(cn, joined.clone()))
                    .collect()
            };

            for pair in row_pairs {
                if !pair.is_self_mapping() && seen.insert(pair.clone()) {
                    pairs.push(pair);
                }
            }
        }
    }

    tracing::info!(pairs = pairs.len(), "parsed term tables");
    pairs
}

/// Text of a cell with each text node trimmed and concatenated.
fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text().map(str::trim).collect()
}

/// Split a cell into cleaned Chinese terms.
fn terms_in(cell: &str) -> Vec<String> {
    split_terms(cell)
        .into_iter()
        .filter(|t| is_chinese_term(t))
        .map(|t| clean_term(&t))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Split on full-width `；` first, then on whitespace, `,`, `，`, and `、`.
pub fn split_terms(cell: &str) -> Vec<String> {
    cell.split('；')
        .flat_map(|part| RE_SPLIT.split(part.trim()))
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Collapse whitespace, drop bracketed notes and punctuation.
pub fn clean_term(term: &str) -> String {
    let term = RE_WHITESPACE.replace_all(term.trim(), " ");
    let term = RE_SQUARE.replace_all(&term, "");
    let term = RE_PAREN.replace_all(&term, "");
    let term = RE_FULLWIDTH_PAREN.replace_all(&term, "");
    let term = RE_SYMBOLS.replace_all(&term, "");
    term.trim().to_string()
}

/// Whether the text contains at least one CJK unified ideograph.
pub fn is_chinese_term(term: &str) -> bool {
    term.chars().any(|c| ('\u{4e00}'..='\u{9fff}').contains(&c))
}
