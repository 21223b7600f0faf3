// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # tw-terms
//!
//! Mainland-China ↔ Taiwan technical terminology conversion, plus the
//! tooling that keeps the local glossary in sync with an upstream
//! comparison table without resurrecting terms a maintainer deleted.
//!
//! ## Architecture
//!
//! - **Dictionary** (`dictionary`): bidirectional mappings loaded once per session
//! - **Substitution** (`convert`): longest-match-first, non-overlapping replacement
//! - **Reconciliation** (`reconcile`): merges a fresh harvest into the glossary
//! - **Deletion ledger** (`ledger`): append-only record of removed targets
//! - **Maintenance** (`maintain`): manual edits that feed the ledger
//! - **Harvesting** (`harvest`): upstream HTML table parsing
//!
//! ## Library usage
//!
//! ```no_run
//! use tw_terms::convert::Converter;
//! use tw_terms::dictionary::Dictionary;
//! use tw_terms::direction::Direction;
//!
//! let dict = Dictionary::load("terms.csv".as_ref()).unwrap();
//! let converter = Converter::new(dict);
//! let out = converter.convert("这个软件的数据库", Direction::CnToTw);
//! println!("{out}");
//! ```

pub mod config;
pub mod convert;
pub mod dictionary;
pub mod direction;
pub mod error;
pub mod glossary;
pub mod harvest;
pub mod ledger;
pub mod maintain;
pub mod prompt;
pub mod reconcile;
pub mod snapshot;
pub mod term;
pub mod update;

pub use convert::Converter;
pub use dictionary::Dictionary;
pub use direction::Direction;
pub use error::{TermsError, TermsResult};
