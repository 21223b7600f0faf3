//! Diagnostic error types for the terminology converter.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! so the CLI can print an error code and a hint alongside the message.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type.
///
/// Each variant wraps a subsystem-specific error and keeps its diagnostic
/// (code, help text, source chain) intact.
#[derive(Debug, Error, Diagnostic)]
pub enum TermsError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Direction(#[from] DirectionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Dictionary(#[from] DictionaryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Glossary(#[from] GlossaryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Harvest(#[from] HarvestError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Prompt(#[from] PromptError),
}

// ---------------------------------------------------------------------------
// Direction errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum DirectionError {
    #[error("invalid direction: \"{value}\"")]
    #[diagnostic(
        code(terms::direction::invalid_argument),
        help("Direction must be either `cn_to_tw` or `tw_to_cn`.")
    )]
    InvalidArgument { value: String },
}

// ---------------------------------------------------------------------------
// Dictionary errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum DictionaryError {
    #[error("vocabulary file not found: {path}")]
    #[diagnostic(
        code(terms::dictionary::not_found),
        help(
            "Check the --vocabulary path, or run `tw-terms update` to create \
             the glossary from the upstream comparison table."
        )
    )]
    NotFound { path: String },

    #[error("malformed vocabulary file {path}: {message}")]
    #[diagnostic(
        code(terms::dictionary::format),
        help(
            "A JSON vocabulary needs a top-level `cn_to_tw` object. \
             A CSV glossary needs a header row with `cn` and `tw` columns."
        )
    )]
    Format { path: String, message: String },

    #[error("failed to read vocabulary file {path}")]
    #[diagnostic(
        code(terms::dictionary::io),
        help("Check file permissions and that the file is UTF-8 encoded.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Glossary / snapshot / ledger errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GlossaryError {
    #[error("term not found in glossary: \"{term}\"")]
    #[diagnostic(
        code(terms::glossary::term_not_found),
        help("Look the term up with `tw-terms lookup {term}` to check its spelling.")
    )]
    TermNotFound { term: String },

    #[error("glossary file not found: {path}")]
    #[diagnostic(
        code(terms::glossary::not_found),
        help("Run `tw-terms update` first to create the glossary.")
    )]
    FileNotFound { path: String },

    #[error("I/O error on {path}")]
    #[diagnostic(
        code(terms::glossary::io),
        help(
            "A filesystem operation failed. Check that the data directory exists, \
             has correct permissions, and that the disk is not full."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table {path}: {message}")]
    #[diagnostic(
        code(terms::glossary::csv),
        help("The file must be UTF-8 CSV with a `cn,tw` header row.")
    )]
    Csv { path: String, message: String },

    #[error("cannot record deletion of \"{target}\" from \"{term}\"")]
    #[diagnostic(
        code(terms::glossary::unrecordable),
        help(
            "Deletion ledger lines are `source,target`, so neither term may contain \
             a comma or a line break. Edit the glossary file by hand instead."
        )
    )]
    Unrecordable { term: String, target: String },

    #[error("failed to back up {path} to {backup}")]
    #[diagnostic(
        code(terms::glossary::backup),
        help(
            "The previous glossary could not be renamed. Nothing was written; \
             check permissions on the glossary directory."
        )
    )]
    Backup {
        path: String,
        backup: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path} after backing it up to {backup}")]
    #[diagnostic(
        code(terms::glossary::write_after_backup),
        help(
            "The canonical glossary is missing. Restore it by renaming the \
             backup file back to the glossary path."
        )
    )]
    WriteAfterBackup {
        path: String,
        backup: String,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Harvest errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum HarvestError {
    #[error("fetch error for URL \"{url}\": {message}")]
    #[diagnostic(
        code(terms::harvest::fetch),
        help(
            "Failed to download the comparison table. Check that the URL is \
             reachable and the network is available; no files were modified."
        )
    )]
    Fetch { url: String, message: String },

    #[error("failed to read HTML from {path}")]
    #[diagnostic(
        code(terms::harvest::read),
        help("Check the --html path and that the file is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no term pairs found in {origin}")]
    #[diagnostic(
        code(terms::harvest::empty),
        help(
            "The page contained no `table.wikitable` rows with Chinese terms. \
             The page layout may have changed; no files were modified."
        )
    )]
    EmptyHarvest { origin: String },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(terms::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}: {message}")]
    #[diagnostic(
        code(terms::config::parse),
        help("Check the TOML syntax in the config file.")
    )]
    Parse { path: String, message: String },
}

// ---------------------------------------------------------------------------
// Prompt errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum PromptError {
    #[error("glossary block markers not found in {path}")]
    #[diagnostic(
        code(terms::prompt::markers_not_found),
        help(
            "The README must contain the line `請將以下文本中的技術術語進行轉換。轉換規則如下：` \
             followed later by `[在此處插入需要轉換的文本]`."
        )
    )]
    MarkersNotFound { path: String },

    #[error("I/O error on {path}")]
    #[diagnostic(code(terms::prompt::io), help("Check file paths and permissions."))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type TermsResult<T> = std::result::Result<T, TermsError>;
pub type DictionaryResult<T> = std::result::Result<T, DictionaryError>;
pub type GlossaryResult<T> = std::result::Result<T, GlossaryError>;
pub type HarvestResult<T> = std::result::Result<T, HarvestError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
pub type PromptResult<T> = std::result::Result<T, PromptError>;
