//! Error types for the search engine.
//!
//! "No results" is never an error: unknown terms, empty queries and
//! length-mismatched Boolean queries all produce ordinary (possibly empty)
//! values. Errors are reserved for caller mistakes and startup failures.

use std::path::PathBuf;

use thiserror::Error;

use crate::vectorizer::tfidf::WeightScheme;

/// Errors surfaced by index construction, search and evaluation.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Weighting scheme string is not one of `sublinear_tf` / `raw_tf`
    #[error("unknown weighting scheme: {0:?} (expected \"sublinear_tf\" or \"raw_tf\")")]
    UnknownScheme(String),
    /// Scheme is valid but the engine was built without a matrix for it
    #[error("no TF-IDF matrix was built for scheme {0}")]
    SchemeNotIndexed(WeightScheme),
    /// No documents could be loaded
    #[error("corpus is empty: {0}")]
    EmptyCorpus(String),
    /// Directory-level I/O failure
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Evaluation gold set could not be parsed
    #[error("invalid gold set: {0}")]
    GoldSet(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
