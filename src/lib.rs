/// This crate is a small document search engine offering Boolean retrieval and
/// TF-IDF Vector Space Model ranking over one fixed corpus.
pub mod vectorizer;
pub mod utils;
pub mod config;
pub mod error;
pub mod eval;

/// Search Engine
/// The top-level struct of this crate. It indexes a corpus once and answers
/// Boolean and cosine-ranked queries against it.
///
/// Internally, it holds:
/// - The normalized corpus
/// - Term and document frequency tables
/// - The IDF table
/// - An inverted index for Boolean retrieval
/// - One sparse TF-IDF matrix per configured weighting scheme
///
/// `SearchEngine<T, E>` has the following generic parameters:
/// - `T`: Normalizer applied to documents and queries (e.g., TextNormalizer)
/// - `E`: TF-IDF calculation engine type (e.g., DefaultTFIDFEngine)
///
/// # Thread Safety
/// The engine is immutable after `build`, so `&SearchEngine` can be shared
/// across threads.
pub use vectorizer::search::{SearchEngine, SearchHit, SearchMode};

/// Corpus
/// Immutable mapping from document id to its normalized token sequence.
/// Documents iterate in lexicographic id order.
pub use vectorizer::corpus::Corpus;

/// Token Frequency structure
/// A struct for analyzing/managing token occurrence frequency within a document.
/// It manages:
/// - The count of occurrences of each token
/// - The total number of tokens in the document
///
/// Used as base data for TF (Term Frequency) calculation.
pub use vectorizer::token::TokenFrequency;

/// TF IDF Calculation Engine Trait
/// A trait that defines the TF and IDF formulas.
///
/// By implementing this trait, you can plug different weighting strategies
/// into `SearchEngine<T, E>`.
/// A default implementation, `DefaultTFIDFEngine`, is provided and performs
/// textbook-style TF-IDF calculation with base-10 logarithms.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine, WeightScheme};

/// Search Hits
/// Ranked (document id, score) list with sorting and truncation helpers.
pub use vectorizer::evaluate::scoring::Hits;

/// Boolean Query Structure
/// A flat query of terms joined by AND / OR / NOT, evaluated left to right.
pub use vectorizer::evaluate::query::{BooleanOperator, BooleanQuery};

pub use error::{Result, SearchError};
pub use config::SearchConfig;
pub use utils::normalizer::{Normalizer, TextNormalizer};
