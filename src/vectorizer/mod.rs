pub mod corpus;
pub mod evaluate;
pub mod frequency;
pub mod index;
pub mod search;
pub mod tfidf;
pub mod token;

/// Document identifier, e.g. the source file stem
pub type DocId = Box<str>;

pub use search::{SearchEngine, SearchHit, SearchMode};
