pub mod loader;

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{utils::normalizer::Normalizer, vectorizer::{token::TokenFrequency, DocId}};

/// Number of most frequent tokens reported per document.
pub const TOP_TOKENS: usize = 10;

/// Immutable mapping from document id to its ordered token sequence.
/// Documents are kept in lexicographic id order, so everything derived
/// from a corpus iterates deterministically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    documents: IndexMap<DocId, Vec<String>>,
}

impl Corpus {
    /// Build from already-normalized token sequences.
    /// A repeated id keeps the last sequence.
    pub fn from_tokens<I, K, T, S>(docs: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<DocId>,
        T: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut documents: IndexMap<DocId, Vec<String>> = docs
            .into_iter()
            .map(|(id, tokens)| (id.into(), tokens.into_iter().map(Into::into).collect()))
            .collect();
        documents.sort_keys();
        Self { documents }
    }

    /// Build from raw text, running every document through `normalizer`.
    pub fn from_texts<I, K, S, T>(docs: I, normalizer: &T) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<DocId>,
        S: AsRef<str>,
        T: Normalizer + ?Sized,
    {
        Self::from_tokens(docs.into_iter().map(|(id, text)| (id, normalizer.normalize(text.as_ref()))))
    }

    /// N
    #[inline]
    pub fn doc_num(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Token sequence of one document
    #[inline]
    pub fn tokens(&self, doc_id: &str) -> Option<&[String]> {
        self.documents.get(doc_id).map(|t| t.as_slice())
    }

    /// Position of `doc_id` in id order
    #[inline]
    pub fn doc_index(&self, doc_id: &str) -> Option<usize> {
        self.documents.get_index_of(doc_id)
    }

    /// Document ids in lexicographic order
    pub fn doc_ids(&self) -> impl Iterator<Item = &DocId> {
        self.documents.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DocId, &Vec<String>)> {
        self.documents.iter()
    }

    /// Distinct tokens across all documents, sorted
    pub fn vocabulary(&self) -> BTreeSet<&str> {
        self.documents
            .values()
            .flat_map(|tokens| tokens.iter().map(|t| t.as_str()))
            .collect()
    }

    pub fn statistics(&self) -> CorpusStatistics {
        CorpusStatistics::from_corpus(self)
    }
}

/// Length summary across documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LengthDistribution {
    pub mean: f64,
    pub min: usize,
    pub max: usize,
}

/// Per-document lengths and top tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusStatistics {
    pub doc_lengths: IndexMap<DocId, usize>,
    pub top_tokens: IndexMap<DocId, Vec<(String, u32)>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<LengthDistribution>,
}

impl CorpusStatistics {
    pub fn from_corpus(corpus: &Corpus) -> Self {
        let mut doc_lengths = IndexMap::with_capacity(corpus.doc_num());
        let mut top_tokens = IndexMap::with_capacity(corpus.doc_num());
        for (doc_id, tokens) in corpus.iter() {
            doc_lengths.insert(doc_id.clone(), tokens.len());
            let freq: TokenFrequency = tokens.iter().collect();
            top_tokens.insert(doc_id.clone(), freq.most_frequent(TOP_TOKENS));
        }

        let distribution = match (doc_lengths.values().min(), doc_lengths.values().max()) {
            (Some(&min), Some(&max)) => {
                let total: usize = doc_lengths.values().sum();
                Some(LengthDistribution {
                    mean: total as f64 / doc_lengths.len() as f64,
                    min,
                    max,
                })
            }
            _ => None,
        };

        Self {
            doc_lengths,
            top_tokens,
            distribution,
        }
    }
}
