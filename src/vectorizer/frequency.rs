//! Term / document frequency statistics.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::vectorizer::{corpus::Corpus, tfidf::{DefaultTFIDFEngine, TFIDFEngine}, token::TokenFrequency, DocId};

/// Per-document raw term counts, in corpus order
pub type TermFrequencyTable = IndexMap<DocId, TokenFrequency>;

/// term -> number of documents containing it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentFrequency {
    pub term_counts: IndexMap<Box<str>, u64>,
}

impl DocumentFrequency {
    #[inline]
    pub fn get(&self, term: &str) -> u64 {
        self.term_counts.get(term).copied().unwrap_or(0)
    }

    /// Vocabulary size
    #[inline]
    pub fn len(&self) -> usize {
        self.term_counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.term_counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.term_counts.iter().map(|(t, &c)| (t.as_ref(), c))
    }
}

/// term -> inverse document frequency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdfTable {
    pub idf: IndexMap<Box<str>, f64>,
    /// corpus size the table was computed for
    pub doc_num: u64,
}

impl IdfTable {
    /// IDF of `term`, `None` if no document contains it
    #[inline]
    pub fn get(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.idf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.idf.iter().map(|(t, &v)| (t.as_ref(), v))
    }
}

/// Raw token counts for every document
pub fn calculate_tf(corpus: &Corpus) -> TermFrequencyTable {
    corpus
        .iter()
        .map(|(doc_id, tokens)| (doc_id.clone(), tokens.iter().collect::<TokenFrequency>()))
        .collect()
}

/// Distinct-document counts per term.
/// Repeats within one document count once.
pub fn calculate_df(corpus: &Corpus) -> DocumentFrequency {
    let mut term_counts: IndexMap<Box<str>, u64> = IndexMap::new();
    for (_, tokens) in corpus.iter() {
        let distinct: TokenFrequency = tokens.iter().collect();
        for term in distinct.token_set_ref_str() {
            if let Some(count) = term_counts.get_mut(term) {
                *count += 1;
            } else {
                term_counts.insert(Box::from(term), 1);
            }
        }
    }
    DocumentFrequency { term_counts }
}

/// `log10(N / (DF + 1))` for every term with a DF entry
pub fn calculate_idf(df: &DocumentFrequency, doc_num: u64) -> IdfTable {
    calculate_idf_with::<DefaultTFIDFEngine>(df, doc_num)
}

/// IDF under an arbitrary engine
pub fn calculate_idf_with<E: TFIDFEngine>(df: &DocumentFrequency, doc_num: u64) -> IdfTable {
    let idf = df
        .term_counts
        .iter()
        .map(|(term, &doc_freq)| (term.clone(), E::idf(doc_num, doc_freq)))
        .collect();
    IdfTable { idf, doc_num }
}
