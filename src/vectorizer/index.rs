//! Term -> document posting structures for Boolean retrieval.
//!
//! Documents are addressed by their position in lexicographic id order, so a
//! sorted posting list of indices is also a lexicographically sorted list of
//! document ids.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::vectorizer::{corpus::Corpus, token::TokenFrequency, DocId};

/// Anything that can answer "which documents contain this term".
pub trait PostingSource {
    /// Ascending, duplicate-free document indices containing `term`.
    /// Empty for an unknown term.
    fn postings(&self, term: &str) -> &[usize];
    /// Document id at `index`
    fn doc_id(&self, index: usize) -> Option<&DocId>;
    /// Number of indexed documents
    fn doc_num(&self) -> usize;
}

/// term -> set of documents containing it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvertedIndex {
    /// Document ids, sorted; position is the document index
    pub doc_ids: Vec<DocId>,
    /// term -> ascending document indices
    pub token_dim_rev_index: IndexMap<Box<str>, Vec<usize>>,
}

impl InvertedIndex {
    /// Number of distinct terms
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.token_dim_rev_index.len()
    }

    /// Posting set of `term` as document ids, sorted
    pub fn posting_ids(&self, term: &str) -> Vec<&str> {
        self.postings(term)
            .iter()
            .map(|&idx| self.doc_ids[idx].as_ref())
            .collect()
    }
}

impl PostingSource for InvertedIndex {
    #[inline]
    fn postings(&self, term: &str) -> &[usize] {
        self.token_dim_rev_index.get(term).map(|p| p.as_slice()).unwrap_or(&[])
    }

    #[inline]
    fn doc_id(&self, index: usize) -> Option<&DocId> {
        self.doc_ids.get(index)
    }

    #[inline]
    fn doc_num(&self) -> usize {
        self.doc_ids.len()
    }
}

/// Each document id goes into the posting set of each of its distinct tokens.
pub fn build_inverted_index(corpus: &Corpus) -> InvertedIndex {
    let mut token_dim_rev_index: IndexMap<Box<str>, Vec<usize>> = IndexMap::new();
    let mut doc_ids = Vec::with_capacity(corpus.doc_num());
    // corpus iterates in id order, so pushes keep every list ascending
    for (doc_idx, (doc_id, tokens)) in corpus.iter().enumerate() {
        doc_ids.push(doc_id.clone());
        let distinct: TokenFrequency = tokens.iter().collect();
        for term in distinct.token_set_ref_str() {
            if let Some(list) = token_dim_rev_index.get_mut(term) {
                list.push(doc_idx);
            } else {
                token_dim_rev_index.insert(Box::from(term), vec![doc_idx]);
            }
        }
    }
    InvertedIndex {
        doc_ids,
        token_dim_rev_index,
    }
}

/// Sparse term-document incidence matrix.
/// Terms and documents are numbered by lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncidenceMatrix {
    /// term index -> ascending document indices
    pub matrix: Vec<Vec<usize>>,
    pub term_map: IndexMap<Box<str>, usize>,
    pub doc_map: IndexMap<DocId, usize>,
}

impl IncidenceMatrix {
    /// 1 if document `doc` contains term `term`, else 0
    pub fn cell(&self, term: &str, doc: &str) -> u8 {
        match (self.term_map.get(term), self.doc_map.get(doc)) {
            (Some(&t), Some(&d)) => self.matrix[t].binary_search(&d).is_ok() as u8,
            _ => 0,
        }
    }
}

impl PostingSource for IncidenceMatrix {
    #[inline]
    fn postings(&self, term: &str) -> &[usize] {
        self.term_map
            .get(term)
            .map(|&t| self.matrix[t].as_slice())
            .unwrap_or(&[])
    }

    #[inline]
    fn doc_id(&self, index: usize) -> Option<&DocId> {
        self.doc_map.get_index(index).map(|(id, _)| id)
    }

    #[inline]
    fn doc_num(&self) -> usize {
        self.doc_map.len()
    }
}

pub fn build_incidence_matrix(corpus: &Corpus) -> IncidenceMatrix {
    let vocabulary = corpus.vocabulary();
    let term_map: IndexMap<Box<str>, usize> = vocabulary
        .iter()
        .enumerate()
        .map(|(i, &term)| (Box::from(term), i))
        .collect();
    let doc_map: IndexMap<DocId, usize> = corpus
        .doc_ids()
        .enumerate()
        .map(|(i, id)| (id.clone(), i))
        .collect();

    let mut matrix = vec![Vec::new(); term_map.len()];
    for (doc_idx, (_, tokens)) in corpus.iter().enumerate() {
        let distinct: TokenFrequency = tokens.iter().collect();
        for term in distinct.token_set_ref_str() {
            if let Some(&term_idx) = term_map.get(term) {
                matrix[term_idx].push(doc_idx);
            }
        }
    }

    IncidenceMatrix {
        matrix,
        term_map,
        doc_map,
    }
}
