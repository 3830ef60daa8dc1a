use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    error::SearchError,
    utils::math,
    vectorizer::{frequency::{IdfTable, TermFrequencyTable}, token::TokenFrequency, DocId},
};

/// Term-weighting formula applied to raw counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeightScheme {
    /// `1 + log10(count)`
    #[serde(rename = "sublinear_tf")]
    SublinearTf,
    /// `count`
    #[serde(rename = "raw_tf")]
    RawTf,
}

impl WeightScheme {
    pub const ALL: [WeightScheme; 2] = [WeightScheme::SublinearTf, WeightScheme::RawTf];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeightScheme::SublinearTf => "sublinear_tf",
            WeightScheme::RawTf => "raw_tf",
        }
    }
}

impl fmt::Display for WeightScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightScheme {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sublinear_tf" => Ok(WeightScheme::SublinearTf),
            "raw_tf" => Ok(WeightScheme::RawTf),
            other => Err(SearchError::UnknownScheme(other.to_string())),
        }
    }
}

/// TF-IDF calculation engine
/// Supplies the term weight and IDF formulas. Swap the engine to change
/// weighting without touching index construction or ranking.
pub trait TFIDFEngine {
    /// Weight of a term occurring `count` times
    fn tf(count: u32, scheme: WeightScheme) -> f64;
    /// IDF of a term found in `doc_freq` of `doc_num` documents
    fn idf(doc_num: u64, doc_freq: u64) -> f64;
}

/// Textbook TF-IDF with base-10 logs and `+1` DF smoothing
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl TFIDFEngine for DefaultTFIDFEngine {
    #[inline]
    fn tf(count: u32, scheme: WeightScheme) -> f64 {
        match scheme {
            WeightScheme::SublinearTf => {
                if count > 0 {
                    1.0 + (count as f64).log10()
                } else {
                    0.0
                }
            }
            WeightScheme::RawTf => count as f64,
        }
    }

    #[inline]
    fn idf(doc_num: u64, doc_freq: u64) -> f64 {
        (doc_num as f64 / (doc_freq as f64 + 1.0)).log10()
    }
}

/// Sparse `term -> weight` vector.
/// Only strictly positive weights are ever stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermVector {
    weights: IndexMap<Box<str>, f64>,
}

impl TermVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `weight` for `term` if it is > 0; returns whether it was stored.
    /// A non-positive weight removes any previous entry.
    #[inline]
    pub fn insert(&mut self, term: &str, weight: f64) -> bool {
        if weight > 0.0 {
            self.weights.insert(Box::from(term), weight);
            true
        } else {
            self.weights.shift_remove(term);
            false
        }
    }

    #[inline]
    pub fn get(&self, term: &str) -> Option<f64> {
        self.weights.get(term).copied()
    }

    /// Number of stored (non-zero) entries
    #[inline]
    pub fn nnz(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(t, &w)| (t.as_ref(), w))
    }

    /// Euclidean norm over every stored term
    #[inline]
    pub fn norm(&self) -> f64 {
        math::l2_norm(&self.weights)
    }

    /// Σ(self_i * other_i) over the terms of `self`
    #[inline]
    pub fn dot(&self, other: &TermVector) -> f64 {
        math::sparse_dot(&self.weights, &other.weights)
    }

    /// Weight every term of `freq` under `scheme`
    pub fn from_frequency<E: TFIDFEngine>(freq: &TokenFrequency, idf: &IdfTable, scheme: WeightScheme) -> Self {
        let mut vec = TermVector {
            weights: IndexMap::with_capacity(freq.token_num()),
        };
        for (term, count) in freq.iter() {
            let tf_weight = E::tf(count, scheme);
            let idf_weight = idf.get(term).unwrap_or(0.0);
            vec.insert(term, tf_weight * idf_weight);
        }
        vec
    }
}

/// Document -> sparse TF-IDF row, for one scheme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfMatrix {
    pub scheme: WeightScheme,
    pub rows: IndexMap<DocId, TermVector>,
}

impl TfIdfMatrix {
    #[inline]
    pub fn row(&self, doc_id: &str) -> Option<&TermVector> {
        self.rows.get(doc_id)
    }

    #[inline]
    pub fn doc_num(&self) -> usize {
        self.rows.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DocId, &TermVector)> {
        self.rows.iter()
    }
}

/// Sparse TF-IDF matrix over every document of `tf`.
/// Rows are computed in parallel and kept in `tf` order.
pub fn build_tfidf_matrix(tf: &TermFrequencyTable, idf: &IdfTable, scheme: WeightScheme) -> TfIdfMatrix {
    build_tfidf_matrix_with::<DefaultTFIDFEngine>(tf, idf, scheme)
}

pub fn build_tfidf_matrix_with<E: TFIDFEngine>(tf: &TermFrequencyTable, idf: &IdfTable, scheme: WeightScheme) -> TfIdfMatrix {
    let rows: Vec<(DocId, TermVector)> = tf
        .par_iter()
        .map(|(doc_id, freq)| (doc_id.clone(), TermVector::from_frequency::<E>(freq, idf, scheme)))
        .collect();
    TfIdfMatrix {
        scheme,
        rows: rows.into_iter().collect(),
    }
}

/// Query tokens weighted exactly like a document row
pub fn vectorize_query<T>(query_tokens: &[T], idf: &IdfTable, scheme: WeightScheme) -> TermVector
where
    T: AsRef<str>,
{
    vectorize_query_with::<DefaultTFIDFEngine, T>(query_tokens, idf, scheme)
}

pub fn vectorize_query_with<E: TFIDFEngine, T: AsRef<str>>(query_tokens: &[T], idf: &IdfTable, scheme: WeightScheme) -> TermVector {
    let mut freq = TokenFrequency::new();
    freq.add_tokens(query_tokens);
    TermVector::from_frequency::<E>(&freq, idf, scheme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::{corpus::Corpus, frequency::{calculate_df, calculate_idf, calculate_tf}};

    fn setup() -> (TermFrequencyTable, IdfTable) {
        let corpus = Corpus::from_tokens([
            ("d1", vec!["kuman", "kuman", "kuman", "sabun"]),
            ("d2", vec!["cuci", "tangan"]),
            ("d3", vec!["cuci", "air"]),
            ("d4", vec!["air", "minum"]),
            ("d5", vec!["gula"]),
        ]);
        let df = calculate_df(&corpus);
        (calculate_tf(&corpus), calculate_idf(&df, corpus.doc_num() as u64))
    }

    #[test]
    fn scheme_parses_known_strings_only() {
        assert_eq!("sublinear_tf".parse::<WeightScheme>().unwrap(), WeightScheme::SublinearTf);
        assert_eq!("raw_tf".parse::<WeightScheme>().unwrap(), WeightScheme::RawTf);
        let err = "bm25".parse::<WeightScheme>().unwrap_err();
        assert!(matches!(err, SearchError::UnknownScheme(ref s) if s == "bm25"));
        assert_eq!(WeightScheme::RawTf.to_string(), "raw_tf");
    }

    #[test]
    fn term_weights_follow_formulas() {
        assert_eq!(DefaultTFIDFEngine::tf(0, WeightScheme::SublinearTf), 0.0);
        assert_eq!(DefaultTFIDFEngine::tf(1, WeightScheme::SublinearTf), 1.0);
        assert!((DefaultTFIDFEngine::tf(100, WeightScheme::SublinearTf) - 3.0).abs() < 1e-12);
        assert_eq!(DefaultTFIDFEngine::tf(7, WeightScheme::RawTf), 7.0);
    }

    #[test]
    fn term_vector_never_stores_non_positive() {
        let mut v = TermVector::new();
        assert!(v.insert("a", 0.5));
        assert!(!v.insert("b", 0.0));
        assert!(!v.insert("c", -1.0));
        assert!(!v.insert("a", 0.0));
        assert!(v.is_empty());
    }

    #[test]
    fn matrix_rows_are_sparse_and_positive() {
        let (tf, idf) = setup();
        for scheme in WeightScheme::ALL {
            let matrix = build_tfidf_matrix(&tf, &idf, scheme);
            assert_eq!(matrix.doc_num(), 5);
            for (_, row) in matrix.iter() {
                assert!(row.iter().all(|(_, w)| w > 0.0));
            }
        }
    }

    #[test]
    fn matrix_weights_match_scheme() {
        let (tf, idf) = setup();
        let kuman_idf = idf.get("kuman").unwrap();
        let raw = build_tfidf_matrix(&tf, &idf, WeightScheme::RawTf);
        let sub = build_tfidf_matrix(&tf, &idf, WeightScheme::SublinearTf);
        assert!((raw.row("d1").unwrap().get("kuman").unwrap() - 3.0 * kuman_idf).abs() < 1e-12);
        let expected = (1.0 + 3f64.log10()) * kuman_idf;
        assert!((sub.row("d1").unwrap().get("kuman").unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn zero_idf_terms_are_omitted() {
        // N = 3, DF(cuci) = 2 -> log10(3/3) = 0
        let corpus = Corpus::from_tokens([("a", vec!["cuci"]), ("b", vec!["cuci", "x"]), ("c", vec!["y"])]);
        let idf = calculate_idf(&calculate_df(&corpus), 3);
        let matrix = build_tfidf_matrix(&calculate_tf(&corpus), &idf, WeightScheme::RawTf);
        assert!(matrix.row("a").unwrap().is_empty());
        assert_eq!(matrix.row("b").unwrap().get("cuci"), None);
    }

    #[test]
    fn query_vector_matches_document_row() {
        let (tf, idf) = setup();
        let matrix = build_tfidf_matrix(&tf, &idf, WeightScheme::SublinearTf);
        let query = vectorize_query(&["kuman", "kuman", "kuman", "sabun"], &idf, WeightScheme::SublinearTf);
        assert_eq!(&query, matrix.row("d1").unwrap());
    }

    #[test]
    fn query_vector_ignores_unknown_terms() {
        let (_, idf) = setup();
        let query = vectorize_query(&["tidakada"], &idf, WeightScheme::RawTf);
        assert!(query.is_empty());
    }
}
