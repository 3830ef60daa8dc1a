use std::{collections::HashSet, marker::PhantomData, path::Path, time::Instant};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    config::SearchConfig,
    error::{Result, SearchError},
    utils::normalizer::{Normalizer, TextNormalizer},
    vectorizer::{
        corpus::{loader::load_documents, Corpus},
        evaluate::{query::evaluate_query, scoring::rank_documents},
        frequency::{calculate_df, calculate_idf_with, calculate_tf, DocumentFrequency, IdfTable, TermFrequencyTable},
        index::{build_inverted_index, InvertedIndex},
        tfidf::{build_tfidf_matrix_with, vectorize_query_with, DefaultTFIDFEngine, TFIDFEngine, TfIdfMatrix, WeightScheme},
        token::TokenFrequency,
        DocId,
    },
};

/// Score given to every Boolean match
pub const BOOLEAN_SCORE: f64 = 1.0;

/// One search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f64,
    /// Query terms found in the document; empty for Boolean hits
    pub explain: Vec<String>,
}

/// Retrieval model selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum SearchMode {
    Boolean,
    Vsm { k: usize, scheme: WeightScheme },
}

/// Search engine over one immutable corpus.
///
/// Every structure is built once in [`SearchEngine::build`] and only read
/// afterwards, so a shared reference can serve concurrent queries.
///
/// `SearchEngine<T, E>` generic parameters:
/// - `T`: token source used for documents and queries (e.g. `TextNormalizer`)
/// - `E`: TF-IDF calculation engine (e.g. `DefaultTFIDFEngine`)
#[derive(Debug, Clone)]
pub struct SearchEngine<T = TextNormalizer, E = DefaultTFIDFEngine>
where
    T: Normalizer,
    E: TFIDFEngine,
{
    corpus: Corpus,
    normalizer: T,
    config: SearchConfig,
    term_frequency: TermFrequencyTable,
    document_frequency: DocumentFrequency,
    idf: IdfTable,
    inverted_index: InvertedIndex,
    matrices: IndexMap<WeightScheme, TfIdfMatrix>,
    _marker: PhantomData<E>,
}

impl<T, E> SearchEngine<T, E>
where
    T: Normalizer,
    E: TFIDFEngine,
{
    /// Build every index structure from `corpus`.
    /// An empty corpus is an error.
    pub fn build(corpus: Corpus, normalizer: T, config: SearchConfig) -> Result<Self> {
        if corpus.is_empty() {
            return Err(SearchError::EmptyCorpus("no documents to index".to_string()));
        }
        let start = Instant::now();
        let doc_num = corpus.doc_num() as u64;

        let term_frequency = calculate_tf(&corpus);
        let document_frequency = calculate_df(&corpus);
        let idf = calculate_idf_with::<E>(&document_frequency, doc_num);
        info!(docs = doc_num, vocab = document_frequency.len(), "built frequency statistics");

        let inverted_index = build_inverted_index(&corpus);
        info!(terms = inverted_index.vocab_size(), "built inverted index");

        let mut matrices = IndexMap::with_capacity(config.schemes.len());
        for &scheme in &config.schemes {
            let matrix = build_tfidf_matrix_with::<E>(&term_frequency, &idf, scheme);
            let nnz: usize = matrix.iter().map(|(_, row)| row.nnz()).sum();
            info!(%scheme, nnz, "built tf-idf matrix");
            matrices.insert(scheme, matrix);
        }

        info!(elapsed_ms = start.elapsed().as_secs_f64() * 1000.0, "search engine ready");
        Ok(Self {
            corpus,
            normalizer,
            config,
            term_frequency,
            document_frequency,
            idf,
            inverted_index,
            matrices,
            _marker: PhantomData,
        })
    }

    /// Load `*.txt` documents from `dir`, normalize them and build.
    pub fn from_dir<P: AsRef<Path>>(dir: P, normalizer: T, config: SearchConfig) -> Result<Self> {
        let texts = load_documents(dir)?;
        let corpus = Corpus::from_texts(texts, &normalizer);
        Self::build(corpus, normalizer, config)
    }

    /// Boolean retrieval; every match scores [`BOOLEAN_SCORE`] with no explanation.
    pub fn search_boolean(&self, query: &str) -> Vec<SearchHit> {
        let ids = evaluate_query(query, &self.inverted_index, &self.inverted_index.doc_ids, &self.normalizer);
        debug!(query, hits = ids.len(), "boolean search");
        ids.into_iter()
            .map(|doc_id| SearchHit {
                doc_id,
                score: BOOLEAN_SCORE,
                explain: Vec::new(),
            })
            .collect()
    }

    /// Cosine-ranked retrieval of at most `k` documents under `scheme`.
    pub fn search_vsm(&self, query: &str, k: usize, scheme: WeightScheme) -> Result<Vec<SearchHit>> {
        let matrix = self
            .matrices
            .get(&scheme)
            .ok_or(SearchError::SchemeNotIndexed(scheme))?;

        let query_tokens = self.normalizer.normalize(query);
        let query_vector = vectorize_query_with::<E, _>(&query_tokens, &self.idf, scheme);
        let rankings = rank_documents(matrix, &query_vector, k);
        debug!(query, %scheme, k, query_terms = query_vector.nnz(), hits = rankings.len(), "vsm search");

        // distinct query terms in first-occurrence order
        let query_terms: TokenFrequency = query_tokens.iter().collect();
        Ok(rankings
            .into_iter()
            .map(|(doc_id, score)| {
                let explain = self.matching_terms(&doc_id, &query_terms);
                SearchHit { doc_id, score, explain }
            })
            .collect())
    }

    /// [`search_vsm`](Self::search_vsm) with the scheme given by name
    pub fn search_vsm_str(&self, query: &str, k: usize, scheme: &str) -> Result<Vec<SearchHit>> {
        self.search_vsm(query, k, scheme.parse()?)
    }

    pub fn search(&self, query: &str, mode: SearchMode) -> Result<Vec<SearchHit>> {
        match mode {
            SearchMode::Boolean => Ok(self.search_boolean(query)),
            SearchMode::Vsm { k, scheme } => self.search_vsm(query, k, scheme),
        }
    }

    fn matching_terms(&self, doc_id: &str, query_terms: &TokenFrequency) -> Vec<String> {
        let Some(doc_tokens) = self.corpus.tokens(doc_id) else {
            return Vec::new();
        };
        let doc_set: HashSet<&str> = doc_tokens.iter().map(|t| t.as_str()).collect();
        query_terms
            .token_set_ref_str()
            .into_iter()
            .filter(|term| doc_set.contains(term))
            .take(self.config.explain_limit)
            .map(str::to_string)
            .collect()
    }
}

/// Accessors
impl<T, E> SearchEngine<T, E>
where
    T: Normalizer,
    E: TFIDFEngine,
{
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn normalizer(&self) -> &T {
        &self.normalizer
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn doc_num(&self) -> usize {
        self.corpus.doc_num()
    }

    pub fn term_frequency(&self) -> &TermFrequencyTable {
        &self.term_frequency
    }

    pub fn document_frequency(&self) -> &DocumentFrequency {
        &self.document_frequency
    }

    pub fn idf(&self) -> &IdfTable {
        &self.idf
    }

    pub fn inverted_index(&self) -> &InvertedIndex {
        &self.inverted_index
    }

    /// Matrix built for `scheme`, if any
    pub fn matrix(&self, scheme: WeightScheme) -> Option<&TfIdfMatrix> {
        self.matrices.get(&scheme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::normalizer::WhitespaceNormalizer;

    fn engine(config: SearchConfig) -> SearchEngine<WhitespaceNormalizer> {
        let corpus = Corpus::from_tokens([
            ("d1", vec!["gula", "jantung", "gula", "darah"]),
            ("d2", vec!["gula", "olahraga"]),
            ("d3", vec!["olahraga", "pagi", "sehat"]),
            ("d4", vec!["sayur", "buah", "sehat"]),
            ("d5", vec!["air", "minum"]),
            ("d6", vec!["tidur", "cukup"]),
        ]);
        SearchEngine::build(corpus, WhitespaceNormalizer, config).unwrap()
    }

    #[test]
    fn empty_corpus_is_rejected() {
        let res = SearchEngine::<WhitespaceNormalizer>::build(Corpus::default(), WhitespaceNormalizer, SearchConfig::default());
        assert!(matches!(res, Err(SearchError::EmptyCorpus(_))));
    }

    #[test]
    fn boolean_hits_have_fixed_score_and_no_explanation() {
        let engine = engine(SearchConfig::default());
        let hits = engine.search_boolean("gula OR sehat");
        let ids: Vec<&str> = hits.iter().map(|h| h.doc_id.as_ref()).collect();
        assert_eq!(ids, vec!["d1", "d2", "d3", "d4"]);
        assert!(hits.iter().all(|h| h.score == BOOLEAN_SCORE && h.explain.is_empty()));
    }

    #[test]
    fn vsm_hits_are_ranked_and_explained() {
        let engine = engine(SearchConfig::default());
        let hits = engine.search_vsm("jantung gula darah", 5, WeightScheme::SublinearTf).unwrap();
        assert_eq!(hits[0].doc_id.as_ref(), "d1");
        assert_eq!(hits[0].explain, vec!["jantung", "gula", "darah"]);
        assert_eq!(hits[1].doc_id.as_ref(), "d2");
        assert_eq!(hits[1].explain, vec!["gula"]);
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn explanation_is_truncated() {
        let engine = engine(SearchConfig::default().with_explain_limit(2));
        let hits = engine.search_vsm("jantung gula darah", 1, WeightScheme::RawTf).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].explain, vec!["jantung", "gula"]);
    }

    #[test]
    fn unknown_scheme_string_fails_fast() {
        let engine = engine(SearchConfig::default());
        let err = engine.search_vsm_str("gula", 5, "tfidf").unwrap_err();
        assert!(matches!(err, SearchError::UnknownScheme(_)));
        assert!(engine.search_vsm_str("gula", 5, "raw_tf").is_ok());
    }

    #[test]
    fn scheme_without_matrix_is_error() {
        let engine = engine(SearchConfig::default().with_schemes([WeightScheme::RawTf]));
        assert!(engine.matrix(WeightScheme::SublinearTf).is_none());
        let err = engine.search_vsm("gula", 5, WeightScheme::SublinearTf).unwrap_err();
        assert!(matches!(err, SearchError::SchemeNotIndexed(WeightScheme::SublinearTf)));
    }

    #[test]
    fn search_dispatches_on_mode() {
        let engine = engine(SearchConfig::default());
        let boolean = engine.search("olahraga", SearchMode::Boolean).unwrap();
        assert_eq!(boolean.len(), 2);
        let vsm = engine
            .search("olahraga", SearchMode::Vsm { k: 1, scheme: WeightScheme::RawTf })
            .unwrap();
        assert_eq!(vsm.len(), 1);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let engine = engine(SearchConfig::default());
        assert!(engine.search_boolean("tidakada").is_empty());
        assert!(engine.search_vsm("tidakada", 5, WeightScheme::RawTf).unwrap().is_empty());
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<S: Send + Sync>() {}
        assert_send_sync::<SearchEngine>();
    }
}
