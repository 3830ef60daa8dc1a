//! Gold-set evaluation of both retrieval models.
//!
//! The Boolean model is scored with set precision / recall / F1 against every
//! judged document. Each VSM scheme is scored with MAP@k (binary relevance,
//! grade > 0) and mean nDCG@k (graded relevance).

pub mod metrics;

use std::{fmt, fs, path::Path};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::{Result, SearchError},
    utils::normalizer::Normalizer,
    vectorizer::{search::SearchEngine, tfidf::{TFIDFEngine, WeightScheme}},
};

use self::metrics::{average_precision_at_k, mean, ndcg_at_k, precision_recall_f1, PrecisionRecall};

/// Default rank cutoff for AP and nDCG
pub const DEFAULT_EVAL_K: usize = 10;

/// One judged query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldQuery {
    pub query: String,
    /// document id -> relevance grade (0 = not relevant)
    pub relevant_docs_graded: IndexMap<String, u32>,
}

impl GoldQuery {
    /// Every judged document, whatever its grade
    pub fn judged_docs(&self) -> Vec<&str> {
        self.relevant_docs_graded.keys().map(|d| d.as_str()).collect()
    }

    /// Documents with grade > 0
    pub fn relevant_docs(&self) -> Vec<&str> {
        self.relevant_docs_graded
            .iter()
            .filter(|&(_, &grade)| grade > 0)
            .map(|(d, _)| d.as_str())
            .collect()
    }
}

/// query id -> judged query, in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoldSet {
    pub queries: IndexMap<String, GoldQuery>,
}

impl GoldSet {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SearchError::GoldSet(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SearchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BooleanQueryResult {
    pub qid: String,
    pub query: String,
    #[serde(flatten)]
    pub metrics: PrecisionRecall,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedQueryResult {
    pub qid: String,
    pub query: String,
    pub average_precision: f64,
    pub ndcg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BooleanReport {
    pub queries: Vec<BooleanQueryResult>,
    pub mean: PrecisionRecall,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemeReport {
    pub scheme: WeightScheme,
    pub queries: Vec<RankedQueryResult>,
    /// MAP@k
    pub map: f64,
    /// mean nDCG@k
    pub mean_ndcg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub k: usize,
    pub boolean: BooleanReport,
    pub vsm: Vec<SchemeReport>,
}

/// Run every gold query through both models.
///
/// Fails only if a requested scheme has no matrix in `engine`.
pub fn run_evaluation<T, E>(engine: &SearchEngine<T, E>, gold: &GoldSet, k: usize, schemes: &[WeightScheme]) -> Result<EvaluationReport>
where
    T: Normalizer,
    E: TFIDFEngine,
{
    let boolean_results: Vec<BooleanQueryResult> = gold
        .queries
        .iter()
        .map(|(qid, q)| {
            let hits = engine.search_boolean(&q.query);
            let retrieved: Vec<&str> = hits.iter().map(|h| h.doc_id.as_ref()).collect();
            BooleanQueryResult {
                qid: qid.clone(),
                query: q.query.clone(),
                metrics: precision_recall_f1(&retrieved, &q.judged_docs()),
            }
        })
        .collect();
    let boolean = BooleanReport {
        mean: PrecisionRecall {
            precision: mean(boolean_results.iter().map(|r| r.metrics.precision)),
            recall: mean(boolean_results.iter().map(|r| r.metrics.recall)),
            f1: mean(boolean_results.iter().map(|r| r.metrics.f1)),
        },
        queries: boolean_results,
    };

    let mut vsm = Vec::with_capacity(schemes.len());
    for &scheme in schemes {
        let mut queries = Vec::with_capacity(gold.len());
        for (qid, q) in &gold.queries {
            let hits = engine.search_vsm(&q.query, k, scheme)?;
            let retrieved: Vec<&str> = hits.iter().map(|h| h.doc_id.as_ref()).collect();
            queries.push(RankedQueryResult {
                qid: qid.clone(),
                query: q.query.clone(),
                average_precision: average_precision_at_k(&retrieved, &q.relevant_docs(), k),
                ndcg: ndcg_at_k(&retrieved, &q.relevant_docs_graded, k),
            });
        }
        let report = SchemeReport {
            scheme,
            map: mean(queries.iter().map(|r| r.average_precision)),
            mean_ndcg: mean(queries.iter().map(|r| r.ndcg)),
            queries,
        };
        info!(%scheme, k, map = report.map, ndcg = report.mean_ndcg, "evaluated scheme");
        vsm.push(report);
    }

    Ok(EvaluationReport { k, boolean, vsm })
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Boolean retrieval")?;
        for r in &self.boolean.queries {
            writeln!(
                f,
                "  {:<6} {:<32} P: {:.4}  R: {:.4}  F1: {:.4}",
                r.qid, r.query, r.metrics.precision, r.metrics.recall, r.metrics.f1
            )?;
        }
        let m = &self.boolean.mean;
        writeln!(f, "  {:<39} P: {:.4}  R: {:.4}  F1: {:.4}", "mean", m.precision, m.recall, m.f1)?;

        writeln!(f)?;
        writeln!(f, "Vector space model")?;
        let map_col = format!("MAP@{}", self.k);
        let ndcg_col = format!("nDCG@{}", self.k);
        writeln!(f, "| {:<15} | {:<10} | {:<10} |", "scheme", map_col, ndcg_col)?;
        writeln!(f, "|-{}-|-{}-|-{}-|", "-".repeat(15), "-".repeat(10), "-".repeat(10))?;
        for s in &self.vsm {
            writeln!(f, "| {:<15} | {:<10.4} | {:<10.4} |", s.scheme.as_str(), s.map, s.mean_ndcg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SearchConfig, utils::normalizer::WhitespaceNormalizer, vectorizer::corpus::Corpus};

    const GOLD: &str = r#"{
        "Q1": {"query": "cuci AND tangan", "relevant_docs_graded": {"d1": 2, "d3": 1}},
        "Q2": {"query": "kuman", "relevant_docs_graded": {"d3": 1, "d2": 0}}
    }"#;

    fn engine() -> SearchEngine<WhitespaceNormalizer> {
        let corpus = Corpus::from_tokens([
            ("d1", vec!["cuci", "tangan", "sabun"]),
            ("d2", vec!["cuci", "tangan"]),
            ("d3", vec!["sabun", "kuman"]),
            ("d4", vec!["air", "minum"]),
        ]);
        SearchEngine::build(corpus, WhitespaceNormalizer, SearchConfig::default()).unwrap()
    }

    #[test]
    fn gold_set_keeps_file_order() {
        let gold = GoldSet::from_json(GOLD).unwrap();
        let ids: Vec<&str> = gold.queries.keys().map(|k| k.as_str()).collect();
        assert_eq!(ids, vec!["Q1", "Q2"]);
        assert_eq!(gold.queries["Q2"].relevant_docs(), vec!["d3"]);
        assert_eq!(gold.queries["Q2"].judged_docs(), vec!["d3", "d2"]);
    }

    #[test]
    fn malformed_gold_set_is_error() {
        let err = GoldSet::from_json(r#"{"Q1": {"query": 3}}"#).unwrap_err();
        assert!(matches!(err, SearchError::GoldSet(_)));
    }

    #[test]
    fn missing_gold_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GoldSet::load(dir.path().join("gold.json")).unwrap_err();
        assert!(matches!(err, SearchError::Io { .. }));
    }

    #[test]
    fn boolean_metrics_use_every_judged_doc() {
        let gold = GoldSet::from_json(GOLD).unwrap();
        let report = run_evaluation(&engine(), &gold, 10, &WeightScheme::ALL).unwrap();
        // Q1 retrieves d1, d2; judged {d1, d3}
        let q1 = &report.boolean.queries[0].metrics;
        assert!((q1.precision - 0.5).abs() < 1e-9);
        assert!((q1.recall - 0.5).abs() < 1e-9);
        // Q2 retrieves d3; judged {d3, d2}
        let q2 = &report.boolean.queries[1].metrics;
        assert!((q2.precision - 1.0).abs() < 1e-9);
        assert!((q2.recall - 0.5).abs() < 1e-9);
        assert!((report.boolean.mean.precision - 0.75).abs() < 1e-9);
    }

    #[test]
    fn vsm_report_has_one_entry_per_scheme() {
        let gold = GoldSet::from_json(GOLD).unwrap();
        let report = run_evaluation(&engine(), &gold, 10, &WeightScheme::ALL).unwrap();
        assert_eq!(report.vsm.len(), 2);
        for scheme in &report.vsm {
            assert_eq!(scheme.queries.len(), 2);
            // Q2 "kuman" ranks d3 first, the only relevant doc
            assert!((scheme.queries[1].average_precision - 1.0).abs() < 1e-9);
            assert!((scheme.queries[1].ndcg - 1.0).abs() < 1e-9);
            assert!(scheme.map >= 0.0 && scheme.map <= 1.0);
        }
        let text = report.to_string();
        assert!(text.contains("MAP@10"));
        assert!(text.contains("sublinear_tf"));
    }

    #[test]
    fn unbuilt_scheme_fails_evaluation() {
        let corpus = Corpus::from_tokens([("d1", vec!["kuman"]), ("d2", vec!["air"])]);
        let engine: SearchEngine<WhitespaceNormalizer> = SearchEngine::build(
            corpus,
            WhitespaceNormalizer,
            SearchConfig::default().with_schemes([WeightScheme::RawTf]),
        )
        .unwrap();
        let gold = GoldSet::from_json(GOLD).unwrap();
        assert!(run_evaluation(&engine, &gold, 10, &[WeightScheme::SublinearTf]).is_err());
    }
}
