//! Set-based and rank-based retrieval metrics.
//!
//! - Precision / Recall / F1 over unranked result sets (Boolean model)
//! - AP@k and nDCG@k over ranked result lists (VSM)

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Precision, recall and their harmonic mean
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PrecisionRecall {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Set-based precision, recall and F1.
///
/// Both inputs are treated as sets. An empty retrieved set gives precision 0,
/// an empty relevant set gives recall 0.
pub fn precision_recall_f1<R, G>(retrieved: &[R], relevant: &[G]) -> PrecisionRecall
where
    R: AsRef<str>,
    G: AsRef<str>,
{
    let retrieved: HashSet<&str> = retrieved.iter().map(|d| d.as_ref()).collect();
    let relevant: HashSet<&str> = relevant.iter().map(|d| d.as_ref()).collect();
    let true_positives = retrieved.intersection(&relevant).count() as f64;

    let precision = if retrieved.is_empty() { 0.0 } else { true_positives / retrieved.len() as f64 };
    let recall = if relevant.is_empty() { 0.0 } else { true_positives / relevant.len() as f64 };
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };
    PrecisionRecall { precision, recall, f1 }
}

/// AP@k: sum of precision at each relevant rank within the top `k`,
/// divided by the total number of relevant documents.
pub fn average_precision_at_k<R, G>(retrieved: &[R], relevant: &[G], k: usize) -> f64
where
    R: AsRef<str>,
    G: AsRef<str>,
{
    let relevant: HashSet<&str> = relevant.iter().map(|d| d.as_ref()).collect();
    if relevant.is_empty() {
        return 0.0;
    }
    let mut hits = 0usize;
    let mut sum_precisions = 0.0;
    for (i, doc) in retrieved.iter().take(k).enumerate() {
        if relevant.contains(doc.as_ref()) {
            hits += 1;
            sum_precisions += hits as f64 / (i + 1) as f64;
        }
    }
    sum_precisions / relevant.len() as f64
}

/// nDCG@k with linear gain: `DCG = Σ rel_i / log2(i + 2)` over 0-based ranks.
///
/// Returns 0 when the ideal DCG is 0 (no graded document above 0).
pub fn ndcg_at_k<R>(retrieved: &[R], graded: &IndexMap<String, u32>, k: usize) -> f64
where
    R: AsRef<str>,
{
    let dcg: f64 = retrieved
        .iter()
        .take(k)
        .enumerate()
        .map(|(i, doc)| graded.get(doc.as_ref()).copied().unwrap_or(0) as f64 / discount(i))
        .sum();

    let mut ideal: Vec<u32> = graded.values().copied().collect();
    ideal.sort_unstable_by(|a, b| b.cmp(a));
    let idcg: f64 = ideal
        .iter()
        .take(k)
        .enumerate()
        .map(|(i, &rel)| rel as f64 / discount(i))
        .sum();

    if idcg == 0.0 {
        0.0
    } else {
        dcg / idcg
    }
}

#[inline]
fn discount(rank: usize) -> f64 {
    ((rank + 2) as f64).log2()
}

/// Arithmetic mean, 0 for no values
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, n) = values.into_iter().fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}
