use std::fmt::Debug;

use rayon::prelude::*;

use crate::{
    utils::sort::sort_by_score_desc,
    vectorizer::{tfidf::{TermVector, TfIdfMatrix}, DocId},
};

/// Ranked search results
pub struct Hits<K> {
    /// (Document ID, Score)
    pub list: Vec<(K, f64)>,
}

impl<K> Hits<K> {
    pub fn new(list: Vec<(K, f64)>) -> Self {
        Hits { list }
    }

    /// Keep the first `k` entries
    pub fn top_k(&mut self, k: usize) -> &mut Self {
        self.list.truncate(k);
        self
    }

    /// Drop entries whose score is exactly 0
    pub fn retain_matches(&mut self) -> &mut Self {
        self.list.retain(|(_, s)| *s != 0.0);
        self
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn into_vec(self) -> Vec<(K, f64)> {
        self.list
    }
}

impl<K: Ord> Hits<K> {
    /// Score descending, key ascending among equal scores
    pub fn sort_by_score(&mut self) -> &mut Self {
        sort_by_score_desc(&mut self.list);
        self
    }
}

impl<K> Debug for Hits<K>
where
    K: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            writeln!(f, "Hits [")?;
            for (key, score) in &self.list {
                writeln!(f, "    {:?}: {:.6}", key, score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

/// cos(θ) = Σ(q_i * d_i) / (||d|| * ||q||)
///
/// The dot product only walks the query's terms. Norms cover each vector's
/// full term set. Zero dot product or zero norm gives 0.
pub fn cosine_similarity(doc_vector: &TermVector, query_vector: &TermVector) -> f64 {
    let dot = query_vector.dot(doc_vector);
    if dot == 0.0 {
        return 0.0;
    }
    let doc_norm = doc_vector.norm();
    let query_norm = query_vector.norm();
    if doc_norm == 0.0 || query_norm == 0.0 {
        return 0.0;
    }
    dot / (doc_norm * query_norm)
}

/// Score every document, drop non-matches (score 0), and return the best `k`
/// by descending score. Equal scores are ordered by document id.
pub fn rank_documents(matrix: &TfIdfMatrix, query_vector: &TermVector, k: usize) -> Vec<(DocId, f64)> {
    if k == 0 || query_vector.is_empty() {
        return Vec::new();
    }
    let scored: Vec<(DocId, f64)> = matrix
        .rows
        .par_iter()
        .map(|(doc_id, doc_vector)| (doc_id.clone(), cosine_similarity(doc_vector, query_vector)))
        .collect();
    let mut hits = Hits::new(scored);
    hits.retain_matches().sort_by_score().top_k(k);
    hits.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::{
        corpus::Corpus,
        frequency::{calculate_df, calculate_idf, calculate_tf},
        tfidf::{build_tfidf_matrix, vectorize_query, WeightScheme},
    };

    fn vector(entries: &[(&str, f64)]) -> TermVector {
        let mut v = TermVector::new();
        for (t, w) in entries {
            v.insert(t, *w);
        }
        v
    }

    fn matrix(scheme: WeightScheme) -> (TfIdfMatrix, crate::vectorizer::frequency::IdfTable) {
        let corpus = Corpus::from_tokens([
            ("d1", vec!["gula", "jantung", "gula"]),
            ("d2", vec!["gula", "olahraga"]),
            ("d3", vec!["olahraga", "pagi", "sehat"]),
            ("d4", vec!["sayur", "buah"]),
            ("d5", vec!["air", "minum"]),
            ("d6", vec!["tidur", "cukup"]),
        ]);
        let idf = calculate_idf(&calculate_df(&corpus), corpus.doc_num() as u64);
        (build_tfidf_matrix(&calculate_tf(&corpus), &idf, scheme), idf)
    }

    #[test]
    fn cosine_of_vector_with_itself_is_one() {
        let (m, idf) = matrix(WeightScheme::SublinearTf);
        let query = vectorize_query(&["gula", "jantung", "gula"], &idf, WeightScheme::SublinearTf);
        let score = cosine_similarity(m.row("d1").unwrap(), &query);
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cosine_ignores_document_only_terms_in_dot() {
        let doc = vector(&[("a", 3.0), ("b", 4.0)]);
        let query = vector(&[("a", 1.0)]);
        // dot = 3, |doc| = 5, |q| = 1
        assert!((cosine_similarity(&doc, &query) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn cosine_is_zero_without_overlap_or_norm() {
        let doc = vector(&[("a", 1.0)]);
        assert_eq!(cosine_similarity(&doc, &vector(&[("b", 1.0)])), 0.0);
        assert_eq!(cosine_similarity(&doc, &TermVector::new()), 0.0);
        assert_eq!(cosine_similarity(&TermVector::new(), &doc), 0.0);
    }

    #[test]
    fn ranking_is_bounded_sorted_and_non_zero() {
        let (m, idf) = matrix(WeightScheme::RawTf);
        let query = vectorize_query(&["gula", "olahraga", "sehat"], &idf, WeightScheme::RawTf);
        let all = rank_documents(&m, &query, 10);
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|(_, s)| *s > 0.0 && *s <= 1.0 + 1e-12));
        assert!(all.windows(2).all(|w| w[0].1 >= w[1].1));

        let top = rank_documents(&m, &query, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[..], all[..2]);
        assert!(rank_documents(&m, &query, 0).is_empty());
    }

    #[test]
    fn equal_scores_are_ordered_by_doc_id() {
        let mut rows = indexmap::IndexMap::new();
        rows.insert(DocId::from("b"), vector(&[("x", 1.0)]));
        rows.insert(DocId::from("a"), vector(&[("x", 2.0)]));
        rows.insert(DocId::from("c"), vector(&[("x", 1.0), ("y", 1.0)]));
        let m = TfIdfMatrix { scheme: WeightScheme::RawTf, rows };
        let ranked = rank_documents(&m, &vector(&[("x", 1.0)]), 10);
        let ids: Vec<&str> = ranked.iter().map(|(id, _)| id.as_ref()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn hits_debug_alternate_lists_entries() {
        let hits = Hits::new(vec![("d1", 0.5)]);
        let s = format!("{:#?}", hits);
        assert!(s.contains("\"d1\": 0.500000"));
    }
}
