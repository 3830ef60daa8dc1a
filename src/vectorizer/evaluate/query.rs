use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    utils::{normalizer::Normalizer, sort::{difference_sorted, intersect_sorted, union_sorted}},
    vectorizer::{index::PostingSource, DocId},
};

/// Binary operator joining the running result to the next term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BooleanOperator {
    /// intersection
    And,
    /// union
    Or,
    /// set difference (running \ term), never unary negation
    Not,
}

impl BooleanOperator {
    /// Recognise `and` / `or` / `not` in any letter case
    pub fn from_token(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("and") {
            Some(BooleanOperator::And)
        } else if token.eq_ignore_ascii_case("or") {
            Some(BooleanOperator::Or)
        } else if token.eq_ignore_ascii_case("not") {
            Some(BooleanOperator::Not)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BooleanOperator::And => "AND",
            BooleanOperator::Or => "OR",
            BooleanOperator::Not => "NOT",
        }
    }

    /// Combine the running posting list with the next term's postings
    #[inline]
    pub fn apply(&self, running: &[usize], postings: &[usize]) -> Vec<usize> {
        match self {
            BooleanOperator::And => intersect_sorted(running, postings),
            BooleanOperator::Or => union_sorted(running, postings),
            BooleanOperator::Not => difference_sorted(running, postings),
        }
    }
}

impl fmt::Display for BooleanOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat Boolean query: terms and operators in the order they appeared.
///
/// Evaluation pairs `operators[i]` with `terms[i + 1]`, left to right, with no
/// precedence. Whatever is left over once either list runs out is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanQuery {
    pub terms: Vec<String>,
    pub operators: Vec<BooleanOperator>,
}

impl BooleanQuery {
    /// Split normalized tokens into terms and operators
    pub fn parse<T>(tokens: &[T]) -> Self
    where
        T: AsRef<str>,
    {
        let mut query = BooleanQuery::default();
        for token in tokens {
            let token = token.as_ref();
            match BooleanOperator::from_token(token) {
                Some(op) => query.operators.push(op),
                None => query.terms.push(token.to_string()),
            }
        }
        query
    }

    /// Normalize `query` with `normalizer`, then [`parse`](Self::parse)
    pub fn from_text<N>(query: &str, normalizer: &N) -> Self
    where
        N: Normalizer + ?Sized,
    {
        Self::parse(&normalizer.normalize(query))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// (operator, term) pairs that take part in evaluation
    #[inline]
    pub fn steps(&self) -> usize {
        self.operators.len().min(self.terms.len().saturating_sub(1))
    }

    /// Trailing terms with no operator to join them
    #[inline]
    pub fn ignored_terms(&self) -> usize {
        self.terms.len().saturating_sub(1) - self.steps()
    }

    /// Trailing operators with no term to apply to
    #[inline]
    pub fn ignored_operators(&self) -> usize {
        self.operators.len() - self.steps()
    }

    /// Matching document indices, ascending
    pub fn execute<P>(&self, index: &P) -> Vec<usize>
    where
        P: PostingSource + ?Sized,
    {
        let Some(first) = self.terms.first() else {
            return Vec::new();
        };
        let mut current = index.postings(first).to_vec();
        for (op, term) in self.operators.iter().zip(self.terms.iter().skip(1)) {
            current = op.apply(&current, index.postings(term));
        }
        current
    }

    /// Matching document ids, sorted lexicographically
    pub fn execute_ids<P>(&self, index: &P) -> Vec<DocId>
    where
        P: PostingSource + ?Sized,
    {
        self.execute(index)
            .into_iter()
            .filter_map(|idx| index.doc_id(idx).cloned())
            .collect()
    }
}

/// Evaluate a flat Boolean query string against `index`.
///
/// `all_doc_ids` is the full document set. Binary `NOT` never needs it, it is
/// taken so every retrieval entry point receives the same inputs.
pub fn evaluate_query<P, N>(query: &str, index: &P, _all_doc_ids: &[DocId], normalizer: &N) -> Vec<DocId>
where
    P: PostingSource + ?Sized,
    N: Normalizer + ?Sized,
{
    let parsed = BooleanQuery::from_text(query, normalizer);
    if parsed.is_empty() {
        debug!(query, "boolean query has no terms after normalization");
        return Vec::new();
    }
    if parsed.ignored_terms() > 0 || parsed.ignored_operators() > 0 {
        debug!(
            query,
            ignored_terms = parsed.ignored_terms(),
            ignored_operators = parsed.ignored_operators(),
            "boolean query terms and operators are unbalanced, extra items ignored"
        );
    }
    parsed.execute_ids(index)
}
