use serde::{Deserialize, Serialize};

use crate::vectorizer::tfidf::WeightScheme;

/// Number of matching terms attached to each VSM hit by default.
pub const DEFAULT_EXPLAIN_LIMIT: usize = 5;

/// Build-time options for [`SearchEngine`](crate::SearchEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Schemes to precompute a TF-IDF matrix for
    pub schemes: Vec<WeightScheme>,
    /// Max explanation terms per VSM hit
    pub explain_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            schemes: WeightScheme::ALL.to_vec(),
            explain_limit: DEFAULT_EXPLAIN_LIMIT,
        }
    }
}

impl SearchConfig {
    pub fn with_schemes<I>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = WeightScheme>,
    {
        self.schemes.clear();
        for scheme in schemes {
            if !self.schemes.contains(&scheme) {
                self.schemes.push(scheme);
            }
        }
        self
    }

    pub fn with_explain_limit(mut self, limit: usize) -> Self {
        self.explain_limit = limit;
        self
    }
}
