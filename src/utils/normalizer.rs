use std::{collections::HashSet, fs, path::Path};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, SearchError};

/// Token source
/// Turns raw text into the ordered sequence of normalized tokens the index
/// consumes. The same instance must be used for documents and queries.
pub trait Normalizer {
    fn normalize(&self, text: &str) -> Vec<String>;
}

/// Reduces a token to its stem.
pub trait Stemmer {
    fn stem(&self, token: &str) -> String;
}

/// Leaves tokens untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStemmer;

impl Stemmer for NoopStemmer {
    #[inline]
    fn stem(&self, token: &str) -> String {
        token.to_string()
    }
}

/// Anything that is not a lowercase ASCII letter or whitespace
static NON_ALPHA: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z\s]").expect("invalid non-alpha pattern"));

/// Indonesian function words dropped by default.
/// `and` / `or` / `not` are deliberately absent: they are Boolean operators.
const DEFAULT_STOP_WORDS: &[&str] = &[
    "ada", "adalah", "agar", "akan", "aku", "anda", "antara", "apa", "apabila", "atau",
    "bagi", "bahwa", "banyak", "beberapa", "begitu", "belum", "bisa", "bukan", "cara", "dalam",
    "dan", "dapat", "dari", "dengan", "di", "dia", "hal", "hanya", "harus", "hingga",
    "ia", "ini", "itu", "jadi", "jika", "juga", "kami", "kamu", "karena", "kata",
    "ke", "kepada", "ketika", "kita", "lagi", "lain", "lebih", "maka", "mereka", "namun",
    "oleh", "pada", "para", "perlu", "saat", "saja", "sama", "sangat", "sebagai", "sebelum",
    "sedang", "sehingga", "sejak", "seperti", "serta", "setelah", "sudah", "tanpa", "telah", "tentang",
    "tersebut", "tetapi", "tidak", "untuk", "yaitu", "yang",
];

/// Load a newline-delimited stop word list.
/// Blank lines are skipped, entries are lowercased.
pub fn load_stop_words<P: AsRef<Path>>(path: P) -> Result<HashSet<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| SearchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .collect())
}

/// Default text pipeline
/// lowercase -> strip everything but `a-z` -> split -> drop stop words -> stem
#[derive(Debug, Clone)]
pub struct TextNormalizer<S = NoopStemmer>
where
    S: Stemmer,
{
    stop_words: HashSet<String>,
    stemmer: S,
}

impl TextNormalizer<NoopStemmer> {
    /// Default stop words, no stemming
    pub fn new() -> Self {
        Self::with_stemmer(NoopStemmer)
    }
}

impl Default for TextNormalizer<NoopStemmer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> TextNormalizer<S>
where
    S: Stemmer,
{
    pub fn with_stemmer(stemmer: S) -> Self {
        Self {
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            stemmer,
        }
    }

    /// Replace the stop word list
    pub fn stop_words(mut self, stop_words: HashSet<String>) -> Self {
        self.stop_words = stop_words;
        self
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Case folding and punctuation/digit removal
    pub fn clean_text(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let cleaned = NON_ALPHA.replace_all(&lowered, " ");
        cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl<S> Normalizer for TextNormalizer<S>
where
    S: Stemmer,
{
    fn normalize(&self, text: &str) -> Vec<String> {
        self.clean_text(text)
            .split_whitespace()
            .filter(|token| !self.is_stop_word(token))
            .map(|token| self.stemmer.stem(token))
            .filter(|token| !token.is_empty())
            .collect()
    }
}

/// Splits on whitespace only.
/// For text that is already normalized.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceNormalizer;

impl Normalizer for WhitespaceNormalizer {
    fn normalize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SuffixStemmer;

    impl Stemmer for SuffixStemmer {
        fn stem(&self, token: &str) -> String {
            token.strip_suffix("kan").unwrap_or(token).to_string()
        }
    }

    #[test]
    fn clean_text_folds_case_and_strips_symbols() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.clean_text("Cuci   Tangan, 20 detik!"), "cuci tangan detik");
    }

    #[test]
    fn cleanup_pattern_is_compiled_once_for_all_normalizers() {
        let plain = TextNormalizer::new();
        let stemmed = TextNormalizer::with_stemmer(SuffixStemmer);
        assert_eq!(plain.clean_text("Sabun-Cair 2x!"), "sabun cair x");
        assert_eq!(stemmed.clean_text("Sabun-Cair 2x!"), "sabun cair x");
        let compiled = Lazy::get(&NON_ALPHA).unwrap();
        assert!(std::ptr::eq(compiled, &*NON_ALPHA));
    }

    #[test]
    fn normalize_drops_stop_words_keeps_operators() {
        let normalizer = TextNormalizer::new();
        assert_eq!(
            normalizer.normalize("Cuci tangan dan sabun AND kuman"),
            vec!["cuci", "tangan", "sabun", "and", "kuman"]
        );
    }

    #[test]
    fn normalize_applies_stemmer() {
        let normalizer = TextNormalizer::with_stemmer(SuffixStemmer);
        assert_eq!(normalizer.normalize("bersihkan tangan"), vec!["bersih", "tangan"]);
    }

    #[test]
    fn custom_stop_words_replace_defaults() {
        let stop_words: HashSet<String> = ["tangan".to_string()].into_iter().collect();
        let normalizer = TextNormalizer::new().stop_words(stop_words);
        assert_eq!(normalizer.normalize("cuci tangan dan"), vec!["cuci", "dan"]);
    }

    #[test]
    fn empty_text_yields_no_tokens() {
        assert!(TextNormalizer::new().normalize("  123 !! ").is_empty());
    }

    #[test]
    fn load_stop_words_reads_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stop.txt");
        fs::write(&path, "Yang\n\n  di \nke\n").unwrap();
        let words = load_stop_words(&path).unwrap();
        assert_eq!(words.len(), 3);
        assert!(words.contains("yang") && words.contains("di") && words.contains("ke"));
    }

    #[test]
    fn load_stop_words_missing_file_is_io_error() {
        let res = load_stop_words("/definitely/not/here.txt");
        assert!(matches!(res, Err(SearchError::Io { .. })));
    }
}
