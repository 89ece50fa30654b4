//! Keyword extraction from active task text.
//!
//! Produces the equal-weight keyword set used for relevance scoring.

use ctxpack_config::ScoringConfig;
use std::collections::HashSet;

/// Extracts lowercase, deduplicated keywords from short task strings.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    stop_words: HashSet<String>,
    min_len: usize,
}

impl KeywordExtractor {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            stop_words: config
                .stop_words
                .iter()
                .map(|w| w.to_lowercase())
                .collect(),
            min_len: config.min_keyword_len,
        }
    }

    /// Tokenize on whitespace and punctuation, lowercase, drop short tokens
    /// and stop words, then deduplicate keeping first-occurrence order.
    pub fn extract<S: AsRef<str>>(&self, tasks: &[S]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut keywords = Vec::new();

        for task in tasks {
            for token in task.as_ref().split(|c: char| !c.is_alphanumeric()) {
                if token.chars().count() < self.min_len {
                    continue;
                }
                let word = token.to_lowercase();
                if self.stop_words.contains(&word) {
                    continue;
                }
                if seen.insert(word.clone()) {
                    keywords.push(word);
                }
            }
        }

        keywords
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}
