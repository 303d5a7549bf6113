//! Statistical keyword extraction (YAKE)
//!
//! YAKE ranks candidate phrases by position, frequency, casing and context
//! spread. Its score runs the "wrong" way: lower means more relevant.

use crate::config::KeywordConfig;
use std::collections::HashSet;
use yake_rust::{get_n_best, Config, StopWords};

/// A keyword with its raw YAKE score
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub text: String,
    /// Lower = more relevant
    pub score: f64,
}

pub struct KeywordExtractor {
    config: KeywordConfig,
    stopwords: StopWords,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(KeywordConfig::default())
    }
}

impl KeywordExtractor {
    pub fn new(config: KeywordConfig) -> Self {
        let stopwords =
            StopWords::predefined("en").unwrap_or_else(|| StopWords::custom(HashSet::new()));
        Self { config, stopwords }
    }

    /// Top `max_k` keywords with scores, most relevant first.
    ///
    /// Equal scores keep the order the extractor produced candidates in.
    pub fn extract_scored(&self, text: &str, max_k: usize) -> Vec<Keyword> {
        if max_k == 0 || text.trim().is_empty() {
            return Vec::new();
        }

        let yake_config = Config {
            ngrams: self.config.ngrams,
            remove_duplicates: true,
            deduplication_threshold: self.config.dedup_threshold,
            ..Config::default()
        };

        let mut keywords: Vec<Keyword> = get_n_best(max_k, text, &self.stopwords, &yake_config)
            .into_iter()
            .map(|item| Keyword {
                text: item.keyword,
                score: item.score,
            })
            .collect();

        // Stable, so ties stay in candidate order
        keywords.sort_by(|a, b| a.score.total_cmp(&b.score));
        keywords.truncate(max_k);
        keywords
    }

    /// Top `max_k` keyword phrases, most relevant first.
    pub fn extract(&self, text: &str, max_k: usize) -> Vec<String> {
        self.extract_scored(text, max_k)
            .into_iter()
            .map(|k| k.text)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOB_TEXT: &str = "We are hiring a senior backend engineer to build distributed \
        systems in Rust. The backend engineer will design distributed systems, \
        own Kubernetes deployments and mentor junior engineers. Experience with \
        distributed systems and Rust is required.";

    #[test]
    fn test_empty_text_yields_no_keywords() {
        let extractor = KeywordExtractor::default();
        assert!(extractor.extract("", 20).is_empty());
        assert!(extractor.extract("   \n ", 20).is_empty());
    }

    #[test]
    fn test_respects_max_k() {
        let extractor = KeywordExtractor::default();
        assert!(extractor.extract(JOB_TEXT, 5).len() <= 5);
        assert!(extractor.extract(JOB_TEXT, 1).len() <= 1);
        assert!(extractor.extract(JOB_TEXT, 0).is_empty());
    }

    #[test]
    fn test_scores_ascending() {
        let extractor = KeywordExtractor::default();
        let keywords = extractor.extract_scored(JOB_TEXT, 20);

        assert!(!keywords.is_empty());
        for pair in keywords.windows(2) {
            assert!(pair[0].score <= pair[1].score);
        }
    }

    #[test]
    fn test_keywords_come_from_the_text() {
        let extractor = KeywordExtractor::default();
        let lowered = JOB_TEXT.to_lowercase();

        for keyword in extractor.extract(JOB_TEXT, 10) {
            for word in keyword.split_whitespace() {
                assert!(lowered.contains(word), "{} not in text", word);
            }
        }
    }

    #[test]
    fn test_repeated_phrase_ranks_high() {
        let extractor = KeywordExtractor::default();
        let keywords = extractor.extract(JOB_TEXT, 10);
        assert!(
            keywords.iter().any(|k| k.contains("distributed systems") || k.contains("rust")),
            "unexpected keywords: {:?}",
            keywords
        );
    }

    #[test]
    fn test_deterministic() {
        let extractor = KeywordExtractor::default();
        assert_eq!(extractor.extract(JOB_TEXT, 20), extractor.extract(JOB_TEXT, 20));
    }
}
