//! Content-addressed memoization of parse results.
//!
//! Callers that re-parse a growing log on every render can key results by
//! the SHA-256 of the log text and the parser configuration; an unchanged
//! log then costs one hash instead of a full parse.

use std::collections::HashMap;

use runlog_core::DashboardData;
use sha2::{Digest, Sha256};

use crate::{LogParser, ParserConfig};

/// Computes the cache key for a log under a configuration.
pub fn content_digest(log: &str, config: &ParserConfig) -> String {
    let mut hasher = Sha256::new();
    hasher.update(config.fingerprint().as_bytes());
    hasher.update([0u8]);
    hasher.update(log.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// In-memory parse cache.
#[derive(Debug, Default)]
pub struct ReportCache {
    entries: HashMap<String, Option<DashboardData>>,
    hits: u64,
    misses: u64,
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached result for `log`, parsing and storing it on a miss.
    ///
    /// `tag_filter` is not part of the key since it never affects the result.
    pub fn get_or_parse(
        &mut self,
        parser: &LogParser,
        log: &str,
        tag_filter: &str,
    ) -> Option<DashboardData> {
        let key = content_digest(log, parser.config());
        if let Some(cached) = self.entries.get(&key) {
            self.hits += 1;
            return cached.clone();
        }

        self.misses += 1;
        let result = parser.parse(log, tag_filter);
        self.entries.insert(key, result.clone());
        result
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_stable_and_config_sensitive() {
        let config = ParserConfig::default();
        let a = content_digest("Scenario: A", &config);
        assert_eq!(a, content_digest("Scenario: A", &config));
        assert_eq!(a.len(), 64);
        assert_ne!(a, content_digest("Scenario: B", &config));
        assert_ne!(
            a,
            content_digest("Scenario: A", &config.clone().with_base_url("https://x"))
        );
    }

    #[test]
    fn test_digest_distinguishes_shifted_config_fields() {
        let a = ParserConfig {
            media_base_url: "a|b".to_string(),
            default_browser: "c".to_string(),
            ..ParserConfig::default()
        };
        let b = ParserConfig {
            media_base_url: "a".to_string(),
            default_browser: "b|c".to_string(),
            ..ParserConfig::default()
        };
        assert_ne!(content_digest("Scenario: A", &a), content_digest("Scenario: A", &b));
    }

    #[test]
    fn test_cache_hits_on_same_content() {
        let parser = LogParser::default();
        let mut cache = ReportCache::new();

        let first = cache.get_or_parse(&parser, "Scenario: Login\n✓ ok", "@smoke");
        let second = cache.get_or_parse(&parser, "Scenario: Login\n✓ ok", "@other");

        assert_eq!(first, second);
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_stores_empty_results() {
        let parser = LogParser::default();
        let mut cache = ReportCache::new();

        assert!(cache.get_or_parse(&parser, "", "").is_none());
        assert!(cache.get_or_parse(&parser, "", "").is_none());
        assert_eq!(cache.hits(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
