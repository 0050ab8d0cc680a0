use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use dotenvy::dotenv;

use crate::source::{parse_start_date, Category, Filter, PerSource};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub api_keys: PerSource<String>,
    /// Where tracing output goes; logging is off when unset.
    pub log_file: Option<PathBuf>,
    pub http_timeout: Duration,
    /// Filter used for the first refresh.
    pub initial_filter: Filter,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            match lookup(key) {
                Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
                _ => bail!("{key} must be set"),
            }
        };

        let api_keys = PerSource {
            news_api: required("NEWS_API_KEY")?,
            guardian: required("GUARDIAN_API_KEY")?,
            nyt: required("NYT_API_KEY")?,
        };

        let http_timeout = match lookup("NEWSDECK_HTTP_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(
                v.trim()
                    .parse()
                    .context("NEWSDECK_HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            None => Duration::from_secs(30),
        };

        let initial_filter = Filter {
            search_term: lookup("NEWSDECK_QUERY").unwrap_or_default(),
            start_date: match lookup("NEWSDECK_FROM") {
                Some(v) => parse_start_date(&v).context("NEWSDECK_FROM is invalid")?,
                None => None,
            },
            category: match lookup("NEWSDECK_CATEGORY") {
                Some(v) if !v.trim().is_empty() => Some(
                    v.parse::<Category>()
                        .context("NEWSDECK_CATEGORY is invalid")?,
                ),
                _ => None,
            },
        };

        Ok(Self {
            api_keys,
            log_file: lookup("NEWSDECK_LOG")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            http_timeout,
            initial_filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const KEYS: [(&str, &str); 3] = [
        ("NEWS_API_KEY", "n"),
        ("GUARDIAN_API_KEY", "g"),
        ("NYT_API_KEY", "y"),
    ];

    #[test]
    fn keys_only_yields_defaults() {
        let cfg = Config::from_lookup(lookup(&KEYS)).unwrap();
        assert_eq!(cfg.api_keys.guardian, "g");
        assert_eq!(cfg.http_timeout, Duration::from_secs(30));
        assert!(cfg.log_file.is_none());
        assert_eq!(cfg.initial_filter, Filter::default());
    }

    #[test]
    fn missing_key_is_named() {
        let err = Config::from_lookup(lookup(&KEYS[..2])).unwrap_err();
        assert!(err.to_string().contains("NYT_API_KEY"));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let mut pairs = KEYS.to_vec();
        pairs[0] = ("NEWS_API_KEY", "  ");
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(err.to_string().contains("NEWS_API_KEY"));
    }

    #[test]
    fn initial_filter_is_parsed() {
        let mut pairs = KEYS.to_vec();
        pairs.extend([
            ("NEWSDECK_QUERY", "climate"),
            ("NEWSDECK_FROM", "2024-01-15"),
            ("NEWSDECK_CATEGORY", "Science"),
            ("NEWSDECK_HTTP_TIMEOUT_SECS", "5"),
            ("NEWSDECK_LOG", "/tmp/newsdeck.log"),
        ]);
        let cfg = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(cfg.initial_filter.search_term, "climate");
        assert_eq!(
            cfg.initial_filter.start_date,
            chrono::NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(cfg.initial_filter.category, Some(Category::Science));
        assert_eq!(cfg.http_timeout, Duration::from_secs(5));
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/newsdeck.log")));
    }

    #[test]
    fn bad_category_is_rejected() {
        let mut pairs = KEYS.to_vec();
        pairs.push(("NEWSDECK_CATEGORY", "politics"));
        assert!(Config::from_lookup(lookup(&pairs)).is_err());
    }
}
