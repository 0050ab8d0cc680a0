//! The article shape shared across all news providers.
//!
//! `Article` represents a single story from any provider.  Every provider
//! schema converts its native JSON into `Article`s so the store and UI can
//! stay provider-agnostic.
//!
//! ## For contributors
//!
//! Adapters never drop a story because a field is missing: optional fields
//! are `None`, and a missing headline becomes [`UNTITLED`].

use chrono::{DateTime, Utc};

/// Headline used when a provider returns a story without one.
pub const UNTITLED: &str = "(untitled)";

/// Where an article came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRef {
    /// Stable identifier (e.g. `guardian`, or the outlet id NewsAPI reports).
    pub id: String,
    /// Display name of the outlet (e.g. "The Guardian").
    pub name: String,
}

/// A single news story, normalised from any provider.
///
/// There is no identity beyond structural equality; the same story returned
/// by two providers stays two articles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Human-readable headline.
    pub title: String,

    /// Short summary or abstract, if the provider sent one.
    pub description: Option<String>,

    /// Canonical URL of the story.
    pub url: String,

    /// Lead image, if any.
    pub image_url: Option<String>,

    /// Publication timestamp exactly as the provider reported it (ISO-8601).
    pub published_at: String,

    pub source: SourceRef,
}

impl Article {
    /// Parse [`published_at`](Self::published_at) into a UTC timestamp.
    ///
    /// Providers disagree on offsets (`Z`, `+0000`, `+00:00`), so RFC-3339 is
    /// tried first and the compact offset form second.  Unparseable values
    /// yield `None`.
    pub fn published(&self) -> Option<DateTime<Utc>> {
        let raw = self.published_at.trim();
        DateTime::parse_from_rfc3339(raw)
            .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

pub(crate) fn title_or_untitled(title: Option<String>) -> String {
    title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Treat empty strings the same as missing fields.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_article(published_at: &str) -> Article {
        Article {
            title: "t".to_string(),
            description: None,
            url: "https://example.com".to_string(),
            image_url: None,
            published_at: published_at.to_string(),
            source: SourceRef {
                id: "test".to_string(),
                name: "Test".to_string(),
            },
        }
    }

    #[test]
    fn parses_rfc3339_with_zulu() {
        let a = make_article("2024-03-05T10:15:00Z");
        assert_eq!(
            a.published(),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 10, 15, 0).unwrap())
        );
    }

    #[test]
    fn parses_compact_offset() {
        // NYT article search reports offsets without a colon.
        let a = make_article("2024-03-05T12:15:00+0200");
        assert_eq!(
            a.published(),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 10, 15, 0).unwrap())
        );
    }

    #[test]
    fn garbage_timestamp_is_none() {
        assert!(make_article("yesterday").published().is_none());
        assert!(make_article("").published().is_none());
    }

    #[test]
    fn blank_title_becomes_untitled() {
        assert_eq!(title_or_untitled(None), UNTITLED);
        assert_eq!(title_or_untitled(Some("  ".into())), UNTITLED);
        assert_eq!(title_or_untitled(Some("Hi".into())), "Hi");
    }
}
