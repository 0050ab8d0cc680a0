//! The user-controlled query shape applied uniformly to all providers.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use thiserror::Error;

/// Invalid filter input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown category `{0}` (expected one of: business, entertainment, general, health, science, sports, technology)")]
    UnknownCategory(String),

    #[error("`{0}` is not a date in YYYY-MM-DD form")]
    MalformedDate(String),

    #[error("start date {0} is outside 2000-01-01..=today")]
    DateOutOfRange(NaiveDate),
}

/// Fixed, closed set of topic tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Business,
    Entertainment,
    General,
    Health,
    Science,
    Sports,
    Technology,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Business,
        Category::Entertainment,
        Category::General,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Technology,
    ];

    /// Lower-case tag, as NewsAPI expects it.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::General => "general",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }

    /// Step through `None → Business → … → Technology → None`.
    pub fn cycle(current: Option<Category>) -> Option<Category> {
        match current {
            None => Some(Self::ALL[0]),
            Some(c) => {
                let i = Self::ALL.iter().position(|x| *x == c).unwrap_or(0);
                Self::ALL.get(i + 1).copied()
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| FilterError::UnknownCategory(s.to_string()))
    }
}

/// Text, date lower bound and category.  Replaced wholesale on update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    /// Free text; empty means no text filter.
    pub search_term: String,
    /// Inclusive lower bound on publication date.
    pub start_date: Option<NaiveDate>,
    pub category: Option<Category>,
}

impl Filter {
    /// The trimmed search term, or `None` when blank.
    pub fn query(&self) -> Option<&str> {
        let q = self.search_term.trim();
        (!q.is_empty()).then_some(q)
    }

    /// Full-text search mode applies only to a text query without a category;
    /// everything else uses headline/listing mode.
    pub fn uses_full_text(&self) -> bool {
        self.query().is_some() && self.category.is_none()
    }

    /// Return a copy with `patch` applied field by field.
    pub fn patched(&self, patch: FilterPatch) -> Filter {
        Filter {
            search_term: patch.search_term.unwrap_or_else(|| self.search_term.clone()),
            start_date: patch.start_date.unwrap_or(self.start_date),
            category: patch.category.unwrap_or(self.category),
        }
    }
}

/// A by-field update.  `None` leaves a field alone; `Some(None)` clears the
/// optional ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub search_term: Option<String>,
    pub start_date: Option<Option<NaiveDate>>,
    pub category: Option<Option<Category>>,
}

impl FilterPatch {
    pub fn search_term(term: impl Into<String>) -> Self {
        Self {
            search_term: Some(term.into()),
            ..Self::default()
        }
    }

    pub fn start_date(date: Option<NaiveDate>) -> Self {
        Self {
            start_date: Some(date),
            ..Self::default()
        }
    }

    pub fn category(category: Option<Category>) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }
}

/// Earliest start date the dashboard accepts.
fn earliest_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Parse a user-entered start date.  Blank input clears the bound.
pub fn parse_start_date(input: &str) -> Result<Option<NaiveDate>, FilterError> {
    parse_start_date_as_of(input, Local::now().date_naive())
}

pub(crate) fn parse_start_date_as_of(
    input: &str,
    today: NaiveDate,
) -> Result<Option<NaiveDate>, FilterError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| FilterError::MalformedDate(input.to_string()))?;
    if date < earliest_start_date() || date > today {
        return Err(FilterError::DateOutOfRange(date));
    }
    Ok(Some(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_filter_is_empty() {
        let f = Filter::default();
        assert_eq!(f.search_term, "");
        assert!(f.start_date.is_none());
        assert!(f.category.is_none());
        assert!(!f.uses_full_text());
    }

    #[test]
    fn full_text_needs_term_and_no_category() {
        let mut f = Filter {
            search_term: "climate".into(),
            ..Filter::default()
        };
        assert!(f.uses_full_text());

        f.category = Some(Category::Science);
        assert!(!f.uses_full_text());

        f.category = None;
        f.search_term = "   ".into();
        assert!(!f.uses_full_text(), "whitespace is not a query");
    }

    #[test]
    fn patch_touches_only_named_fields() {
        let f = Filter {
            search_term: "rust".into(),
            start_date: Some(day(2024, 1, 1)),
            category: Some(Category::Technology),
        };

        let g = f.patched(FilterPatch::category(None));
        assert_eq!(g.search_term, "rust");
        assert_eq!(g.start_date, Some(day(2024, 1, 1)));
        assert!(g.category.is_none());

        let h = g.patched(FilterPatch::search_term("go"));
        assert_eq!(h.search_term, "go");
        assert_eq!(h.start_date, Some(day(2024, 1, 1)));
    }

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!("Sports".parse::<Category>(), Ok(Category::Sports));
        assert_eq!(" HEALTH ".parse::<Category>(), Ok(Category::Health));
        assert!(matches!(
            "politics".parse::<Category>(),
            Err(FilterError::UnknownCategory(_))
        ));
    }

    #[test]
    fn category_cycle_wraps_through_none() {
        let mut c = None;
        let mut seen = Vec::new();
        for _ in 0..8 {
            c = Category::cycle(c);
            seen.push(c);
        }
        assert_eq!(seen[0], Some(Category::Business));
        assert_eq!(seen[6], Some(Category::Technology));
        assert_eq!(seen[7], None);
    }

    #[test]
    fn start_date_bounds() {
        let today = day(2025, 6, 1);
        assert_eq!(parse_start_date_as_of("", today), Ok(None));
        assert_eq!(
            parse_start_date_as_of("2024-02-29", today),
            Ok(Some(day(2024, 2, 29)))
        );
        assert_eq!(
            parse_start_date_as_of("1999-12-31", today),
            Err(FilterError::DateOutOfRange(day(1999, 12, 31)))
        );
        assert_eq!(
            parse_start_date_as_of("2025-06-02", today),
            Err(FilterError::DateOutOfRange(day(2025, 6, 2)))
        );
        assert!(matches!(
            parse_start_date_as_of("06/01/2025", today),
            Err(FilterError::MalformedDate(_))
        ));
    }
}
