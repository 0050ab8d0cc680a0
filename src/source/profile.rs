//! Per-provider capability descriptors.
//!
//! A [`ProviderProfile`] captures everything that differs between the three
//! providers' request contracts, so a single adapter can serve all of them.

use super::filter::{Category, Filter};
use super::{guardian, newsapi, nyt, Page, Source};

/// Items requested per page, shared by every provider for visual parity.
pub const PAGE_SIZE: u32 = 5;

/// Which provider endpoint family a request uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Full-text search over the archive.
    FullText,
    /// Headlines / section listing.
    Listing,
}

impl QueryMode {
    pub fn for_filter(filter: &Filter) -> Self {
        if filter.uses_full_text() {
            QueryMode::FullText
        } else {
            QueryMode::Listing
        }
    }
}

/// How a provider expresses the category filter.
#[derive(Debug, Clone, Copy)]
pub enum CategoryParam {
    /// `name=<value>`.  When `listing_only`, full-text requests omit it.
    Plain {
        name: &'static str,
        listing_only: bool,
    },
    /// Lucene filter query on the news desk field: `name=news_desk:("<value>")`.
    NewsDesk { name: &'static str },
}

/// Maps a category onto the provider's nearest taxonomy value.
pub type CategoryValueFn = fn(Category) -> &'static str;

/// Decodes a response body for the given 1-based page.
pub type DecodeFn = fn(&[u8], u32) -> serde_json::Result<Page>;

/// Request contract of one provider.
#[derive(Clone, Copy)]
pub struct ProviderProfile {
    pub source: Source,
    /// Scheme and host, without trailing slash.
    pub base_url: &'static str,
    pub full_text_path: &'static str,
    pub listing_path: &'static str,
    /// Query parameter carrying the API key.
    pub key_param: &'static str,
    /// `None` when the provider has a fixed page size.
    pub page_size_param: Option<&'static str>,
    /// Items per wire page.  A multiple of [`PAGE_SIZE`]; larger pages are
    /// served one `PAGE_SIZE` slice per cursor step.
    pub wire_page_size: u32,
    /// Wire index of the first page (0 for zero-based APIs).
    pub first_page: u32,
    pub date_param: &'static str,
    /// `chrono` format string for the date lower bound.
    pub date_format: &'static str,
    pub category: CategoryParam,
    pub category_value: CategoryValueFn,
    /// Sent on every request.
    pub fixed_params: &'static [(&'static str, &'static str)],
    /// Sent only in listing mode.
    pub listing_params: &'static [(&'static str, &'static str)],
    pub decode: DecodeFn,
}

pub static NEWS_API: ProviderProfile = ProviderProfile {
    source: Source::NewsApi,
    base_url: "https://newsapi.org",
    full_text_path: "/v2/everything",
    listing_path: "/v2/top-headlines",
    key_param: "apiKey",
    page_size_param: Some("pageSize"),
    wire_page_size: PAGE_SIZE,
    first_page: 1,
    date_param: "from",
    date_format: "%Y-%m-%d",
    category: CategoryParam::Plain {
        name: "category",
        listing_only: true,
    },
    category_value: Category::as_str,
    fixed_params: &[],
    listing_params: &[("language", "en")],
    decode: newsapi::decode,
};

pub static GUARDIAN: ProviderProfile = ProviderProfile {
    source: Source::Guardian,
    base_url: "https://content.guardianapis.com",
    full_text_path: "/search",
    listing_path: "/search",
    key_param: "api-key",
    page_size_param: Some("page-size"),
    wire_page_size: PAGE_SIZE,
    first_page: 1,
    date_param: "from-date",
    date_format: "%Y-%m-%d",
    category: CategoryParam::Plain {
        name: "section",
        listing_only: false,
    },
    category_value: guardian_section,
    fixed_params: &[("show-fields", "headline,thumbnail,shortUrl,bodyText")],
    listing_params: &[],
    decode: guardian::decode,
};

pub static NYT: ProviderProfile = ProviderProfile {
    source: Source::Nyt,
    base_url: "https://api.nytimes.com",
    full_text_path: "/svc/search/v2/articlesearch.json",
    listing_path: "/svc/search/v2/articlesearch.json",
    key_param: "api-key",
    page_size_param: None,
    wire_page_size: nyt::WIRE_PAGE_SIZE,
    first_page: 0,
    date_param: "begin_date",
    date_format: "%Y%m%d",
    category: CategoryParam::NewsDesk { name: "fq" },
    category_value: nyt_news_desk,
    fixed_params: &[],
    listing_params: &[],
    decode: nyt::decode,
};

/// Guardian section ids.
fn guardian_section(category: Category) -> &'static str {
    match category {
        Category::Business => "business",
        Category::Entertainment => "culture",
        Category::General => "world",
        Category::Health => "society",
        Category::Science => "science",
        Category::Sports => "sport",
        Category::Technology => "technology",
    }
}

/// NYT desk names are capitalised.
fn nyt_news_desk(category: Category) -> &'static str {
    match category {
        Category::Business => "Business",
        Category::Entertainment => "Culture",
        Category::General => "National",
        Category::Health => "Health",
        Category::Science => "Science",
        Category::Sports => "Sports",
        Category::Technology => "Technology",
    }
}

impl ProviderProfile {
    pub fn for_source(source: Source) -> &'static ProviderProfile {
        match source {
            Source::NewsApi => &NEWS_API,
            Source::Guardian => &GUARDIAN,
            Source::Nyt => &NYT,
        }
    }

    pub fn path(&self, mode: QueryMode) -> &'static str {
        match mode {
            QueryMode::FullText => self.full_text_path,
            QueryMode::Listing => self.listing_path,
        }
    }

    /// Query parameters for `filter` at 1-based `page`, excluding the API key.
    pub fn query_params(&self, filter: &Filter, page: u32) -> Vec<(&'static str, String)> {
        let mode = QueryMode::for_filter(filter);
        let mut params: Vec<(&'static str, String)> = Vec::new();

        if let Some(name) = self.page_size_param {
            params.push((name, PAGE_SIZE.to_string()));
        }
        params.push(("page", self.wire_page(page).to_string()));

        params.extend(self.fixed_params.iter().map(|(k, v)| (*k, v.to_string())));
        if mode == QueryMode::Listing {
            params.extend(self.listing_params.iter().map(|(k, v)| (*k, v.to_string())));
        }

        if let Some(q) = filter.query() {
            params.push(("q", q.to_string()));
        }
        if let Some(date) = filter.start_date {
            params.push((self.date_param, date.format(self.date_format).to_string()));
        }
        if let Some(category) = filter.category {
            if let Some(pair) = self.category_param(category, mode) {
                params.push(pair);
            }
        }

        params
    }

    /// Wire page holding the `PAGE_SIZE` items of 1-based cursor `page`.
    pub fn wire_page(&self, page: u32) -> u32 {
        let skipped = page.saturating_sub(1) * PAGE_SIZE;
        self.first_page + skipped / self.wire_page_size
    }

    fn category_param(&self, category: Category, mode: QueryMode) -> Option<(&'static str, String)> {
        match self.category {
            CategoryParam::Plain { name, listing_only } => {
                if listing_only && mode == QueryMode::FullText {
                    None
                } else {
                    Some((name, (self.category_value)(category).to_string()))
                }
            }
            CategoryParam::NewsDesk { name } => Some((
                name,
                format!("news_desk:(\"{}\")", (self.category_value)(category)),
            )),
        }
    }
}
