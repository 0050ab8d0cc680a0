//! The Guardian Open Platform (`content.guardianapis.com/search`) schema.

use serde::Deserialize;

use super::article::{non_empty, title_or_untitled, Article, SourceRef};
use super::Page;

/// Characters of body text kept as the description.
const DESCRIPTION_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
struct Envelope {
    response: Response,
}

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    pages: u64,
    results: Vec<WireArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireArticle {
    web_title: Option<String>,
    #[serde(default)]
    web_url: String,
    #[serde(default)]
    web_publication_date: String,
    #[serde(default)]
    fields: Fields,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fields {
    body_text: Option<String>,
    thumbnail: Option<String>,
}

pub(crate) fn decode(body: &[u8], page: u32) -> serde_json::Result<Page> {
    let data: Envelope = serde_json::from_slice(body)?;
    let articles = data.response.results.into_iter().map(normalize).collect();

    Ok(Page {
        articles,
        has_more: data.response.pages > u64::from(page),
    })
}

fn normalize(a: WireArticle) -> Article {
    Article {
        title: title_or_untitled(a.web_title),
        description: non_empty(a.fields.body_text).map(|text| excerpt(&text)),
        url: a.web_url,
        image_url: non_empty(a.fields.thumbnail),
        published_at: a.web_publication_date,
        source: SourceRef {
            id: "guardian".to_string(),
            name: "The Guardian".to_string(),
        },
    }
}

/// First [`DESCRIPTION_CHARS`] characters followed by an ellipsis.
fn excerpt(text: &str) -> String {
    let mut out: String = text.chars().take(DESCRIPTION_CHARS).collect();
    out.push_str("...");
    out
}
