//! NewsAPI (`newsapi.org`) response schema.

use serde::Deserialize;

use super::article::{non_empty, title_or_untitled, Article, SourceRef};
use super::profile::PAGE_SIZE;
use super::Page;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Response {
    #[serde(default)]
    total_results: u64,
    articles: Vec<WireArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireArticle {
    #[serde(default)]
    source: WireSource,
    title: Option<String>,
    description: Option<String>,
    #[serde(default)]
    url: String,
    url_to_image: Option<String>,
    #[serde(default)]
    published_at: String,
}

#[derive(Debug, Default, Deserialize)]
struct WireSource {
    id: Option<String>,
    name: Option<String>,
}

pub(crate) fn decode(body: &[u8], page: u32) -> serde_json::Result<Page> {
    let data: Response = serde_json::from_slice(body)?;
    let articles = data.articles.into_iter().map(normalize).collect();

    Ok(Page {
        articles,
        has_more: data.total_results > u64::from(page) * u64::from(PAGE_SIZE),
    })
}

fn normalize(a: WireArticle) -> Article {
    Article {
        title: title_or_untitled(a.title),
        description: non_empty(a.description),
        url: a.url,
        image_url: non_empty(a.url_to_image),
        published_at: a.published_at,
        source: SourceRef {
            id: non_empty(a.source.id).unwrap_or_else(|| "newsapi".to_string()),
            name: non_empty(a.source.name).unwrap_or_else(|| "News API".to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
      "status": "ok",
      "totalResults": 12,
      "articles": [
        {
          "source": { "id": "bbc-news", "name": "BBC News" },
          "author": "Someone",
          "title": "Climate talks resume",
          "description": "Delegates return to the table.",
          "url": "https://bbc.co.uk/news/1",
          "urlToImage": "https://bbc.co.uk/img/1.jpg",
          "publishedAt": "2024-05-01T08:00:00Z",
          "content": "..."
        },
        {
          "source": { "id": null, "name": "Local Paper" },
          "title": "Flooding downtown",
          "description": null,
          "url": "https://local.example/2",
          "urlToImage": null,
          "publishedAt": "2024-05-01T07:00:00Z"
        }
      ]
    }"#;

    #[test]
    fn maps_fields_and_fills_missing_source_id() {
        let page = decode(BODY.as_bytes(), 1).unwrap();
        assert_eq!(page.articles.len(), 2);

        let first = &page.articles[0];
        assert_eq!(first.title, "Climate talks resume");
        assert_eq!(first.description.as_deref(), Some("Delegates return to the table."));
        assert_eq!(first.image_url.as_deref(), Some("https://bbc.co.uk/img/1.jpg"));
        assert_eq!(first.source.id, "bbc-news");
        assert_eq!(first.published_at, "2024-05-01T08:00:00Z");

        let second = &page.articles[1];
        assert_eq!(second.source.id, "newsapi");
        assert_eq!(second.source.name, "Local Paper");
        assert!(second.description.is_none());
        assert!(second.image_url.is_none());
    }

    #[test]
    fn has_more_compares_total_to_items_seen() {
        // 12 results: pages 1 and 2 have more, page 3 (items 11-15) does not.
        assert!(decode(BODY.as_bytes(), 1).unwrap().has_more);
        assert!(decode(BODY.as_bytes(), 2).unwrap().has_more);
        assert!(!decode(BODY.as_bytes(), 3).unwrap().has_more);
    }

    #[test]
    fn missing_articles_array_is_an_error() {
        assert!(decode(br#"{"status":"ok","totalResults":3}"#, 1).is_err());
    }
}
