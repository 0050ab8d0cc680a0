//! New York Times Article Search (`/svc/search/v2/articlesearch.json`) schema.

use serde::Deserialize;

use super::article::{non_empty, title_or_untitled, Article, SourceRef};
use super::profile::PAGE_SIZE;
use super::Page;

/// Documents per Article Search page.  The API has no page-size parameter.
pub(crate) const WIRE_PAGE_SIZE: u32 = 10;

/// Multimedia URLs in older responses are relative to this host.
const MEDIA_HOST: &str = "https://www.nytimes.com/";

#[derive(Debug, Deserialize)]
struct Envelope {
    response: Response,
}

#[derive(Debug, Deserialize)]
struct Response {
    docs: Vec<Doc>,
    meta: Meta,
}

#[derive(Debug, Deserialize)]
struct Meta {
    #[serde(default)]
    hits: u64,
}

#[derive(Debug, Deserialize)]
struct Doc {
    #[serde(default)]
    headline: Headline,
    #[serde(rename = "abstract")]
    summary: Option<String>,
    #[serde(default)]
    web_url: String,
    #[serde(default)]
    pub_date: String,
    #[serde(default)]
    multimedia: Multimedia,
}

#[derive(Debug, Default, Deserialize)]
struct Headline {
    main: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Media {
    url: Option<String>,
}

/// Either the legacy list of renditions or the newer `{ "default": {...} }`
/// object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Multimedia {
    List(Vec<Media>),
    Object { default: Option<Media> },
    Other(serde::de::IgnoredAny),
}

impl Default for Multimedia {
    fn default() -> Self {
        Multimedia::List(Vec::new())
    }
}

impl Multimedia {
    fn first_url(self) -> Option<String> {
        let media = match self {
            Multimedia::List(list) => list.into_iter().next(),
            Multimedia::Object { default } => default,
            Multimedia::Other(_) => None,
        };
        non_empty(media.and_then(|m| m.url))
    }
}

/// Decode the wire page holding cursor `page` and keep that cursor's
/// `PAGE_SIZE` slice of it.
pub(crate) fn decode(body: &[u8], page: u32) -> serde_json::Result<Page> {
    let data: Envelope = serde_json::from_slice(body)?;
    let offset = (page.saturating_sub(1) * PAGE_SIZE) % WIRE_PAGE_SIZE;
    let articles = data
        .response
        .docs
        .into_iter()
        .skip(offset as usize)
        .take(PAGE_SIZE as usize)
        .map(normalize)
        .collect();

    Ok(Page {
        articles,
        has_more: u64::from(page) * u64::from(PAGE_SIZE) < data.response.meta.hits,
    })
}

fn normalize(doc: Doc) -> Article {
    let image_url = doc.multimedia.first_url().map(|url| {
        if url.starts_with("http://") || url.starts_with("https://") {
            url
        } else {
            format!("{MEDIA_HOST}{}", url.trim_start_matches('/'))
        }
    });

    Article {
        title: title_or_untitled(doc.headline.main),
        description: non_empty(doc.summary),
        url: doc.web_url,
        image_url,
        published_at: doc.pub_date,
        source: SourceRef {
            id: "nyt".to_string(),
            name: "The New York Times".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
      "status": "OK",
      "response": {
        "docs": [
          {
            "abstract": "Markets rallied.",
            "web_url": "https://www.nytimes.com/2024/05/01/business/markets.html",
            "headline": { "main": "Stocks Climb" },
            "pub_date": "2024-05-01T12:00:00+0000",
            "multimedia": [ { "url": "images/2024/05/01/markets.jpg" } ]
          },
          {
            "abstract": "",
            "web_url": "https://www.nytimes.com/2024/05/01/sports/game.html",
            "headline": { "main": "Late Goal" },
            "pub_date": "2024-05-01T11:00:00+0000",
            "multimedia": []
          },
          {
            "web_url": "https://www.nytimes.com/2024/05/01/us/new.html",
            "headline": { "main": "New Format" },
            "pub_date": "2024-05-01T10:00:00Z",
            "multimedia": { "default": { "url": "https://static01.nyt.com/x.jpg" } }
          }
        ],
        "meta": { "hits": 7, "offset": 0 }
      }
    }"#;

    #[test]
    fn maps_fields_and_resolves_relative_images() {
        let page = decode(BODY.as_bytes(), 1).unwrap();
        assert_eq!(page.articles.len(), 3);

        let first = &page.articles[0];
        assert_eq!(first.title, "Stocks Climb");
        assert_eq!(first.description.as_deref(), Some("Markets rallied."));
        assert_eq!(
            first.image_url.as_deref(),
            Some("https://www.nytimes.com/images/2024/05/01/markets.jpg")
        );
        assert_eq!(first.source.id, "nyt");

        let second = &page.articles[1];
        assert!(second.description.is_none());
        assert!(second.image_url.is_none());

        assert_eq!(
            page.articles[2].image_url.as_deref(),
            Some("https://static01.nyt.com/x.jpg")
        );
    }

    #[test]
    fn has_more_compares_items_seen_to_hits() {
        assert!(decode(BODY.as_bytes(), 1).unwrap().has_more);
        assert!(!decode(BODY.as_bytes(), 2).unwrap().has_more);
    }

    fn wire_page(first: usize, count: usize, hits: u64) -> String {
        let docs: Vec<String> = (first..first + count)
            .map(|i| {
                format!(
                    r#"{{"web_url":"https://www.nytimes.com/{i}.html","headline":{{"main":"Story {i}"}},"pub_date":"2024-05-01T10:00:00Z"}}"#
                )
            })
            .collect();
        format!(
            r#"{{"response":{{"docs":[{}],"meta":{{"hits":{hits}}}}}}}"#,
            docs.join(",")
        )
    }

    fn titles(page: &Page) -> Vec<&str> {
        page.articles.iter().map(|a| a.title.as_str()).collect()
    }

    #[test]
    fn each_cursor_step_takes_half_a_wire_page() {
        let body = wire_page(0, 10, 20);

        let first = decode(body.as_bytes(), 1).unwrap();
        assert_eq!(titles(&first), ["Story 0", "Story 1", "Story 2", "Story 3", "Story 4"]);

        let second = decode(body.as_bytes(), 2).unwrap();
        assert_eq!(titles(&second), ["Story 5", "Story 6", "Story 7", "Story 8", "Story 9"]);
    }

    #[test]
    fn exhausted_exactly_when_hits_are_a_multiple_of_ten() {
        let first = wire_page(0, 10, 20);
        let second = wire_page(10, 10, 20);

        let seen: Vec<bool> = [(1, &first), (2, &first), (3, &second), (4, &second)]
            .into_iter()
            .map(|(page, body)| {
                let decoded = decode(body.as_bytes(), page).unwrap();
                assert_eq!(decoded.articles.len(), 5, "cursor {page}");
                decoded.has_more
            })
            .collect();
        assert_eq!(seen, [true, true, true, false]);
    }

    #[test]
    fn short_last_wire_page_yields_remainder() {
        let body = wire_page(10, 3, 13);
        let decoded = decode(body.as_bytes(), 3).unwrap();
        assert_eq!(decoded.articles.len(), 3);
        assert!(!decoded.has_more);
    }

    #[test]
    fn missing_meta_is_an_error() {
        assert!(decode(br#"{"response":{"docs":[]}}"#, 1).is_err());
    }
}
