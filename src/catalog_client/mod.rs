use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, de::DeserializeOwned};

use crate::error::{ReaderError, ReaderResult};

/// Public book catalog the repository searches.
#[async_trait::async_trait]
pub trait BookCatalog: Send + Sync {
    /// Keyword search. The raw response is returned as-is.
    async fn search(&self, query: &str) -> ReaderResult<SearchResponse>;

    /// Single volume by its catalog id.
    async fn volume(&self, volume_id: &str) -> ReaderResult<Volume>;
}

#[derive(Clone, Debug)]
pub struct GoogleBooksClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const BODY_SNIPPET_CHARS: usize = 2000;

impl GoogleBooksClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://www.googleapis.com/books/v1";

    /// Create a new client with the given base URL (e.g. "https://www.googleapis.com/books/v1").
    pub fn new(base_url: impl Into<String>) -> ReaderResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base_url_str = base_url.into();
        tracing::debug!(base_url = %base_url_str, "creating GoogleBooksClient");
        Ok(GoogleBooksClient {
            base_url: base_url_str.trim_end_matches('/').to_string(),
            api_key: None,
            client,
        })
    }

    /// Return a client that sends `key=` with every request. Empty keys are ignored.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key = (!api_key.is_empty()).then_some(api_key);
        self
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub fn volumes_url(&self) -> String {
        self.url("/volumes")
    }

    pub fn volume_url(&self, volume_id: &str) -> String {
        self.url(&format!("/volumes/{}", urlencoding::encode(volume_id)))
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let req = self.client.get(url);
        match &self.api_key {
            Some(key) => req.query(&[("key", key.as_str())]),
            None => req,
        }
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        what: &str,
    ) -> ReaderResult<T> {
        let resp = req.send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ReaderError::NotFound(what.to_string()));
        }
        let status = resp.error_for_status()?;
        let body = status.text().await?;
        match serde_json::from_str::<T>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                let snippet: String = body.chars().take(BODY_SNIPPET_CHARS).collect();
                tracing::error!(error = %e, body_snippet = %snippet, what, "failed to parse catalog response");
                Err(e.into())
            }
        }
    }
}

#[async_trait::async_trait]
impl BookCatalog for GoogleBooksClient {
    /// GET /volumes?q=
    #[tracing::instrument(level = "debug", skip(self))]
    async fn search(&self, query: &str) -> ReaderResult<SearchResponse> {
        let url = self.volumes_url();
        tracing::debug!(%url, "GET volumes");
        let req = self.get(&url).query(&[("q", query)]);
        self.fetch_json(req, &format!("search {query:?}")).await
    }

    /// GET /volumes/{id}
    #[tracing::instrument(level = "debug", skip(self))]
    async fn volume(&self, volume_id: &str) -> ReaderResult<Volume> {
        let url = self.volume_url(volume_id);
        tracing::debug!(%url, "GET volume");
        let req = self.get(&url);
        self.fetch_json(req, &format!("volume {volume_id}")).await
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub kind: Option<String>,
    pub total_items: Option<i64>,
    /// Absent when the query has no hits.
    #[serde(default)]
    pub items: Vec<Volume>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub id: Option<String>,
    #[serde(default)]
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    /// HTML-bearing text.
    pub description: Option<String>,
    #[serde(deserialize_with = "de::opt_i64_from_str_or_num", default)]
    pub page_count: Option<i64>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub image_links: Option<ImageLinks>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub small_thumbnail: Option<String>,
    pub thumbnail: Option<String>,
}

/// Internal serde helpers
pub mod de {
    use serde::{Deserialize, Deserializer};

    /// Accept Option<i64> from either a number or a string like "320"; null/"" -> None.
    pub fn opt_i64_from_str_or_num<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum NumOrStr {
            Num(i64),
            Str(String),
        }

        let val: Option<NumOrStr> = Option::deserialize(deserializer)?;
        Ok(match val {
            None => None,
            Some(NumOrStr::Num(n)) => Some(n),
            Some(NumOrStr::Str(s)) => s.trim().parse::<i64>().ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_volume_urls() {
        let c = GoogleBooksClient::new("https://www.googleapis.com/books/v1/").unwrap();
        assert_eq!(c.volumes_url(), "https://www.googleapis.com/books/v1/volumes");
        assert_eq!(
            c.volume_url("zyTCAlFPjgYC"),
            "https://www.googleapis.com/books/v1/volumes/zyTCAlFPjgYC"
        );
        assert_eq!(
            c.volume_url("a b/c"),
            "https://www.googleapis.com/books/v1/volumes/a%20b%2Fc"
        );
    }

    #[test]
    fn empty_api_key_is_dropped() {
        let c = GoogleBooksClient::new(GoogleBooksClient::DEFAULT_BASE_URL)
            .unwrap()
            .with_api_key("");
        assert!(c.api_key.is_none());
    }

    #[test]
    fn search_response_deserialize_example() {
        let json = r#"{
    "kind": "books#volumes",
    "totalItems": 2,
    "items": [
        {
            "kind": "books#volume",
            "id": "zyTCAlFPjgYC",
            "etag": "f0zKg75Mx/I",
            "volumeInfo": {
                "title": "The Google Story",
                "authors": ["David A. Vise", "Mark Malseed"],
                "publisher": "Random House Digital, Inc.",
                "publishedDate": "2005-11-15",
                "description": "<p>Here is the story behind one of the most <b>remarkable</b> Internet successes.</p>",
                "pageCount": 207,
                "categories": ["Browsers (Computer programs)"],
                "imageLinks": {
                    "smallThumbnail": "http://books.google.com/books/content?id=zyTCAlFPjgYC&zoom=5",
                    "thumbnail": "http://books.google.com/books/content?id=zyTCAlFPjgYC&zoom=1"
                },
                "language": "en"
            }
        },
        {
            "id": "bare",
            "volumeInfo": { "title": "Only a title", "pageCount": "96" }
        }
    ]
}"#;

        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.total_items, Some(2));
        assert_eq!(parsed.items.len(), 2);
        let first = &parsed.items[0];
        assert_eq!(first.id.as_deref(), Some("zyTCAlFPjgYC"));
        assert_eq!(first.volume_info.authors.len(), 2);
        assert_eq!(first.volume_info.page_count, Some(207));
        assert_eq!(
            first
                .volume_info
                .image_links
                .as_ref()
                .and_then(|l| l.thumbnail.as_deref()),
            Some("http://books.google.com/books/content?id=zyTCAlFPjgYC&zoom=1")
        );
        let bare = &parsed.items[1].volume_info;
        assert_eq!(bare.page_count, Some(96));
        assert!(bare.authors.is_empty());
        assert!(bare.image_links.is_none());
    }

    #[test]
    fn search_response_without_items_is_empty() {
        let json = r#"{ "kind": "books#volumes", "totalItems": 0 }"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.items.is_empty());
    }

    #[test]
    fn unparsable_page_count_becomes_none() {
        let json = r#"{ "id": "x", "volumeInfo": { "pageCount": "many" } }"#;
        let v: Volume = serde_json::from_str(json).unwrap();
        assert_eq!(v.volume_info.page_count, None);
    }
}
