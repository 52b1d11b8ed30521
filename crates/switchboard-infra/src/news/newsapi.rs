//! NewsAPI `everything` search, implementing [`NewsSource`].

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

pub use switchboard_core::handler::news::NEWSAPI;
use switchboard_core::handler::news::NewsSource;
use switchboard_types::config::NewsConfig;
use switchboard_types::error::ServiceError;
use switchboard_types::news::Article;

use crate::http::{json_body, status_error, transport_error};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    source: RawSource,
    #[serde(default)]
    published_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSource {
    #[serde(default)]
    name: Option<String>,
}

impl RawArticle {
    /// Hits without a title or link are useless in a reply and are dropped.
    fn into_article(self) -> Option<Article> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        let url = self.url.filter(|u| !u.trim().is_empty())?;
        let published = self
            .published_at
            .map(|p| p.chars().take(10).collect())
            .unwrap_or_default();
        Some(Article {
            title,
            url,
            source: self.source.name.unwrap_or_else(|| "unknown".to_string()),
            published,
        })
    }
}

/// NewsAPI client. Does NOT derive Debug: holds the API key.
pub struct NewsApiClient {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    endpoint: String,
    page_size: u32,
    language: String,
}

impl NewsApiClient {
    pub fn new(client: reqwest::Client, api_key: Option<SecretString>, config: &NewsConfig) -> Self {
        Self {
            client,
            api_key,
            endpoint: config.endpoint.clone(),
            page_size: config.page_size,
            language: config.language.clone(),
        }
    }

    /// Override the search endpoint (tests, proxies).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn query_params(&self, query: &str, key: &str) -> [(&'static str, String); 5] {
        [
            ("q", query.to_string()),
            ("apiKey", key.to_string()),
            ("pageSize", self.page_size.to_string()),
            ("sortBy", "publishedAt".to_string()),
            ("language", self.language.clone()),
        ]
    }
}

fn parse_articles(response: SearchResponse) -> Vec<Article> {
    response
        .articles
        .into_iter()
        .filter_map(RawArticle::into_article)
        .collect()
}

impl NewsSource for NewsApiClient {
    #[tracing::instrument(skip_all, fields(query = %query))]
    async fn search(&self, query: &str) -> Result<Vec<Article>, ServiceError> {
        let key = self
            .api_key
            .as_ref()
            .ok_or(ServiceError::NotConfigured(NEWSAPI))?;

        let response = self
            .client
            .get(&self.endpoint)
            .query(&self.query_params(query, key.expose_secret()))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body: SearchResponse = json_body(response).await?;
        let articles = parse_articles(body);
        tracing::debug!(count = articles.len(), "news search finished");
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    const FIXTURE: &str = r#"{
        "status": "ok",
        "totalResults": 3,
        "articles": [
            {
                "source": {"id": "the-verge", "name": "The Verge"},
                "author": "Someone",
                "title": "New chip announced",
                "url": "https://example.com/chip",
                "publishedAt": "2024-05-01T10:00:00Z"
            },
            {
                "source": {"id": null, "name": "Wired"},
                "title": "[Removed]",
                "url": "https://example.com/removed",
                "publishedAt": "2024-04-30T08:30:00Z"
            },
            {
                "source": {"id": null, "name": "Nowhere"},
                "title": null,
                "url": "https://example.com/untitled",
                "publishedAt": "2024-04-29T08:30:00Z"
            }
        ]
    }"#;

    fn client(key: Option<&str>) -> NewsApiClient {
        let http = crate::http::build_client(Duration::from_secs(2)).unwrap();
        NewsApiClient::new(http, key.map(SecretString::from), &NewsConfig::default())
    }

    #[test]
    fn test_parse_articles_fixture() {
        let response: SearchResponse = serde_json::from_str(FIXTURE).unwrap();
        let articles = parse_articles(response);

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "New chip announced");
        assert_eq!(articles[0].source, "The Verge");
        assert_eq!(articles[0].published, "2024-05-01");
        assert_eq!(articles[1].source, "Wired");
    }

    #[test]
    fn test_missing_articles_field_is_empty() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"status":"ok","totalResults":0}"#).unwrap();
        assert!(parse_articles(response).is_empty());
    }

    #[test]
    fn test_query_params() {
        let client = client(Some("k"));
        let params = client.query_params("AI chips", "k");
        assert_eq!(params[0], ("q", "AI chips".to_string()));
        assert_eq!(params[2], ("pageSize", "3".to_string()));
        assert_eq!(params[3], ("sortBy", "publishedAt".to_string()));
        assert_eq!(params[4], ("language", "en".to_string()));
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let err = client(None).search("anything").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotConfigured(NEWSAPI)));
    }
}
