//! Search provider client
//!
//! Sends one site-scoped query to the search provider and returns the
//! organic result links. A timeout is not an error: it yields
//! [`SearchOutcome::TimedOut`], which callers treat like an empty result set.
//! Any other failure, including a non-2xx status, is returned as an error.

use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::utils::HttpClientBuilder;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One organic search result
///
/// Only the link is read; titles, snippets and the rest of the provider's
/// fields are ignored whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result URL
    pub link: String,
}

impl SearchResult {
    /// Result for a link
    #[must_use]
    pub fn from_link(link: impl Into<String>) -> Self {
        Self { link: link.into() }
    }
}

/// Outcome of a search call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Provider answered; the list may be empty
    Results(Vec<SearchResult>),
    /// Provider did not answer in time
    TimedOut,
}

impl SearchOutcome {
    /// Result list, with a timeout downgraded to no results
    #[must_use]
    pub fn into_results(self) -> Vec<SearchResult> {
        match self {
            SearchOutcome::Results(results) => results,
            SearchOutcome::TimedOut => Vec::new(),
        }
    }
}

/// Search provider
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run a search for an already site-scoped query
    async fn search(&self, query: &str) -> Result<SearchOutcome>;
}

#[derive(Debug, Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    num: u32,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SearchResult>,
}

/// Serper (google.serper.dev) search client
pub struct SerperClient {
    config: SearchConfig,
    timeout: Duration,
}

impl SerperClient {
    /// Create a client from search configuration
    #[must_use]
    pub fn new(config: SearchConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        Self { config, timeout }
    }

    /// Override the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Search configuration
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

#[async_trait]
impl SearchProvider for SerperClient {
    async fn search(&self, query: &str) -> Result<SearchOutcome> {
        tracing::debug!("Starting web search for query: {query}");

        // Checked before any network traffic
        let api_key = self.config.resolve_api_key()?;

        let client = HttpClientBuilder::new().timeout(self.timeout).build()?;

        let response = match client
            .post(&self.config.endpoint)
            .header("X-API-KEY", api_key)
            .json(&SerperRequest {
                q: query,
                num: self.config.num_results,
            })
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                tracing::warn!("Search timed out for query: {query}");
                return Ok(SearchOutcome::TimedOut);
            }
            Err(e) => return Err(Error::Search(e.to_string())),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Search(format!("HTTP {status} - {body}")));
        }

        match response.json::<SerperResponse>().await {
            Ok(body) => {
                let mut results = body.organic;
                results.truncate(self.config.num_results as usize);
                tracing::debug!("Search returned {} results", results.len());
                Ok(SearchOutcome::Results(results))
            }
            Err(e) if e.is_timeout() => {
                tracing::warn!("Search response timed out for query: {query}");
                Ok(SearchOutcome::TimedOut)
            }
            Err(e) => Err(Error::Search(format!("Invalid response body: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(endpoint: String) -> SearchConfig {
        SearchConfig {
            endpoint,
            api_key: Some("test-key".to_string()),
            ..SearchConfig::default()
        }
    }

    #[tokio::test]
    async fn test_search_sends_serper_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("X-API-KEY", "test-key"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "q": "site:python.langchain.com/docs Chroma DB",
                "num": 2
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "searchParameters": {"q": "site:python.langchain.com/docs Chroma DB"},
                "organic": [
                    {"title": "Chroma", "link": "https://python.langchain.com/docs/chroma", "position": 1},
                    {"link": "https://python.langchain.com/docs/vectorstores"}
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SerperClient::new(test_config(format!("{}/search", mock_server.uri())));
        let outcome = client
            .search("site:python.langchain.com/docs Chroma DB")
            .await
            .unwrap();

        let results = outcome.into_results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].link, "https://python.langchain.com/docs/chroma");
        assert_eq!(results[1].link, "https://python.langchain.com/docs/vectorstores");
    }

    #[tokio::test]
    async fn test_search_ignores_unexpected_field_shapes() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "organic": [
                    {
                        "link": "https://a.example/1",
                        "title": null,
                        "snippet": {"text": "structured"},
                        "position": "first",
                        "sitelinks": [{"title": "x", "link": "https://a.example/x"}]
                    },
                    {"link": "https://a.example/2", "snippet": 42, "position": 2.5}
                ]
            })))
            .mount(&mock_server)
            .await;

        let client = SerperClient::new(test_config(mock_server.uri()));
        let results = client.search("q").await.unwrap().into_results();
        assert_eq!(
            results,
            vec![
                SearchResult::from_link("https://a.example/1"),
                SearchResult::from_link("https://a.example/2"),
            ]
        );
    }

    #[tokio::test]
    async fn test_search_without_organic_field_is_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"knowledgeGraph": {}})))
            .mount(&mock_server)
            .await;

        let client = SerperClient::new(test_config(mock_server.uri()));
        let outcome = client.search("site:x y").await.unwrap();
        assert_eq!(outcome, SearchOutcome::Results(vec![]));
    }

    #[tokio::test]
    async fn test_search_truncates_to_requested_count() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "organic": [
                    {"link": "https://a.example/1"},
                    {"link": "https://a.example/2"},
                    {"link": "https://a.example/3"}
                ]
            })))
            .mount(&mock_server)
            .await;

        let client = SerperClient::new(test_config(mock_server.uri()));
        let results = client.search("q").await.unwrap().into_results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].link, "https://a.example/2");
    }

    #[tokio::test]
    async fn test_search_timeout_yields_timed_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"organic": [{"link": "https://late.example"}]}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let client = SerperClient::new(test_config(mock_server.uri()))
            .with_timeout(Duration::from_millis(200));
        let outcome = client.search("q").await.unwrap();
        assert_eq!(outcome, SearchOutcome::TimedOut);
        assert!(outcome.into_results().is_empty());
    }

    #[tokio::test]
    async fn test_search_http_error_propagates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Unauthorized."))
            .mount(&mock_server)
            .await;

        let client = SerperClient::new(test_config(mock_server.uri()));
        let err = client.search("q").await.unwrap_err();
        assert!(matches!(err, Error::Search(ref msg) if msg.contains("403")));
    }

    #[tokio::test]
    async fn test_search_malformed_json_propagates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let client = SerperClient::new(test_config(mock_server.uri()));
        assert!(matches!(client.search("q").await, Err(Error::Search(_))));
    }

    #[tokio::test]
    async fn test_missing_api_key_makes_no_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"organic": []})))
            .expect(0)
            .mount(&mock_server)
            .await;

        let config = SearchConfig {
            endpoint: mock_server.uri(),
            api_key: None,
            api_key_env: "DOCS_SEARCH_TEST_MISSING_KEY".to_string(),
            ..SearchConfig::default()
        };
        let client = SerperClient::new(config);
        let err = client.search("q").await.unwrap_err();
        assert!(matches!(err, Error::MissingApiKey(ref var) if var == "DOCS_SEARCH_TEST_MISSING_KEY"));
    }
}
