//! Documentation page fetcher

use super::text::html_to_text;
use crate::config::{FetchConfig, FetchErrorPolicy};
use crate::error::{Error, Result};
use crate::utils::HttpClientBuilder;
use async_trait::async_trait;
use reqwest::redirect;
use std::fmt;
use std::time::Duration;

/// Text contributed by a page that timed out
pub const TIMEOUT_SENTINEL: &str = "Timeout error";

/// Text of one fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageText {
    /// Visible text of the page
    Text(String),
    /// The page did not arrive in time
    TimedOut,
    /// The page failed for another reason and the policy said to continue
    Failed(String),
}

impl PageText {
    /// Text as contributed to the concatenated result
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            PageText::Text(text) => text,
            PageText::TimedOut | PageText::Failed(_) => TIMEOUT_SENTINEL,
        }
    }

    /// Whether the page content was actually retrieved
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, PageText::Text(_))
    }
}

impl fmt::Display for PageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page fetcher
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a page and return its visible text
    async fn fetch(&self, url: &str) -> Result<PageText>;
}

/// HTTP page fetcher
pub struct HttpPageFetcher {
    config: FetchConfig,
    timeout: Duration,
}

impl HttpPageFetcher {
    /// Create a fetcher from fetch configuration
    #[must_use]
    pub fn new(config: FetchConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        Self { config, timeout }
    }

    /// Override the per-page timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn client(&self) -> Result<reqwest::Client> {
        let policy = match self.config.max_redirects {
            0 => redirect::Policy::none(),
            max => redirect::Policy::limited(max),
        };

        HttpClientBuilder::new()
            .timeout(self.timeout)
            .user_agent(self.config.user_agent.clone())
            .redirect(policy)
            .build()
    }
}

async fn fetch_html(client: &reqwest::Client, url: &str) -> reqwest::Result<String> {
    // Error pages are read like any other page
    client.get(url).send().await?.text().await
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<PageText> {
        tracing::debug!("Fetching URL: {url}");

        let client = self.client()?;

        match fetch_html(&client, url).await {
            Ok(html) => {
                tracing::debug!("Fetched URL successfully: {url}");
                Ok(PageText::Text(html_to_text(&html)))
            }
            Err(e) if e.is_timeout() => {
                tracing::error!("Timeout fetching URL: {url}");
                Ok(PageText::TimedOut)
            }
            Err(e) => match self.config.on_error {
                FetchErrorPolicy::Abort => Err(Error::Fetch {
                    url: url.to_string(),
                    message: e.to_string(),
                }),
                FetchErrorPolicy::Sentinel => {
                    tracing::error!("Failed fetching URL: {url}: {e}");
                    Ok(PageText::Failed(e.to_string()))
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_sentinel_rendering() {
        assert_eq!(PageText::Text("A".to_string()).to_string(), "A");
        assert_eq!(PageText::TimedOut.to_string(), "Timeout error");
        assert_eq!(PageText::Failed("boom".to_string()).as_str(), "Timeout error");
        assert!(!PageText::TimedOut.is_text());
    }

    #[tokio::test]
    async fn test_fetch_extracts_text_with_user_agent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/docs/chroma"))
            .and(header("user-agent", "docs-app/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<html><body><script>var x;</script><h1>Chroma</h1><p>Vector store</p></body></html>",
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = HttpPageFetcher::new(FetchConfig::default());
        let page = fetcher
            .fetch(&format!("{}/docs/chroma", mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(page, PageText::Text("Chroma\nVector store".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_reads_error_pages() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("<p>Page not found</p>"))
            .mount(&mock_server)
            .await;

        let fetcher = HttpPageFetcher::new(FetchConfig::default());
        let page = fetcher.fetch(&mock_server.uri()).await.unwrap();
        assert_eq!(page.as_str(), "Page not found");
    }

    #[tokio::test]
    async fn test_fetch_timeout_yields_sentinel() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<p>late</p>")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let fetcher =
            HttpPageFetcher::new(FetchConfig::default()).with_timeout(Duration::from_millis(200));
        let page = fetcher.fetch(&mock_server.uri()).await.unwrap();
        assert_eq!(page, PageText::TimedOut);
        assert_eq!(page.to_string(), TIMEOUT_SENTINEL);
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_by_default() {
        let fetcher = HttpPageFetcher::new(FetchConfig::default());
        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, Error::Fetch { ref url, .. } if url == "not a url"));
    }

    #[tokio::test]
    async fn test_fetch_failure_sentinel_policy() {
        let config = FetchConfig {
            on_error: FetchErrorPolicy::Sentinel,
            ..FetchConfig::default()
        };
        let fetcher = HttpPageFetcher::new(config);
        let page = fetcher.fetch("not a url").await.unwrap();
        assert!(matches!(page, PageText::Failed(_)));
        assert_eq!(page.as_str(), TIMEOUT_SENTINEL);
    }

    async fn mount_redirect(mock_server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/docs/old"))
            .respond_with(
                ResponseTemplate::new(301)
                    .insert_header("location", format!("{}/docs/new", mock_server.uri()))
                    .set_body_string("<p>Moved Permanently</p>"),
            )
            .mount(mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/docs/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>New page</p>"))
            .mount(mock_server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_does_not_follow_redirects_by_default() {
        let mock_server = MockServer::start().await;
        mount_redirect(&mock_server).await;

        let fetcher = HttpPageFetcher::new(FetchConfig::default());
        let page = fetcher
            .fetch(&format!("{}/docs/old", mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(page.as_str(), "Moved Permanently");
    }

    #[tokio::test]
    async fn test_fetch_follows_redirects_when_enabled() {
        let mock_server = MockServer::start().await;
        mount_redirect(&mock_server).await;

        let config = FetchConfig {
            max_redirects: 5,
            ..FetchConfig::default()
        };
        let fetcher = HttpPageFetcher::new(config);
        let page = fetcher
            .fetch(&format!("{}/docs/old", mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(page.as_str(), "New page");
    }
}
