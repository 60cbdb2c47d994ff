//! Documentation search tools module

pub mod fetch;
pub mod get_docs;
pub mod registry;
pub mod search;
pub mod text;

use crate::config::AppConfig;
use crate::error::Result;
use fetch::{HttpPageFetcher, PageFetcher, PageText};
use registry::LibraryRegistry;
use search::{SearchProvider, SerperClient};
use std::fmt;
use std::sync::Arc;

/// Text returned when the search produced no links
pub const NO_RESULTS_SENTINEL: &str = "No results found";

/// Outcome of a documentation query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocsOutcome {
    /// Pages in search result order
    Found(Vec<PageText>),
    /// Search returned nothing or timed out
    NotFound,
}

impl DocsOutcome {
    /// Flatten to the tool's plain-text result
    ///
    /// Page texts are concatenated in order with no separator.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            DocsOutcome::Found(pages) => pages.iter().map(PageText::as_str).collect(),
            DocsOutcome::NotFound => NO_RESULTS_SENTINEL.to_string(),
        }
    }
}

impl fmt::Display for DocsOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Document service: registry lookup, search, then sequential page fetches
pub struct DocService {
    registry: LibraryRegistry,
    searcher: Arc<dyn SearchProvider>,
    fetcher: Arc<dyn PageFetcher>,
}

impl DocService {
    /// Create a new document service
    pub fn new(
        registry: LibraryRegistry,
        searcher: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Self {
        Self {
            registry,
            searcher,
            fetcher,
        }
    }

    /// Create a service backed by the Serper client and the HTTP fetcher
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            LibraryRegistry::new(config.libraries.clone()),
            Arc::new(SerperClient::new(config.search.clone())),
            Arc::new(HttpPageFetcher::new(config.fetch.clone())),
        )
    }

    /// Get library registry
    #[must_use]
    pub fn registry(&self) -> &LibraryRegistry {
        &self.registry
    }

    /// Search a library's documentation and return the text of the result pages
    ///
    /// The library is checked before any network call. Pages are fetched one
    /// at a time in the order the search returned them.
    ///
    /// # Errors
    ///
    /// Unsupported library, missing credential, search failure other than a
    /// timeout, or a fetch failure the fetcher chose to propagate.
    pub async fn get_docs(&self, query: &str, library: &str) -> Result<DocsOutcome> {
        let scoped_query = self.registry.scoped_query(library, query)?;

        let results = self.searcher.search(&scoped_query).await?.into_results();
        if results.is_empty() {
            return Ok(DocsOutcome::NotFound);
        }

        let mut pages = Vec::with_capacity(results.len());
        for result in &results {
            pages.push(self.fetcher.fetch(&result.link).await?);
        }

        tracing::debug!(
            "Fetched {}/{} pages for library {library}",
            pages.iter().filter(|p| p.is_text()).count(),
            pages.len()
        );

        Ok(DocsOutcome::Found(pages))
    }
}

impl Default for DocService {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Re-export tool
pub use get_docs::GetDocsTool;
