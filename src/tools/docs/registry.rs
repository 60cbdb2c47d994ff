//! Library registry
//!
//! Maps a supported library identifier to the host and path prefix of its
//! documentation site. The registry is built once and never mutated.

use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Built-in libraries and their documentation site scopes
pub const DEFAULT_LIBRARIES: [(&str, &str); 3] = [
    ("langchain", "python.langchain.com/docs"),
    ("llama-index", "docs.llamaindex.ai/en/stable"),
    ("openai", "platform.openai.com/docs"),
];

/// Default registry entries as an owned map
#[must_use]
pub fn default_entries() -> BTreeMap<String, String> {
    DEFAULT_LIBRARIES
        .iter()
        .map(|(name, scope)| ((*name).to_string(), (*scope).to_string()))
        .collect()
}

/// Immutable library registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRegistry {
    entries: BTreeMap<String, String>,
}

impl LibraryRegistry {
    /// Create a registry from explicit entries
    #[must_use]
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    /// Site scope for a library, if supported
    #[must_use]
    pub fn site_scope(&self, library: &str) -> Option<&str> {
        self.entries.get(library).map(String::as_str)
    }

    /// Build the site-scoped search query for a library
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedLibrary`] if the library is not registered
    pub fn scoped_query(&self, library: &str, query: &str) -> Result<String> {
        let scope = self
            .site_scope(library)
            .ok_or_else(|| Error::UnsupportedLibrary(library.to_string()))?;
        Ok(format!("site:{scope} {query}"))
    }

    /// Supported library identifiers, sorted
    pub fn libraries(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// All entries as `(library, site scope)` pairs
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, scope)| (name.as_str(), scope.as_str()))
    }

    /// Number of supported libraries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LibraryRegistry {
    fn default() -> Self {
        Self::new(default_entries())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_entries() {
        let registry = LibraryRegistry::default();
        assert_eq!(
            registry.libraries().collect::<Vec<_>>(),
            vec!["langchain", "llama-index", "openai"]
        );
        assert_eq!(
            registry.site_scope("llama-index"),
            Some("docs.llamaindex.ai/en/stable")
        );
        assert_eq!(registry.site_scope("openai"), Some("platform.openai.com/docs"));
    }

    #[test]
    fn test_scoped_query() {
        let registry = LibraryRegistry::default();
        assert_eq!(
            registry.scoped_query("langchain", "Chroma DB").unwrap(),
            "site:python.langchain.com/docs Chroma DB"
        );
    }

    #[test]
    fn test_unknown_library() {
        let registry = LibraryRegistry::default();
        let err = registry.scoped_query("pandas", "DataFrame").unwrap_err();
        assert!(matches!(err, Error::UnsupportedLibrary(ref lib) if lib == "pandas"));
        assert_eq!(err.to_string(), "Library pandas not supported by this tool");
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = LibraryRegistry::default();
        assert!(registry.site_scope("LangChain").is_none());
    }
}
