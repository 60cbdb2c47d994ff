//! Configuration module

use crate::error::{Error, Result};
use crate::tools::docs::registry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default search provider endpoint
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://google.serper.dev/search";

/// Environment variable holding the search provider credential
pub const DEFAULT_API_KEY_ENV: &str = "SERPER_API_KEY";

/// User-Agent sent with every page fetch
pub const DEFAULT_USER_AGENT: &str = "docs-app/1.0";

/// Valid transport modes
pub const TRANSPORT_MODES: [&str; 3] = ["stdio", "http", "sse"];

/// Valid log levels
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Upper bound for `fetch.max_redirects`
pub const MAX_REDIRECTS: usize = 20;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Search provider configuration
    pub search: SearchConfig,

    /// Page fetch configuration
    pub fetch: FetchConfig,

    /// Supported libraries: identifier -> documentation host and path prefix
    pub libraries: BTreeMap<String, String>,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server name
    pub name: String,

    /// Server version
    pub version: String,

    /// Server description
    pub description: Option<String>,

    /// Host address (http/sse modes)
    pub host: String,

    /// Port (http/sse modes)
    pub port: u16,

    /// Transport mode: stdio, http or sse
    pub transport_mode: String,
}

/// Search provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search endpoint URL
    pub endpoint: String,

    /// API key; takes precedence over the environment variable
    pub api_key: Option<String>,

    /// Environment variable the API key is read from at search time
    pub api_key_env: String,

    /// Number of results requested per search
    pub num_results: u32,

    /// Search timeout (seconds)
    pub timeout_secs: u64,
}

/// What a non-timeout fetch failure does to the rest of the invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchErrorPolicy {
    /// Propagate the error and abort the whole invocation
    #[default]
    Abort,
    /// Contribute the timeout sentinel and continue with the next page
    Sentinel,
}

/// Page fetch configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// User-Agent header
    pub user_agent: String,

    /// Per-page timeout (seconds)
    pub timeout_secs: u64,

    /// Handling of non-timeout fetch failures
    pub on_error: FetchErrorPolicy,

    /// Redirects followed per page; 0 returns the redirect response itself
    pub max_redirects: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,

    /// Log file path
    pub file_path: Option<String>,

    /// Enable console (stderr) logging
    pub enable_console: bool,

    /// Enable file logging
    pub enable_file: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            search: SearchConfig::default(),
            fetch: FetchConfig::default(),
            libraries: registry::default_entries(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: crate::NAME.to_string(),
            version: crate::VERSION.to_string(),
            description: Some(
                "Searches library documentation sites and returns page text".to_string(),
            ),
            host: "127.0.0.1".to_string(),
            port: 8080,
            transport_mode: "stdio".to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            num_results: 2,
            timeout_secs: 60,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            on_error: FetchErrorPolicy::Abort,
            max_redirects: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: Some("./logs/docs-search.log".to_string()),
            enable_console: true,
            enable_file: false,
        }
    }
}

/// Load variables from a `.env` file into the process environment
///
/// With no path, `.env` is looked up from the current directory upwards.
/// Variables already set in the environment keep their value. A missing
/// file is not an error and yields `None`.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>> {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };

    match loaded {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(Error::Config(format!("Failed to load .env file: {e}"))),
    }
}

impl SearchConfig {
    /// Resolve the API key: explicit value first, then the environment
    ///
    /// Called on every search so a missing key fails the invocation, not startup.
    pub fn resolve_api_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::MissingApiKey(self.api_key_env.clone()))
    }

    /// Whether a non-empty key is currently available
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.resolve_api_key().is_ok()
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

        let config: Self = toml::from_str(&content)?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, directory creation or the write fails
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| Error::Config(format!("Failed to create directory: {e}")))?;
            }
        }

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            return Err(Error::Config("Server host cannot be empty".to_string()));
        }

        if self.server.port == 0 {
            return Err(Error::Config("Server port cannot be 0".to_string()));
        }

        if !TRANSPORT_MODES.contains(&self.server.transport_mode.as_str()) {
            return Err(Error::Config(format!(
                "Invalid transport mode: {}, valid values: {:?}",
                self.server.transport_mode, TRANSPORT_MODES
            )));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(Error::Config(format!(
                "Invalid log level: {}, valid values: {:?}",
                self.logging.level, LOG_LEVELS
            )));
        }

        let endpoint = url::Url::parse(&self.search.endpoint)
            .map_err(|e| Error::Config(format!("Invalid search endpoint: {e}")))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "Search endpoint must be http or https: {}",
                self.search.endpoint
            )));
        }

        if self.search.api_key_env.is_empty() {
            return Err(Error::Config("API key variable name cannot be empty".to_string()));
        }

        if self.search.num_results == 0 || self.search.num_results > 100 {
            return Err(Error::Config(format!(
                "Search result count must be between 1 and 100, got {}",
                self.search.num_results
            )));
        }

        if self.search.timeout_secs == 0 || self.fetch.timeout_secs == 0 {
            return Err(Error::Config("Timeouts cannot be 0".to_string()));
        }

        if self.fetch.max_redirects > MAX_REDIRECTS {
            return Err(Error::Config(format!(
                "Redirect limit must be at most {MAX_REDIRECTS}, got {}",
                self.fetch.max_redirects
            )));
        }

        if self.fetch.user_agent.trim().is_empty() {
            return Err(Error::Config("User-Agent cannot be empty".to_string()));
        }

        if self.libraries.is_empty() {
            return Err(Error::Config("At least one library must be configured".to_string()));
        }

        for (name, scope) in &self.libraries {
            if name.trim().is_empty() {
                return Err(Error::Config("Library name cannot be empty".to_string()));
            }
            if scope.trim().is_empty() || scope.contains(char::is_whitespace) {
                return Err(Error::Config(format!(
                    "Invalid site scope for library {name}: {scope:?}"
                )));
            }
        }

        Ok(())
    }

    /// Load configuration from `DOCS_SEARCH_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable has an invalid format or validation fails
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(name) = std::env::var("DOCS_SEARCH_NAME") {
            config.server.name = name;
        }

        if let Ok(host) = std::env::var("DOCS_SEARCH_HOST") {
            config.server.host = host;
        }

        if let Ok(port) = std::env::var("DOCS_SEARCH_PORT") {
            config.server.port = port
                .parse()
                .map_err(|e| Error::Config(format!("Invalid port: {e}")))?;
        }

        if let Ok(mode) = std::env::var("DOCS_SEARCH_TRANSPORT_MODE") {
            config.server.transport_mode = mode;
        }

        if let Ok(level) = std::env::var("DOCS_SEARCH_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(endpoint) = std::env::var("DOCS_SEARCH_ENDPOINT") {
            config.search.endpoint = endpoint;
        }

        config.validate()?;
        Ok(config)
    }

    /// Merge configurations; environment values win over file values
    ///
    /// Only environment values that differ from the defaults are applied.
    #[must_use]
    pub fn merge(file_config: Option<Self>, env_config: Option<Self>) -> Self {
        let mut config = file_config.unwrap_or_default();

        if let Some(env) = env_config {
            let defaults = Self::default();

            if env.server.name != defaults.server.name {
                config.server.name = env.server.name;
            }
            if env.server.host != defaults.server.host {
                config.server.host = env.server.host;
            }
            if env.server.port != defaults.server.port {
                config.server.port = env.server.port;
            }
            if env.server.transport_mode != defaults.server.transport_mode {
                config.server.transport_mode = env.server.transport_mode;
            }
            if env.search.endpoint != defaults.search.endpoint {
                config.search.endpoint = env.search.endpoint;
            }
            if env.logging.level != defaults.logging.level {
                config.logging.level = env.logging.level;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [search]
            num_results = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.search.num_results, 5);
        assert_eq!(config.search.endpoint, DEFAULT_SEARCH_ENDPOINT);
        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.libraries.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fetch_error_policy_serde() {
        let config: AppConfig = toml::from_str(
            r#"
            [fetch]
            on_error = "sentinel"
            "#,
        )
        .unwrap();
        assert_eq!(config.fetch.on_error, FetchErrorPolicy::Sentinel);

        let rendered = toml::to_string(&AppConfig::default()).unwrap();
        assert!(rendered.contains("on_error = \"abort\""));
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let search = SearchConfig {
            api_key: Some("from-config".to_string()),
            api_key_env: "DOCS_SEARCH_TEST_UNSET_KEY".to_string(),
            ..SearchConfig::default()
        };
        assert_eq!(search.resolve_api_key().unwrap(), "from-config");
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let search = SearchConfig {
            api_key: Some("   ".to_string()),
            api_key_env: "DOCS_SEARCH_TEST_UNSET_KEY".to_string(),
            ..SearchConfig::default()
        };
        assert!(matches!(
            search.resolve_api_key(),
            Err(Error::MissingApiKey(ref var)) if var == "DOCS_SEARCH_TEST_UNSET_KEY"
        ));
    }

    #[test]
    fn test_redirect_limit() {
        let mut config = AppConfig::default();
        assert_eq!(config.fetch.max_redirects, 0);
        config.fetch.max_redirects = MAX_REDIRECTS;
        assert!(config.validate().is_ok());
        config.fetch.max_redirects = MAX_REDIRECTS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_env_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_env_file(Some(&dir.path().join(".env"))).unwrap();
        assert_eq!(loaded, None);
    }

    #[test]
    fn test_invalid_site_scope() {
        let mut config = AppConfig::default();
        config
            .libraries
            .insert("tokio".to_string(), "docs.rs/tokio latest".to_string());
        assert!(config.validate().is_err());
    }
}
