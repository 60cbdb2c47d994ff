//! Error handling module

use thiserror::Error;

/// Application error type
#[derive(Error, Debug)]
pub enum Error {
    /// Initialization error
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Search provider credential is missing
    #[error("Error: {0} is not set in the environment variables.")]
    MissingApiKey(String),

    /// Requested library is not in the registry
    #[error("Library {0} not supported by this tool")]
    UnsupportedLibrary(String),

    /// Search provider request failed (anything but a timeout)
    #[error("Search request failed: {0}")]
    Search(String),

    /// Page fetch failed (anything but a timeout)
    #[error("Fetch failed for {url}: {message}")]
    Fetch {
        /// Page that could not be fetched
        url: String,
        /// Underlying failure
        message: String,
    },

    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    HttpRequest(String),

    /// MCP protocol error
    #[error("MCP protocol error: {0}")]
    Mcp(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parse error
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Other error
    #[error("Unknown error: {0}")]
    Other(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<Box<dyn std::error::Error + Send + Sync>> for Error {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(format!("Failed to parse config file: {err}"))
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(format!("Failed to serialize config: {err}"))
    }
}
