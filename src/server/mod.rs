//! Server module
//!
//! MCP server state and metadata, plus the transports it runs on.

pub mod handler;
pub mod transport;

use crate::config::AppConfig;
use crate::error::Result;
use crate::tools::docs::DocService;
use crate::tools::ToolRegistry;
use rust_mcp_sdk::schema::{
    Implementation, InitializeResult, ProtocolVersion, ServerCapabilities,
    ServerCapabilitiesTools,
};
use std::sync::Arc;

/// MCP server
#[derive(Clone)]
pub struct DocsSearchServer {
    config: Arc<AppConfig>,
    tool_registry: Arc<ToolRegistry>,
}

impl DocsSearchServer {
    /// Create a server backed by the Serper client and the HTTP fetcher
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let doc_service = Arc::new(DocService::from_config(&config));
        Ok(Self::with_service(config, &doc_service))
    }

    /// Create a server around an existing document service
    #[must_use]
    pub fn with_service(config: AppConfig, doc_service: &Arc<DocService>) -> Self {
        let tool_registry = Arc::new(crate::tools::create_default_registry(doc_service, &config));
        Self {
            config: Arc::new(config),
            tool_registry,
        }
    }

    /// Get server configuration
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get tool registry
    #[must_use]
    pub fn tool_registry(&self) -> &Arc<ToolRegistry> {
        &self.tool_registry
    }

    /// Get server info
    #[must_use]
    pub fn server_info(&self) -> InitializeResult {
        let server = &self.config.server;
        let libraries = self
            .config
            .libraries
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        InitializeResult {
            server_info: Implementation {
                name: server.name.clone(),
                version: server.version.clone(),
                title: Some("Docs Search MCP Server".to_string()),
                description: server.description.clone(),
                icons: vec![],
                website_url: None,
            },
            capabilities: ServerCapabilities {
                tools: Some(ServerCapabilitiesTools { list_changed: None }),
                resources: None,
                prompts: None,
                experimental: None,
                completions: None,
                logging: None,
                tasks: None,
            },
            protocol_version: ProtocolVersion::V2025_11_25.into(),
            instructions: Some(format!(
                "Use get_docs to search library documentation and read the matching pages. Supported libraries: {libraries}."
            )),
            meta: None,
        }
    }
}
