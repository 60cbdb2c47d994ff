//! MCP tools module
//!
//! Provides the documentation search tools exposed by the server.

pub mod docs;
pub mod dummy;
pub mod health;

use crate::config::AppConfig;
use async_trait::async_trait;
use rust_mcp_sdk::schema::{CallToolError, CallToolResult, Tool as McpTool};
use std::sync::Arc;

/// Tool trait
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get tool definition
    fn definition(&self) -> McpTool;

    /// Execute tool
    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError>;
}

/// Tool registry
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new tool registry
    #[must_use]
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register tool
    #[must_use]
    pub fn register<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.push(Box::new(tool));
        self
    }

    /// Get all tool definitions
    #[must_use]
    pub fn get_tools(&self) -> Vec<McpTool> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Names of registered tools, in registration order
    #[must_use]
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.definition().name).collect()
    }

    /// Execute tool by name
    pub async fn execute_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let Some(tool) = self.tools.iter().find(|t| t.definition().name == name) else {
            tracing::warn!("Unknown tool requested: {name}");
            return Err(CallToolError::unknown_tool(name.to_string()));
        };

        tracing::debug!("Executing tool: {name}");
        tool.execute(arguments).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create default tool registry
#[must_use]
pub fn create_default_registry(service: &Arc<docs::DocService>, config: &AppConfig) -> ToolRegistry {
    ToolRegistry::new()
        .register(dummy::DummyToolImpl::new())
        .register(docs::get_docs::GetDocsToolImpl::new(service.clone()))
        .register(health::HealthCheckToolImpl::new(
            config.search.clone(),
            service.registry().clone(),
        ))
}
