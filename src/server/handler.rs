//! MCP handler implementation

use crate::server::DocsSearchServer;
use async_trait::async_trait;
use rust_mcp_sdk::{
    mcp_server::ServerHandler,
    schema::{
        CallToolError, CallToolRequestParams, CallToolResult, ListToolsResult,
        PaginatedRequestParams, RpcError,
    },
    McpServer,
};
use std::sync::Arc;

/// MCP server handler
pub struct DocsSearchHandler {
    server: Arc<DocsSearchServer>,
}

impl DocsSearchHandler {
    /// Create a new handler
    #[must_use]
    pub fn new(server: Arc<DocsSearchServer>) -> Self {
        Self { server }
    }
}

#[async_trait]
impl ServerHandler for DocsSearchHandler {
    async fn handle_list_tools_request(
        &self,
        _request: Option<PaginatedRequestParams>,
        _runtime: Arc<dyn McpServer>,
    ) -> std::result::Result<ListToolsResult, RpcError> {
        Ok(ListToolsResult {
            tools: self.server.tool_registry().get_tools(),
            meta: None,
            next_cursor: None,
        })
    }

    async fn handle_call_tool_request(
        &self,
        params: CallToolRequestParams,
        _runtime: Arc<dyn McpServer>,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        // Argument-less calls are treated as an empty object
        let arguments = params
            .arguments
            .map_or_else(|| serde_json::Value::Object(serde_json::Map::new()), serde_json::Value::Object);

        self.server
            .tool_registry()
            .execute_tool(&params.name, arguments)
            .await
    }
}
