//! Documentation query tool
#![allow(missing_docs)]

use crate::tools::docs::DocService;
use crate::tools::Tool;
use async_trait::async_trait;
use rust_mcp_sdk::macros;
use rust_mcp_sdk::schema::{CallToolError, CallToolResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Documentation query tool parameters
#[macros::mcp_tool(
    name = "get_docs",
    title = "Get Docs",
    description = "Search the latest docs for a given query and library. Supports langchain, openai, and llama-index. Returns the text of the matching documentation pages.",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = true,
    read_only_hint = true,
    execution(task_support = "optional"),
    icons = [
        (src = "https://serper.dev/favicon.ico", mime_type = "image/x-icon", sizes = ["32x32"], theme = "light"),
        (src = "https://serper.dev/favicon.ico", mime_type = "image/x-icon", sizes = ["32x32"], theme = "dark")
    ]
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetDocsTool {
    /// Search query
    #[json_schema(
        title = "Query",
        description = "The query to search for (e.g. \"Chroma DB\")"
    )]
    pub query: String,

    /// Library to search in
    #[json_schema(
        title = "Library",
        description = "The library to search in (e.g. \"langchain\")"
    )]
    pub library: String,
}

/// Documentation query tool implementation
pub struct GetDocsToolImpl {
    service: Arc<DocService>,
}

impl GetDocsToolImpl {
    /// Create a new tool instance
    #[must_use]
    pub fn new(service: Arc<DocService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for GetDocsToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        GetDocsTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let params: GetDocsTool = serde_json::from_value(arguments).map_err(|e| {
            CallToolError::invalid_arguments("get_docs", Some(format!("Invalid arguments: {e}")))
        })?;

        let outcome = self
            .service
            .get_docs(&params.query, &params.library)
            .await
            .map_err(|e| {
                tracing::warn!("get_docs failed for library {}: {e}", params.library);
                CallToolError::from_message(e.to_string())
            })?;

        Ok(CallToolResult::text_content(vec![outcome.render().into()]))
    }
}
