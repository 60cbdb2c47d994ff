//! Readiness probe tool
#![allow(missing_docs)]

use crate::tools::Tool;
use async_trait::async_trait;
use rust_mcp_sdk::macros;
use rust_mcp_sdk::schema::{CallToolError, CallToolResult};
use serde::{Deserialize, Serialize};

/// Fixed readiness message
pub const READY_MESSAGE: &str = "MCP Server is ready!";

/// Readiness probe tool (no parameters)
#[macros::mcp_tool(
    name = "dummy_tool",
    title = "Readiness Probe",
    description = "Returns a fixed message when the server is ready to answer tool calls.",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional"),
    icons = [
        (src = "https://img.icons8.com/color/96/000000/checked.png", mime_type = "image/png", sizes = ["96x96"], theme = "light"),
        (src = "https://img.icons8.com/color/96/000000/checked.png", mime_type = "image/png", sizes = ["96x96"], theme = "dark")
    ]
)]
#[derive(Debug, Clone, Default, Deserialize, Serialize, macros::JsonSchema)]
pub struct DummyTool {}

/// Readiness probe tool implementation
#[derive(Default)]
pub struct DummyToolImpl;

impl DummyToolImpl {
    /// Create a new readiness probe
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for DummyToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        DummyTool::tool()
    }

    async fn execute(
        &self,
        _arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        Ok(CallToolResult::text_content(vec![READY_MESSAGE.to_string().into()]))
    }
}
