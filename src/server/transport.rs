//! Transport module
//!
//! Stdio transport, and streamable HTTP with optional SSE.

use crate::error::{Error, Result};
use crate::server::handler::DocsSearchHandler;
use crate::server::DocsSearchServer;
use rust_mcp_sdk::{
    error::McpSdkError,
    event_store,
    mcp_server::{hyper_server, server_runtime, HyperServerOptions, McpServerOptions},
    McpServer, StdioTransport, ToMcpServerHandler, TransportOptions,
};
use std::sync::Arc;

/// Run Stdio server
pub async fn run_stdio_server(server: &DocsSearchServer) -> Result<()> {
    tracing::info!("Starting Stdio MCP server...");

    let server_info = server.server_info();
    let handler = DocsSearchHandler::new(Arc::new(server.clone()));

    let transport = StdioTransport::new(TransportOptions::default())
        .map_err(|e| Error::Mcp(e.to_string()))?;

    let mcp_server: Arc<rust_mcp_sdk::mcp_server::ServerRuntime> =
        server_runtime::create_server(McpServerOptions {
            server_details: server_info,
            transport,
            handler: handler.to_mcp_server_handler(),
            task_store: None,
            client_task_store: None,
        });

    tracing::info!("Stdio MCP server started, waiting for requests...");
    mcp_server
        .start()
        .await
        .map_err(|e: McpSdkError| Error::Mcp(e.to_string()))?;

    Ok(())
}

/// Run HTTP server (streamable HTTP, optionally with SSE)
pub async fn run_http_server(server: &DocsSearchServer, sse_support: bool) -> Result<()> {
    let config = &server.config().server;
    tracing::info!(
        "Starting HTTP MCP server on {}:{} (sse: {sse_support})...",
        config.host,
        config.port
    );

    let server_info = server.server_info();
    let handler = DocsSearchHandler::new(Arc::new(server.clone()));

    let options = HyperServerOptions {
        host: config.host.clone(),
        port: config.port,
        transport_options: Arc::new(TransportOptions::default()),
        sse_support,
        event_store: Some(Arc::new(event_store::InMemoryEventStore::default())),
        task_store: None,
        client_task_store: None,
        allowed_hosts: Some(vec![
            "localhost".to_string(),
            "127.0.0.1".to_string(),
            config.host.clone(),
        ]),
        allowed_origins: Some(vec!["*".to_string()]),
        ..Default::default()
    };

    let mcp_server =
        hyper_server::create_server(server_info, handler.to_mcp_server_handler(), options);

    tracing::info!("HTTP MCP server listening on {}:{}", config.host, config.port);
    mcp_server
        .start()
        .await
        .map_err(|e: McpSdkError| Error::Mcp(e.to_string()))?;

    Ok(())
}

/// Transport mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Stdio transport (spawned by an MCP client)
    Stdio,
    /// Streamable HTTP
    Http,
    /// Streamable HTTP with Server-Sent Events
    Sse,
}

impl std::str::FromStr for TransportMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "stdio" => Ok(TransportMode::Stdio),
            "http" => Ok(TransportMode::Http),
            "sse" => Ok(TransportMode::Sse),
            _ => Err(Error::Config(format!("Unknown transport mode: {s}"))),
        }
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportMode::Stdio => write!(f, "stdio"),
            TransportMode::Http => write!(f, "http"),
            TransportMode::Sse => write!(f, "sse"),
        }
    }
}

/// Run the server with the given transport mode
pub async fn run_server_with_mode(server: &DocsSearchServer, mode: TransportMode) -> Result<()> {
    match mode {
        TransportMode::Stdio => run_stdio_server(server).await,
        TransportMode::Http => run_http_server(server, false).await,
        TransportMode::Sse => run_http_server(server, true).await,
    }
}
