//! Health check tool
#![allow(missing_docs)]

use crate::config::SearchConfig;
use crate::tools::docs::registry::LibraryRegistry;
use crate::tools::Tool;
use crate::utils::{time, HttpClientBuilder};
use async_trait::async_trait;
use rust_mcp_sdk::macros;
use rust_mcp_sdk::schema::{CallToolError, CallToolResult};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::time::{Duration, Instant};

/// Health check tool parameters
#[macros::mcp_tool(
    name = "health_check",
    title = "Health Check",
    description = "Check whether the search credential is configured and whether the search provider and documentation sites are reachable.",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional"),
    icons = [
        (src = "https://img.icons8.com/color/96/000000/heart-health.png", mime_type = "image/png", sizes = ["96x96"], theme = "light"),
        (src = "https://img.icons8.com/color/96/000000/heart-health.png", mime_type = "image/png", sizes = ["96x96"], theme = "dark")
    ]
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct HealthCheckTool {
    /// Check type
    #[json_schema(
        title = "Check type",
        description = "Checks to run: all, internal (credential), external (search provider and docs sites), search, docs",
        default = "all"
    )]
    pub check_type: Option<String>,

    /// Verbose output
    #[json_schema(
        title = "Verbose",
        description = "Return every check as JSON, including healthy ones",
        default = false
    )]
    pub verbose: Option<bool>,
}

/// Health report
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub checks: Vec<HealthCheck>,
    pub uptime: Duration,
}

/// Single check
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: String,
    pub duration_ms: u64,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl HealthCheck {
    fn healthy(name: impl Into<String>, duration_ms: u64, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: "healthy".to_string(),
            duration_ms,
            message: Some(message.into()),
            error: None,
        }
    }

    fn unhealthy(name: impl Into<String>, duration_ms: u64, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: "unhealthy".to_string(),
            duration_ms,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Health check tool implementation
pub struct HealthCheckToolImpl {
    start_time: Instant,
    search: SearchConfig,
    registry: LibraryRegistry,
    probe_timeout: Duration,
}

impl HealthCheckToolImpl {
    /// Create a new health check tool
    #[must_use]
    pub fn new(search: SearchConfig, registry: LibraryRegistry) -> Self {
        Self {
            start_time: Instant::now(),
            search,
            registry,
            probe_timeout: Duration::from_secs(5),
        }
    }

    /// Override the timeout used by reachability probes
    #[must_use]
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Check that the search credential is available
    fn check_credential(&self) -> HealthCheck {
        if self.search.has_api_key() {
            HealthCheck::healthy("credential", 0, "API key configured")
        } else {
            HealthCheck::unhealthy(
                "credential",
                0,
                format!("{} is not set", self.search.api_key_env),
            )
        }
    }

    /// GET `url`; the check passes when `accept` approves the status
    async fn probe(
        &self,
        name: &str,
        url: &str,
        accept: fn(reqwest::StatusCode) -> bool,
    ) -> HealthCheck {
        let start = Instant::now();
        let client = match HttpClientBuilder::new()
            .timeout(self.probe_timeout)
            .connect_timeout(self.probe_timeout)
            .user_agent(format!("{}/{}", crate::NAME, crate::VERSION))
            .build()
        {
            Ok(client) => client,
            Err(e) => return HealthCheck::unhealthy(name, 0, e.to_string()),
        };

        match client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if accept(status) {
                    HealthCheck::healthy(name, time::elapsed_ms(start), format!("HTTP {status}"))
                } else {
                    HealthCheck::unhealthy(
                        name,
                        time::elapsed_ms(start),
                        format!("HTTP status: {status}"),
                    )
                }
            }
            Err(e) => HealthCheck::unhealthy(
                name,
                time::elapsed_ms(start),
                format!("Request failed: {e}"),
            ),
        }
    }

    /// The search endpoint only accepts authenticated POSTs; any answer
    /// below 500 means it is up.
    async fn check_search(&self) -> HealthCheck {
        self.probe("search", &self.search.endpoint, |status| {
            !status.is_server_error()
        })
        .await
    }

    async fn check_docs_sites(&self) -> Vec<HealthCheck> {
        let mut checks = Vec::with_capacity(self.registry.len());
        for (library, scope) in self.registry.entries() {
            let check = self
                .probe(&format!("docs:{library}"), &format!("https://{scope}"), |status| {
                    status.is_success()
                })
                .await;
            checks.push(check);
        }
        checks
    }

    /// Run the requested checks
    pub async fn perform_checks(&self, check_type: &str, verbose: bool) -> HealthStatus {
        let mut checks = Vec::new();

        match check_type {
            "all" => {
                checks.push(self.check_credential());
                checks.push(self.check_search().await);
                checks.extend(self.check_docs_sites().await);
            }
            "internal" => checks.push(self.check_credential()),
            "external" => {
                checks.push(self.check_search().await);
                checks.extend(self.check_docs_sites().await);
            }
            "search" => checks.push(self.check_search().await),
            "docs" => checks.extend(self.check_docs_sites().await),
            _ => checks.push(HealthCheck {
                name: "unknown_check".to_string(),
                status: "unknown".to_string(),
                duration_ms: 0,
                message: None,
                error: Some(format!("Unknown check type: {check_type}")),
            }),
        }

        let overall_status = if checks.iter().all(|c| c.status == "healthy") {
            "healthy"
        } else if checks.iter().any(|c| c.status == "unhealthy") {
            "unhealthy"
        } else {
            "degraded"
        };

        HealthStatus {
            status: overall_status.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            checks: if verbose {
                checks
            } else {
                checks.into_iter().filter(|c| c.status != "healthy").collect()
            },
            uptime: self.start_time.elapsed(),
        }
    }
}

fn format_summary(health: &HealthStatus) -> String {
    let mut summary = format!(
        "Status: {}\nUptime: {:.2?}\nTimestamp: {}",
        health.status, health.uptime, health.timestamp
    );

    if !health.checks.is_empty() {
        summary.push_str("\n\nChecks:");
        for check in &health.checks {
            let _ = write!(
                summary,
                "\n- {}: {} ({}ms)",
                check.name, check.status, check.duration_ms
            );
            if let Some(ref msg) = check.message {
                let _ = write!(summary, " - {msg}");
            }
            if let Some(ref err) = check.error {
                let _ = write!(summary, " [error: {err}]");
            }
        }
    }

    summary
}

#[async_trait]
impl Tool for HealthCheckToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        HealthCheckTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let params: HealthCheckTool = serde_json::from_value(arguments).map_err(|e| {
            CallToolError::invalid_arguments("health_check", Some(format!("Invalid arguments: {e}")))
        })?;

        let check_type = params.check_type.unwrap_or_else(|| "all".to_string());
        let verbose = params.verbose.unwrap_or(false);

        let health = self.perform_checks(&check_type, verbose).await;

        let content = if verbose {
            serde_json::to_string_pretty(&health).map_err(|e| {
                CallToolError::from_message(format!("JSON serialization failed: {e}"))
            })?
        } else {
            format_summary(&health)
        };

        Ok(CallToolResult::text_content(vec![content.into()]))
    }
}
