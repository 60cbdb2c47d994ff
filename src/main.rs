//! Docs Search MCP server binary

use clap::{Parser, Subcommand};
use docs_search::config::{self, AppConfig};
use docs_search::server::transport::{self, TransportMode};
use docs_search::DocsSearchServer;
use rust_mcp_sdk::schema::{CallToolResult, ContentBlock};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "docs-search")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MCP server that searches library documentation sites", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Environment file loaded before anything else (default: nearest `.env`)
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Serve {
        /// Transport mode [stdio, http, sse]
        #[arg(short, long)]
        mode: Option<String>,

        /// Listen host (http/sse)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (http/sse)
        #[arg(short, long)]
        port: Option<u16>,

        /// Search API key (defaults to the SERPER_API_KEY environment variable)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Generate a config file
    Config {
        /// Output file path
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Run a tool once and print its result
    Test {
        /// Tool to run [get_docs, dummy_tool, health_check]
        #[arg(short, long, default_value = "get_docs")]
        tool: String,

        /// Search query (get_docs)
        #[arg(long)]
        query: Option<String>,

        /// Library to search (get_docs)
        #[arg(long)]
        library: Option<String>,
    },

    /// Check credential and upstream reachability
    Health {
        /// Check type [all, internal, external, search, docs]
        #[arg(short = 't', long, default_value = "all")]
        check_type: String,

        /// Show every check
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Variables already in the environment take precedence over the file
    config::load_env_file(cli.env_file.as_deref())?;

    match cli.command {
        Commands::Serve {
            mode,
            host,
            port,
            api_key,
        } => {
            let mut config = load_config(&cli.config)?;
            if let Some(m) = mode {
                config.server.transport_mode = m;
            }
            if let Some(h) = host {
                config.server.host = h;
            }
            if let Some(p) = port {
                config.server.port = p;
            }
            if api_key.is_some() {
                config.search.api_key = api_key;
            }
            serve_command(config, cli.debug).await?;
        }
        Commands::Config { output, force } => {
            config_command(&output, force)?;
        }
        Commands::Test {
            tool,
            query,
            library,
        } => {
            let config = load_config(&cli.config)?;
            init_logging(&config, cli.debug)?;
            test_command(config, &tool, query.as_deref(), library.as_deref()).await?;
        }
        Commands::Health {
            check_type,
            verbose,
        } => {
            let config = load_config(&cli.config)?;
            init_logging(&config, cli.debug)?;
            health_command(config, &check_type, verbose).await?;
        }
        Commands::Version => {
            version_command();
        }
    }

    Ok(())
}

/// Load the config file if present, then apply `DOCS_SEARCH_*` overrides
fn load_config(config_path: &Path) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let file_config = if config_path.exists() {
        Some(
            AppConfig::from_file(config_path)
                .map_err(|e| format!("Failed to load config file: {e}"))?,
        )
    } else {
        None
    };

    let env_config = AppConfig::from_env().map_err(|e| format!("Invalid environment: {e}"))?;

    Ok(AppConfig::merge(file_config, Some(env_config)))
}

fn init_logging(config: &AppConfig, debug: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut logging = config.logging.clone();
    if debug {
        logging.level = "debug".to_string();
    }
    docs_search::init_logging_with_config(&logging)
        .map_err(|e| format!("Failed to initialize logging: {e}"))?;
    Ok(())
}

/// Start server command
async fn serve_command(config: AppConfig, debug: bool) -> Result<(), Box<dyn std::error::Error>> {
    config
        .validate()
        .map_err(|e| format!("Config validation failed: {e}"))?;

    init_logging(&config, debug)?;

    tracing::info!("Starting Docs Search MCP server v{}", env!("CARGO_PKG_VERSION"));
    if !config.search.has_api_key() {
        // Not fatal here; each get_docs call reports it
        tracing::warn!("{} is not set; get_docs will fail until it is", config.search.api_key_env);
    }

    let mode: TransportMode = config.server.transport_mode.parse()?;
    let server = DocsSearchServer::new(config).map_err(|e| format!("Failed to create server: {e}"))?;

    tracing::info!("Using {mode} transport");
    transport::run_server_with_mode(&server, mode)
        .await
        .map_err(|e| format!("{mode} server failed: {e}"))?;

    Ok(())
}

/// Generate config file command
fn config_command(output: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if output.exists() && !force {
        return Err(format!(
            "Config file already exists: {}, use --force to overwrite",
            output.display()
        )
        .into());
    }

    AppConfig::default()
        .save_to_file(output)
        .map_err(|e| format!("Failed to save config file: {e}"))?;

    println!("Config file generated: {}", output.display());
    Ok(())
}

/// Run one tool command
async fn test_command(
    config: AppConfig,
    tool: &str,
    query: Option<&str>,
    library: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let arguments = match tool {
        "get_docs" => {
            let (Some(query), Some(library)) = (query, library) else {
                return Err("get_docs requires --query and --library".into());
            };
            serde_json::json!({ "query": query, "library": library })
        }
        "dummy_tool" => serde_json::json!({}),
        "health_check" => serde_json::json!({ "check_type": "all", "verbose": true }),
        _ => return Err(format!("Unknown tool: {tool}").into()),
    };

    let server = DocsSearchServer::new(config).map_err(|e| format!("Failed to create server: {e}"))?;
    let result = server
        .tool_registry()
        .execute_tool(tool, arguments)
        .await
        .map_err(|e| format!("Tool {tool} failed: {e}"))?;

    print_tool_result(&result);
    Ok(())
}

/// Health check command
async fn health_command(
    config: AppConfig,
    check_type: &str,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let server = DocsSearchServer::new(config).map_err(|e| format!("Failed to create server: {e}"))?;
    let result = server
        .tool_registry()
        .execute_tool(
            "health_check",
            serde_json::json!({ "check_type": check_type, "verbose": verbose }),
        )
        .await
        .map_err(|e| format!("Health check failed: {e}"))?;

    print_tool_result(&result);
    Ok(())
}

fn print_tool_result(result: &CallToolResult) {
    for content in &result.content {
        match content {
            ContentBlock::TextContent(text_content) => println!("{}", text_content.text),
            other => println!("Non-text content: {other:?}"),
        }
    }
}

/// Version command
fn version_command() {
    println!("Docs Search MCP server v{}", env!("CARGO_PKG_VERSION"));
    println!("Build time: {}", env!("BUILD_TIMESTAMP"));
    println!("Git commit: {}", env!("GIT_COMMIT"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_api_key_flag_is_not_read_from_environment() {
        // The key stays with `search.api_key_env`, resolved at search time
        temp_env::with_var("SERPER_API_KEY", Some("exported"), || {
            let cli = Cli::try_parse_from(["docs-search", "serve"]).unwrap();
            match cli.command {
                Commands::Serve { api_key, .. } => assert_eq!(api_key, None),
                _ => panic!("expected serve"),
            }
        });
    }

    #[test]
    fn test_env_file_flag() {
        let cli =
            Cli::try_parse_from(["docs-search", "version", "--env-file", "/tmp/docs.env"]).unwrap();
        assert_eq!(cli.env_file, Some(PathBuf::from("/tmp/docs.env")));

        let cli = Cli::try_parse_from(["docs-search", "version"]).unwrap();
        assert_eq!(cli.env_file, None);
    }
}
