// Stock analysis MCP server binary

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use stockmcp_mcp::tools::stock_tools;
use stockmcp_mcp::{McpServer, ResourceRegistry, ServerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stockmcp")]
#[command(about = "MCP server for stock prices, history and metrics", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "STOCKMCP_CONFIG", default_value = "stockmcp.toml")]
    config: PathBuf,

    /// Log filter, overrides the config file (RUST_LOG takes precedence)
    #[arg(long, env = "STOCKMCP_LOG_LEVEL")]
    log_level: Option<String>,

    /// Market data API base URL, overrides the config file
    #[arg(long, env = "STOCKMCP_PROVIDER_URL")]
    provider_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::load(&args.config)?;
    config.apply_overrides(args.provider_url, args.log_level);

    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();

    tracing::info!("Stock analysis MCP server starting...");
    match &config.source {
        Some(path) => tracing::info!(config = %path.display(), "Configuration loaded"),
        None => tracing::info!(
            config = %args.config.display(),
            "Configuration file not found, using defaults"
        ),
    }
    tracing::info!(provider = %config.provider.base_url, "Market data provider");

    let provider = Arc::new(config.build_provider()?);
    let tools = stock_tools(provider, config.formatter());
    tracing::info!("Registered {} tools", tools.len());

    let server = McpServer::new(tools, ResourceRegistry::with_defaults());
    server.start().await?;

    Ok(())
}
