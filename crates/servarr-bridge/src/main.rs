//! Servarr bridge - Main Entry Point

use anyhow::Result;
use clap::{Parser, ValueEnum};
use servarr_bridge::{http_api, mcp, AppContext};
use servarr_common::{init_logging, LoggingConfig};
use servarr_config::ConfigLoader;
use std::sync::Arc;
use tracing::info;

/// Which transport to serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    /// JSON-RPC tool protocol over stdin/stdout
    Stdio,
    /// REST API on a TCP port
    Http,
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Log level, overriding the configuration file
    #[arg(short, long)]
    log_level: Option<String>,

    /// Transport to serve
    #[arg(short, long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// HTTP port override (http transport only)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    // In stdio mode stdout carries the protocol, so logs must go to stderr
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    init_logging(LoggingConfig {
        level,
        use_stderr: args.transport == Transport::Stdio,
        ..LoggingConfig::default()
    })
    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let port = args.port.unwrap_or(config.http.port);
    let ctx = Arc::new(AppContext::from_config(config)?);

    match args.transport {
        Transport::Stdio => {
            info!("Starting stdio transport");
            mcp::run_stdio(ctx).await?;
        }
        Transport::Http => {
            info!(port, "Starting HTTP transport");
            http_api::serve(ctx, port).await?;
        }
    }

    Ok(())
}
