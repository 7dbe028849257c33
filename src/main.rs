//! Medicine Order MCP Server - Rust Implementation
//!
//! A Model Context Protocol (MCP) server for medicine ordering and drug
//! interaction checking, served over HTTP (SSE) or stdio.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use medicine_order_mcp_server::config::Config;
use medicine_order_mcp_server::mcp::http;
use medicine_order_mcp_server::mcp::server::McpServer;
use medicine_order_mcp_server::pharmacy::ledger::OrderLedger;
use medicine_order_mcp_server::pharmacy::reference::ReferenceData;
use medicine_order_mcp_server::pharmacy::service::PharmacyService;

/// Medicine Order MCP Server
#[derive(Parser)]
#[command(name = "medicine-order-mcp-server")]
#[command(author, version, about = "Medicine Order MCP Server - medicine ordering and drug interaction checking")]
struct Cli {
    /// JSON file replacing the built-in medicine and interaction tables
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the MCP endpoint over HTTP (default)
    Serve {
        /// Host to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to bind
        #[arg(long)]
        port: Option<u16>,
    },
    /// Serve MCP over stdin/stdout, one JSON message per line
    Stdio,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries stdio transport frames
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::new().context("failed to load configuration")?;
    if let Some(path) = cli.data {
        config.data_path = Some(path);
    }

    let reference = ReferenceData::load(config.data_path.as_deref())
        .context("failed to load reference data")?;
    tracing::info!(
        medicines = reference.medicines.len(),
        interactions = reference.interactions.len(),
        "reference data loaded"
    );

    let service = Arc::new(PharmacyService::new(
        Arc::new(reference),
        Arc::new(OrderLedger::new()),
    ));
    let server = Arc::new(McpServer::new(service));

    match cli.command {
        Some(Commands::Stdio) => {
            server.run_stdio().await.context("stdio transport failed")?;
        }
        Some(Commands::Serve { host, port }) => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            http::serve(server, config.bind_addr()?).await?;
        }
        None => {
            http::serve(server, config.bind_addr()?).await?;
        }
    }

    Ok(())
}
