//! Roulette MCP Server
//!
//! This MCP server lets AI agents run raffle draws against the Roulette API.
//! It reads the API location from ROULETTE_API_URL and exposes tools for:
//! - Viewing and replacing the participant pool
//! - Spinning for a winner
//! - Reviewing and clearing the winner history

mod client;
mod server;

use anyhow::Result;
use rmcp::ServiceExt;
use server::RouletteServer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging to stderr (stdout is used for MCP protocol)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Roulette MCP server");

    let server = RouletteServer::from_env()?;

    // Serve over stdio - pass as tuple (stdin, stdout)
    let transport = (tokio::io::stdin(), tokio::io::stdout());
    let service = server.serve(transport).await?;

    // Wait for shutdown
    service.waiting().await?;

    Ok(())
}
