//! marc-mcp server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use marc_client::{Archive, FetchClient, FetchConfig};
use marc_core::{AppConfig, CacheDb, spawn_cleanup};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let cache = CacheDb::open_with_ttl(&config.db_path, config.ttl()).await?;

    if let Some(every) = config.cleanup_interval() {
        spawn_cleanup(cache.clone(), every);
    }

    tracing::info!(
        db_path = %config.db_path.display(),
        base_url = %config.base_url,
        ttl_secs = cache.ttl().as_secs(),
        "Starting marc-mcp server on stdio transport"
    );

    let fetcher = FetchClient::new(FetchConfig::from_app(&config)?)?;
    let handler = handler::MarcServer::new(Archive::new(fetcher, cache));

    let server = serve_server(handler, stdio()).await?;
    server.waiting().await?;

    Ok(())
}
