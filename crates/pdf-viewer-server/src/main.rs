//! PDF viewer server
//!
//! Serves a landing route and a `show_pdf` route that downloads one remote
//! PDF on first visit and serves the cached copy afterwards.

mod error;
mod server;
mod types;
mod viewer;

use crate::error::{Result, ServerError};
use crate::server::{start_server, ServerState, SharedState};
use crate::types::{ServerConfig, DEFAULT_DOCUMENT_URL};
use pdf_cache::{CacheConfig, DocumentCache};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env()
        .add_directive("pdf_viewer_server=info".parse()?)
        .add_directive("pdf_cache=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting PDF viewer server...");

    let config = load_config()?;
    info!("Port: {}", config.port);
    info!("Cache dir: {:?}", config.cache.cache_dir());
    info!("Document: {}", config.document_url);
    if let Some(timeout) = config.cache.timeout {
        info!("Fetch timeout: {} seconds", timeout.as_secs());
    }

    let cache = DocumentCache::new(config.cache)?;
    cache.init().await?;

    let state: SharedState = Arc::new(ServerState::new(cache, config.document_url));

    // Start HTTP server (blocking)
    start_server(state, config.port).await?;

    Ok(())
}

fn load_config() -> Result<ServerConfig> {
    let port = match std::env::var("PORT") {
        Ok(s) => s
            .parse::<u16>()
            .map_err(|_| ServerError::Config(format!("invalid PORT: {}", s)))?,
        Err(_) => 3005,
    };

    let document_url = std::env::var("DOCUMENT_URL")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_DOCUMENT_URL.to_string());

    Ok(ServerConfig {
        port,
        cache: CacheConfig::from_env(),
        document_url,
    })
}
