//! Issue tracker API server.
//!
//! Hosts an in-memory issue table and serves the edit endpoint that merges
//! concurrent edits field by field.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use field_merge_api::router::{ApiConfig, AppState, Router};
use field_merge_api::server::Server;
use field_merge_core::{Column, Database, MergeConfig, MergeStrategy, PatchConfig};
use tokio::signal;

/// Command-line arguments for the merge server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Merge strategy: "equality" or "patch"
    #[arg(long, default_value_t = MergeStrategy::Equality)]
    strategy: MergeStrategy,

    /// Patch match threshold (0.0 = exact, 1.0 = anything)
    #[arg(long, default_value_t = 0.1)]
    match_threshold: f32,

    /// Characters a patch may drift from its expected location
    #[arg(long, default_value_t = 1000)]
    match_distance: usize,

    /// Characters of context kept around each patch hunk
    #[arg(long, default_value_t = 4)]
    patch_margin: usize,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    request_timeout_ms: u64,
}

impl Args {
    fn merge_config(&self) -> anyhow::Result<MergeConfig> {
        if !(0.0..=1.0).contains(&self.match_threshold) {
            anyhow::bail!(
                "--match-threshold must be between 0.0 and 1.0, got {}",
                self.match_threshold
            );
        }
        Ok(MergeConfig {
            strategy: self.strategy,
            patch: PatchConfig {
                match_threshold: self.match_threshold,
                match_distance: self.match_distance,
                patch_margin: self.patch_margin,
            },
            strip_carriage_returns: true,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    let merge_config = args.merge_config()?;
    let api_config = ApiConfig {
        request_timeout_ms: args.request_timeout_ms,
        ..ApiConfig::default()
    };

    // Create database with the issue table
    let db = Arc::new(Database::new());
    db.create_table(
        &api_config.issues_table,
        "id",
        vec![Column::new("title").required(), Column::new("description")],
    )
    .context("Failed to create issue table")?;

    let state = AppState::new(db, merge_config, api_config)?;
    let router = Router::new(state).context("Failed to build router")?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("Invalid host or port")?;
    let server = Server::new(addr, router);

    tracing::info!(
        host = %args.host,
        port = args.port,
        strategy = %args.strategy,
        match_threshold = args.match_threshold,
        match_distance = args.match_distance,
        request_timeout_ms = args.request_timeout_ms,
        "Starting merge server"
    );

    // Serve until Ctrl+C
    server
        .serve_until(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("Failed to listen for ctrl_c: {}", e);
            }
            tracing::info!("Shutting down server...");
        })
        .await
        .context("Server error")?;

    Ok(())
}
