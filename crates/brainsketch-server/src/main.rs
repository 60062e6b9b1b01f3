//! BrainSketch Persistence Server
//!
//! Stores one drawing per user and serves it back to the sketch board.
//!
//! ## API
//!
//! ```text
//! GET  /canvas?userId=<id>          -> { "success": true, "data": { "userId", "lines", "createdAt", "updatedAt" } }
//! POST /canvas { userId?, lines }   -> { "success": true, "data": { .. } }
//! ```
//!
//! `userId` defaults to `default-user`. Storage failures answer 500 with
//! `{ "success": false, "error": ".." }`; a failed `GET` also carries
//! `data: { "userId": "default-user", "lines": [] }`. A `POST` body that is not valid
//! JSON, or has the wrong shape, answers 400 rather than 500, with the same failure
//! envelope.

mod config;
mod routes;
mod store;

use config::ServerConfig;
use routes::AppState;
use std::sync::Arc;
use store::StoreHandle;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brainsketch_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let state = AppState::new(StoreHandle::new(&config));
    let store = Arc::clone(&state.store);

    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("BrainSketch server listening on {}", config.addr);
    info!(store = ?config.store, "documents are opened on first request");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
