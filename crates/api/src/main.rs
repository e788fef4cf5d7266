//! Skillswap JSON HTTP API.
//!
//! Exposes users and skill sets, the swap request lifecycle, notifications,
//! and swap-gated chat over plain JSON.

mod config;
mod error;
mod routes;
mod state;

use database::Database;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting Skillswap API server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Build application state
    let state = AppState::new(db);

    // Build router; the SPA frontend is served from another origin
    let app = routes::router()
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "Skillswap API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
