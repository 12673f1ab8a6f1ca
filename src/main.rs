//! MathSheet · Worksheet Backend
//!
//! - Axum HTTP API: deterministic worksheet generation, JSON preview, PDF download
//! - Optional Supabase persistence of generation records (via environment variables)
//!
//! Important env variables:
//!   PORT                       : u16 (default 3000)
//!   WORKSHEET_CONFIG_PATH      : path to TOML config (document settings + curriculum overrides)
//!   SUPABASE_URL               : enables persistence together with a key
//!                                (NEXT_PUBLIC_SUPABASE_URL also accepted)
//!   SUPABASE_SERVICE_ROLE_KEY  : preferred key; falls back to SUPABASE_ANON_KEY
//!   SUPABASE_TABLE             : default "worksheets"
//!   LOG_LEVEL                  : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT                 : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod error;
mod config;
mod curriculum;
mod generator;
mod validation;
mod render;
mod persist;
mod state;
mod protocol;
mod logic;
mod routes;


use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Shared application state (settings, renderer, optional Supabase sink).
  let state = Arc::new(AppState::new());

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "mathsheet_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "mathsheet_backend", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "mathsheet_backend", "Shutdown signal received");
}
