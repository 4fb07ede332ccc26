//! Puzzle Rounds · timed puzzle-game backend
//!
//! - Axum HTTP + WebSocket API over the round engine
//! - Built-in catalogs (lip reading, visual riddles, escape rooms)
//! - Static shell fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT               : u16 (default 3000)
//!   ENGINE_CONFIG_PATH : path to TOML config (rule overrides + extra riddles)
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use puzzle_rounds::build_router;
use puzzle_rounds::state::{AppState, FINISHED_SESSION_TTL, SWEEP_PERIOD};
use puzzle_rounds::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (catalogs, config, session registry).
  let state = Arc::new(AppState::new());

  // Drop finished sessions clients never deleted.
  let sweeper = state.clone().spawn_sweeper(SWEEP_PERIOD, FINISHED_SESSION_TTL);

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "puzzle_rounds", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  sweeper.abort();
  // Stop every countdown before exiting.
  let ids: Vec<_> = state.sessions.read().await.keys().copied().collect();
  for id in ids {
    let _ = state.remove_session(id).await;
  }
  info!(target: "puzzle_rounds", "Shut down cleanly");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "puzzle_rounds", error = %e, "Failed to listen for ctrl-c");
    std::future::pending::<()>().await;
  }
}
