//! Ramen API Server Entry Point
//!
//! Bootstraps tracing and the PostgreSQL pool, then starts the Axum HTTP
//! server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use ramen_api::constants::{DEFAULT_BIND_HOST, DEFAULT_BIND_PORT};
use ramen_api::telemetry::init_tracing;
use ramen_api::{create_router, ApiError, ApiResult, AppState, DbConfig, PgStore};

#[tokio::main]
async fn main() -> ApiResult<()> {
    init_tracing()?;

    let db_config = DbConfig::from_env();
    let store = PgStore::from_config(&db_config)?;
    let state = AppState::new(Arc::new(store));

    let app: Router = create_router(state);

    let addr = resolve_bind_addr()?;
    tracing::info!(%addr, "Starting ramen API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn resolve_bind_addr() -> ApiResult<SocketAddr> {
    let host = std::env::var("RAMEN_BIND").unwrap_or_else(|_| DEFAULT_BIND_HOST.to_string());
    let port_str = std::env::var("PORT")
        .ok()
        .or_else(|| std::env::var("RAMEN_PORT").ok())
        .unwrap_or_else(|| DEFAULT_BIND_PORT.to_string());
    let port = port_str
        .parse::<u16>()
        .map_err(|_| ApiError::invalid_input(format!("Invalid port value: {}", port_str)))?;

    let addr = format!("{}:{}", host, port);
    addr.parse::<SocketAddr>()
        .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
}
