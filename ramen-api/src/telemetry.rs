//! Tracing Subscriber Initialization
//!
//! Sets up the global tracing subscriber with an environment-driven filter.
//! RUST_LOG overrides the default filter when set.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{ApiError, ApiResult};

/// Initialize the tracing subscriber.
///
/// This function should be called once at application startup before any
/// tracing occurs.
pub fn init_tracing() -> ApiResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ramen_api=info,tower_http=info,info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| ApiError::internal_error(format!("Failed to init subscriber: {}", e)))?;

    Ok(())
}
