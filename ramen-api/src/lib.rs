//! Ramen API - REST Layer
//!
//! This crate provides the HTTP surface of the ramen todo service: Axum
//! route handlers for the todo CRUD endpoints and the login flow, plus the
//! PostgreSQL gateway implementing the store capability trait from
//! ramen-storage.

pub mod constants;
pub mod db;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use db::{DbConfig, PgStore};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::create_router;
pub use state::AppState;
