//! REST API Routes Module
//!
//! This module contains all route handlers organized by concern:
//! - Todo CRUD routes
//! - Login flow
//! - Health check endpoints
//! - CORS support for browser-based clients

pub mod health;
pub mod login;
pub mod todos;

use std::collections::HashMap;

use axum::{response::IntoResponse, routing::get, Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::constants::HELLO_MESSAGE;
use crate::error::ApiResult;
use crate::state::AppState;

// Re-export route creation functions for convenience
pub use health::create_router as health_router;
pub use login::create_router as login_router;
pub use todos::create_router as todos_router;

/// GET / - Greeting used as a smoke check.
async fn hello() -> impl IntoResponse {
    Json(serde_json::json!({ "message": HELLO_MESSAGE }))
}

/// Decode a request body as a flat string-to-string JSON object.
///
/// Request bodies on this API are maps of string keys to string values;
/// any other shape (nested objects, numeric values) is a 400.
pub(crate) fn parse_string_map(body: &[u8]) -> ApiResult<HashMap<String, String>> {
    let fields = serde_json::from_slice(body)?;
    Ok(fields)
}

/// Create the full application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(hello))
        .merge(todos_router())
        .merge(login_router())
        .nest("/health", health_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use ramen_test_utils::seeded_store;
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_hello_route() {
        let app = create_router(AppState::new(Arc::new(seeded_store())));

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Hello World");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = create_router(AppState::new(Arc::new(seeded_store())));

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/nope")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
    }
}
