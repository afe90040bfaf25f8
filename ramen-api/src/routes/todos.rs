//! Todo REST API Routes
//!
//! This module implements Axum route handlers for the todo CRUD operations.
//! All handlers go through the store capability trait on `AppState`.
//!
//! Bodies arrive as flat string-to-string JSON objects, so requests are read
//! as raw bytes and decoded into a map rather than a typed payload. Ids on
//! the wire are decimal strings in both directions.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use ramen_core::{TodoId, TodoItem, TodoPatch};

use crate::error::{ApiError, ApiResult};
use crate::routes::parse_string_map;
use crate::state::AppState;

// ============================================================================
// TYPES
// ============================================================================

/// Wire form of a todo row. Ids are serialized as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoWire {
    pub id: String,
    pub name: String,
}

impl From<TodoItem> for TodoWire {
    fn from(item: TodoItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name,
        }
    }
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /todos - List every todo in ascending id order.
pub async fn list_todos(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let todos = state.store.list_todos().await?;
    let body: Vec<TodoWire> = todos.into_iter().map(TodoWire::from).collect();
    Ok(Json(body))
}

/// POST /todos - Insert a new todo.
///
/// The body must carry an integer-shaped `id` and a `name`, but the
/// submitted id is only validated; the store assigns the real one.
pub async fn create_todo(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let fields = parse_string_map(&body)?;

    let id = fields.get("id").ok_or_else(|| ApiError::missing_field("id"))?;
    id.parse::<i64>()
        .map_err(|_| ApiError::invalid_input(format!("id is not an integer: {}", id)))?;

    let name = fields
        .get("name")
        .ok_or_else(|| ApiError::missing_field("name"))?;

    state.store.create_todo(name).await?;

    Ok(Json(serde_json::json!({})))
}

/// DELETE /todos?id=N - Remove the todo with the given id.
///
/// Deleting an id that is not present still succeeds.
pub async fn delete_todo(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<impl IntoResponse> {
    let id = params.get("id").ok_or_else(|| ApiError::missing_field("id"))?;
    let id: u32 = id
        .parse()
        .map_err(|_| ApiError::invalid_input(format!("id is not a non-negative integer: {}", id)))?;

    state.store.delete_todo(id).await?;

    Ok(Json(serde_json::json!({})))
}

/// PATCH /todos?id=N - Partially update the todo with the given id.
///
/// The body is decoded best-effort: a malformed body reads as an empty
/// directive rather than an error, and an empty directive performs no
/// writes. Updating an absent id also succeeds.
pub async fn update_todo(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let id = params.get("id").ok_or_else(|| ApiError::missing_field("id"))?;
    let id: TodoId = id
        .parse()
        .map_err(|_| ApiError::invalid_input(format!("id is not an integer: {}", id)))?;

    let fields: HashMap<String, String> = serde_json::from_slice(&body).unwrap_or_default();
    let patch = match fields.get("name") {
        Some(name) => TodoPatch::set_name(name.clone()),
        None => TodoPatch::empty(),
    };

    state.store.update_todo(id, &patch).await?;

    Ok(StatusCode::OK)
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the todo router.
pub fn create_router() -> Router<AppState> {
    Router::new().route(
        "/todos",
        get(list_todos)
            .post(create_todo)
            .delete(delete_todo)
            .patch(update_todo),
    )
}
