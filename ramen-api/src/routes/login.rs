//! Login Route
//!
//! Implements the credential check and session issuance flow: digest the
//! submitted password, compare it against the stored digest, mint a session
//! token, persist it, and hand it back through cookies.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use crate::error::{ApiError, ApiResult};
use crate::routes::parse_string_map;
use crate::session::{issue_session_token, login_cookies, verify_password};
use crate::state::AppState;

/// POST /login - Authenticate and start a session.
///
/// Missing `username` or `password` keys default to the empty string, which
/// then fails the user lookup. A wrong password stops the flow before any
/// session state is touched, so no cookies are issued on 401.
pub async fn login(State(state): State<AppState>, body: Bytes) -> ApiResult<Response> {
    let fields = parse_string_map(&body)?;

    let username = fields.get("username").cloned().unwrap_or_default();
    let password = fields.get("password").cloned().unwrap_or_default();

    let user = state.store.get_user_info(&username).await?;

    if !verify_password(&password, &user.password_digest) {
        return Err(ApiError::unauthorized(format!(
            "Password mismatch for user {}",
            username
        )));
    }

    let token = issue_session_token(&username);
    state.store.set_session_hash(&username, &token).await?;

    let token_hex = hex::encode(token);
    let mut response = (StatusCode::OK, Json(serde_json::json!({}))).into_response();
    for cookie in login_cookies(&username, &token_hex) {
        let value = HeaderValue::from_str(&cookie)
            .map_err(|e| ApiError::internal_error(format!("Invalid cookie value: {}", e)))?;
        response.headers_mut().append(header::SET_COOKIE, value);
    }

    Ok(response)
}

/// Create the login router.
pub fn create_router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}
