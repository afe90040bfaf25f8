//! Login and Session Token Primitives
//!
//! Password verification compares SHA-256 digests; session tokens are
//! derived from a nanosecond timestamp joined with the username. Both ends
//! of the flow use the same hex encoding, so tokens and stored digests are
//! always 64 lowercase hex characters.

use chrono::Utc;
use ramen_core::{compute_digest, SessionHash};

use crate::constants::{COOKIE_SESSION_HASH, COOKIE_USERNAME, SESSION_COOKIE_MAX_AGE_SECS};

/// Digest a plaintext password for comparison against the stored digest.
pub fn password_digest(password: &str) -> SessionHash {
    compute_digest(password.as_bytes())
}

/// Check a submitted password against the stored digest.
pub fn verify_password(submitted: &str, stored: &SessionHash) -> bool {
    password_digest(submitted) == *stored
}

/// Seed string for a session token: zero-padded hex nanoseconds, a slash,
/// then the username.
fn token_seed(nanos: i64, username: &str) -> String {
    format!("{:08x}/{}", nanos, username)
}

/// Derive a fresh session token for the given user from the current time.
pub fn issue_session_token(username: &str) -> SessionHash {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    compute_digest(token_seed(nanos, username).as_bytes())
}

/// Render a session cookie as a Set-Cookie header value.
///
/// Cookies are host-scoped, HttpOnly, and expire after
/// `SESSION_COOKIE_MAX_AGE_SECS`.
pub fn session_cookie(name: &str, value: &str) -> String {
    format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly",
        name, value, SESSION_COOKIE_MAX_AGE_SECS
    )
}

/// The pair of Set-Cookie values issued on a successful login.
pub fn login_cookies(username: &str, token_hex: &str) -> [String; 2] {
    [
        session_cookie(COOKIE_USERNAME, username),
        session_cookie(COOKIE_SESSION_HASH, token_hex),
    ]
}
