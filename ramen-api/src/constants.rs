//! Constants for the Ramen API
//!
//! This module contains all constant values used throughout the API.
//! Centralizing constants makes them easy to find, modify, and test.

// ============================================================================
// SESSION COOKIES
// ============================================================================

/// Cookie carrying the logged-in username
pub const COOKIE_USERNAME: &str = "Username";

/// Cookie carrying the session token
pub const COOKIE_SESSION_HASH: &str = "SessionHash";

/// Session cookie lifetime in seconds (24 hours)
pub const SESSION_COOKIE_MAX_AGE_SECS: i64 = 86400;

// ============================================================================
// SERVER
// ============================================================================

/// Default bind host when RAMEN_BIND is unset
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// Default bind port when PORT / RAMEN_PORT are unset
pub const DEFAULT_BIND_PORT: u16 = 3000;

/// Greeting returned by the root endpoint
pub const HELLO_MESSAGE: &str = "Hello World";
