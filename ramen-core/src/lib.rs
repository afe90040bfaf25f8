//! Ramen Core - Entity Types
//!
//! Pure data structures shared by the storage and API layers. This crate
//! contains ONLY data types and digest helpers - no business logic.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub mod error;

pub use error::{StoreError, StoreResult};

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Todo row identifier. Assigned by the store on insert (SERIAL column).
pub type TodoId = i32;

/// SHA-256 digest value, used for both password digests and session tokens.
/// Stored hex-encoded (64 lowercase chars) in the `users` table.
pub type SessionHash = [u8; 32];

/// Compute the SHA-256 digest of a byte sequence.
pub fn compute_digest(content: &[u8]) -> SessionHash {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let result = hasher.finalize();
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&result);
    digest
}

// ============================================================================
// TODO ENTITIES
// ============================================================================

/// A single todo row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoId,
    pub name: String,
}

/// A field in a partial update, tagged with explicit presence.
///
/// `Keep` means the field was omitted from the request and the stored value
/// must not be touched. `Set("")` is a real update to the empty string, so
/// an `Option` is not enough here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldUpdate<T> {
    #[default]
    Keep,
    Set(T),
}

impl<T> FieldUpdate<T> {
    /// True when the field carries a new value.
    pub fn is_set(&self) -> bool {
        matches!(self, FieldUpdate::Set(_))
    }

    /// Borrow the new value, if any.
    pub fn as_set(&self) -> Option<&T> {
        match self {
            FieldUpdate::Set(value) => Some(value),
            FieldUpdate::Keep => None,
        }
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(value) => FieldUpdate::Set(value),
            None => FieldUpdate::Keep,
        }
    }
}

/// Partial update directive for a todo row.
///
/// An all-`Keep` patch is a successful no-op: the store performs zero
/// writes and reports success.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TodoPatch {
    pub name: FieldUpdate<String>,
}

impl TodoPatch {
    /// A patch that updates nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A patch that sets the name.
    pub fn set_name(name: impl Into<String>) -> Self {
        Self {
            name: FieldUpdate::Set(name.into()),
        }
    }

    /// True when no field carries a new value.
    pub fn is_empty(&self) -> bool {
        !self.name.is_set()
    }
}

// ============================================================================
// USER ENTITIES
// ============================================================================

/// User credential record as read from the `users` table.
///
/// `session_hash` is intentionally absent: the login flow reads and writes
/// it through dedicated store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub username: String,
    pub password_digest: SessionHash,
}
