//! Error types for store operations

use thiserror::Error;

/// Failures surfaced by the persistence gateway.
///
/// The variants carry exactly the distinctions the HTTP layer needs:
/// an unknown user maps to 401, a failed read on the list path maps to
/// 503, and any failed write maps to 500. An empty result set is never
/// an error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Unknown user")]
    UnknownUser,

    #[error("Store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Store operation failed: {reason}")]
    Backend { reason: String },
}

impl StoreError {
    /// Read-path failure (list queries). Maps to 503.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        StoreError::Unavailable {
            reason: reason.into(),
        }
    }

    /// Write or lookup failure. Maps to 500.
    pub fn backend(reason: impl Into<String>) -> Self {
        StoreError::Backend {
            reason: reason.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::unavailable("connection refused");
        assert_eq!(err.to_string(), "Store unavailable: connection refused");

        let err = StoreError::backend("insert failed");
        assert_eq!(err.to_string(), "Store operation failed: insert failed");

        assert_eq!(StoreError::UnknownUser.to_string(), "Unknown user");
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(
            StoreError::unavailable("x"),
            StoreError::Unavailable {
                reason: "x".to_string()
            }
        );
        assert_ne!(StoreError::unavailable("x"), StoreError::backend("x"));
    }
}
