//! # API Error Type
//!
//! Unified error type for console commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Orina Operations                       │
//! │                                                                         │
//! │  orina sale record --item fg-9=2                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Unknown product? ── CoreError::ProductNotFound ───┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Empty cart? ─── ValidationError::EmptyCart ───── ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bad backup? ─── StoreError::InvalidSnapshot ──────┘            │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  main prints "[NOT_FOUND] Product not found: fg-9" and exits 1         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed save is NOT an `ApiError`: the controller logs it and the
//! command still succeeds against the in-memory state.

use serde::Serialize;
use std::fmt;

use orina_core::{CoreError, ValidationError};
use orina_store::StoreError;

use crate::state::ConfigError;

/// Error returned from console commands.
///
/// ## Serialization
/// With `--json`, this is what is printed when a command fails:
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Cart is empty"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product, transaction or expense not found
    NotFound,

    /// Input failed a boundary guard
    ValidationError,

    /// A delete was requested without confirmation
    ConfirmationRequired,

    /// Backup file rejected
    InvalidSnapshot,

    /// Reading or writing a file failed
    StorageError,

    /// Configuration could not be loaded
    ConfigError,

    /// Anything else
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// A delete that was not confirmed.
    pub fn unconfirmed(what: &str) -> Self {
        ApiError::new(
            ErrorCode::ConfirmationRequired,
            format!("Deleting {} cannot be undone; pass --yes to confirm", what),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidSnapshot(reason) => {
                ApiError::new(ErrorCode::InvalidSnapshot, format!("Invalid backup file: {}", reason))
            }
            StoreError::Io { path, source } => {
                tracing::error!(path = %path.display(), error = %source, "File operation failed");
                ApiError::new(
                    ErrorCode::StorageError,
                    format!("Could not access {}: {}", path.display(), source),
                )
            }
            StoreError::Serialization(e) => {
                tracing::error!(error = %e, "Serialization failed");
                ApiError::internal("Could not serialize state")
            }
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = serde_json::to_value(self.code)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| format!("{:?}", self.code));
        write!(f, "[{}] {}", code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ApiError::not_found("Product", "fg-9");
        assert_eq!(err.to_string(), "[NOT_FOUND] Product not found: fg-9");
    }

    #[test]
    fn test_from_core() {
        let err: ApiError = CoreError::Validation(ValidationError::EmptyCart).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Cart is empty");
    }

    #[test]
    fn test_from_store() {
        let err: ApiError = StoreError::invalid_snapshot("missing products").into();
        assert_eq!(err.code, ErrorCode::InvalidSnapshot);
        assert!(err.message.contains("missing products"));
    }

    #[test]
    fn test_serializes_code() {
        let json = serde_json::to_value(ApiError::unconfirmed("product fg-1")).unwrap();
        assert_eq!(json["code"], "CONFIRMATION_REQUIRED");
    }
}
