//! Type-safe error codes for API responses.
//!
//! Each code has a SCREAMING_SNAKE_CASE identifier for clients, an integer
//! for logs and metrics, and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000s)
    /// Request body failed field validation or named unknown properties
    ValidationError,

    /// Path identifier is not a valid ObjectId
    InvalidObjectId,

    /// Request body is not valid JSON
    InvalidJson,

    /// Requested resource was not found
    NotFound,

    /// Malformed argument outside of body validation
    InvalidArgument,

    /// Path parameter could not be extracted
    InvalidPath,

    /// No route matches the method for this path
    MethodNotAllowed,

    // Database errors (2000s)
    /// Unclassified driver or server error
    DatabaseError,

    /// No server could be selected or the connection dropped
    DatabaseUnavailable,

    /// A unique index rejected the write
    DatabaseDuplicateKey,

    // Serialization errors (5000s)
    SerdeJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidObjectId => "INVALID_OBJECT_ID",
            Self::InvalidJson => "INVALID_JSON",
            Self::NotFound => "NOT_FOUND",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::InvalidPath => "INVALID_PATH",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
            Self::DatabaseDuplicateKey => "DATABASE_DUPLICATE_KEY",
            Self::SerdeJsonError => "SERDE_JSON_ERROR",
        }
    }

    /// Integer code for structured logs.
    ///
    /// - 1000-1999: client errors
    /// - 2000-2999: database errors
    /// - 5000-5999: serialization errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidObjectId => 1002,
            Self::InvalidJson => 1003,
            Self::NotFound => 1004,
            Self::InvalidArgument => 1006,
            Self::InvalidPath => 1007,
            Self::MethodNotAllowed => 1009,
            Self::DatabaseError => 2001,
            Self::DatabaseUnavailable => 2002,
            Self::DatabaseDuplicateKey => 2003,
            Self::SerdeJsonError => 5001,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidObjectId => "Invalid identifier format",
            Self::InvalidJson => "Invalid JSON format",
            Self::NotFound => "Resource not found",
            Self::InvalidArgument => "Invalid argument",
            Self::InvalidPath => "Invalid path parameter",
            Self::MethodNotAllowed => "The HTTP method is not allowed for this resource",
            Self::DatabaseError => "A database error occurred",
            Self::DatabaseUnavailable => "Database is unavailable",
            Self::DatabaseDuplicateKey => "A record with the same unique key already exists",
            Self::SerdeJsonError => "Failed to serialize or deserialize JSON",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_matches_as_str() {
        for code in [
            ErrorCode::ValidationError,
            ErrorCode::InvalidObjectId,
            ErrorCode::NotFound,
            ErrorCode::DatabaseDuplicateKey,
        ] {
            let json = serde_json::to_value(code).unwrap();
            assert_eq!(json, serde_json::json!(code.as_str()));
        }
    }

    #[test]
    fn test_codes_fall_in_their_ranges() {
        assert!((1000..2000).contains(&ErrorCode::InvalidArgument.code()));
        assert!((2000..3000).contains(&ErrorCode::DatabaseUnavailable.code()));
        assert!((5000..6000).contains(&ErrorCode::SerdeJsonError.code()));
    }
}
