pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mongodb::error::{ErrorKind, WriteFailure};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::{ValidationError, ValidationErrors};

/// Server error code for a unique index violation.
const MONGO_DUPLICATE_KEY: i32 = 11000;

/// Body returned for every error response.
///
/// ```json
/// {
///   "code": 1001,
///   "error": "VALIDATION_ERROR",
///   "message": "email must be an email and email should not be empty",
///   "details": { "email": [ ... ] }
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured details (e.g. per-field validation errors)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// HTTP-facing error type. Domain errors convert into this and render
/// through its `IntoResponse` implementation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON parsing error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Path extraction error: {0}")]
    PathExtractorRejection(#[from] PathRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Unknown properties: {}", .0.join(", "))]
    UnknownProperties(Vec<String>),

    #[error("Invalid ObjectId: {0}")]
    InvalidObjectId(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details, code) = match self {
            AppError::SerdeJson(e) => {
                tracing::error!(error_code = ErrorCode::SerdeJsonError.code(), error = ?e, "JSON serialization error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::SerdeJsonError.default_message().to_string(),
                    None,
                    ErrorCode::SerdeJsonError,
                )
            }
            AppError::Mongo(e) => {
                let (status, code) = map_mongo_error(&e);
                if status.is_server_error() {
                    tracing::error!(error_code = code.code(), error = ?e, "MongoDB error");
                } else {
                    tracing::info!(error_code = code.code(), error = %e, "MongoDB rejected write");
                }
                (status, code.default_message().to_string(), None, code)
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = ErrorCode::InvalidJson.code(), error = ?e, "JSON extraction error");
                (e.status(), e.body_text(), None, ErrorCode::InvalidJson)
            }
            AppError::PathExtractorRejection(e) => {
                tracing::warn!(error_code = ErrorCode::InvalidPath.code(), error = ?e, "Path extraction error");
                (
                    StatusCode::BAD_REQUEST,
                    e.body_text(),
                    None,
                    ErrorCode::InvalidPath,
                )
            }
            AppError::ValidationError(e) => {
                let message = validation_message(&e);
                tracing::info!(error_code = ErrorCode::ValidationError.code(), %message, "Validation error");
                (
                    StatusCode::BAD_REQUEST,
                    message,
                    Some(serde_json::to_value(&e).unwrap_or(serde_json::Value::Null)),
                    ErrorCode::ValidationError,
                )
            }
            AppError::UnknownProperties(names) => {
                let message = unknown_properties_message(&names);
                tracing::info!(error_code = ErrorCode::ValidationError.code(), %message, "Rejected unknown properties");
                (
                    StatusCode::BAD_REQUEST,
                    message,
                    Some(serde_json::json!({ "properties": names })),
                    ErrorCode::ValidationError,
                )
            }
            AppError::InvalidObjectId(raw) => {
                tracing::info!(error_code = ErrorCode::InvalidObjectId.code(), id = %raw, "Invalid ObjectId");
                (
                    StatusCode::BAD_REQUEST,
                    format!("Invalid id: '{}' is not a valid ObjectId", raw),
                    None,
                    ErrorCode::InvalidObjectId,
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!(error_code = ErrorCode::InvalidArgument.code(), "Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg, None, ErrorCode::InvalidArgument)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (StatusCode::NOT_FOUND, msg, None, ErrorCode::NotFound)
            }
        };

        let body = Json(ErrorResponse {
            code: code.code(),
            error: code.as_str().to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Classify a driver error into a status and error code.
fn map_mongo_error(error: &mongodb::error::Error) -> (StatusCode, ErrorCode) {
    match error.kind.as_ref() {
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::DatabaseUnavailable,
        ),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == MONGO_DUPLICATE_KEY =>
        {
            (StatusCode::CONFLICT, ErrorCode::DatabaseDuplicateKey)
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseError),
    }
}

/// Rule codes in reporting order. Rules not listed here come last.
const RULE_ORDER: &[&str] = &["required", "email", "url", "length", "range"];

fn rule_rank(code: &str) -> usize {
    RULE_ORDER
        .iter()
        .position(|rule| *rule == code)
        .unwrap_or(RULE_ORDER.len())
}

/// Flatten field errors into one sentence.
///
/// Fields are ordered by name and each field's rules by [`RULE_ORDER`],
/// since validator does not keep declaration order. Rules without a message
/// fall back to `"<field> failed <code> validation"`. Messages are joined
/// with `" and "`.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<(String, Vec<&ValidationError>)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let mut errs: Vec<&ValidationError> = errs.iter().collect();
            errs.sort_by_key(|err| rule_rank(&err.code));
            (field.to_string(), errs)
        })
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let messages: Vec<String> = fields
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("{} failed {} validation", field, err.code),
            })
        })
        .collect();

    if messages.is_empty() {
        ErrorCode::ValidationError.default_message().to_string()
    } else {
        messages.join(" and ")
    }
}

fn unknown_properties_message(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("property {} should not exist", name))
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Build an error response directly, outside of `AppError`.
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    let body = Json(ErrorResponse {
        code: error_code.code(),
        error: error_code.as_str().to_string(),
        message,
        details: None,
    });

    (status, body).into_response()
}
