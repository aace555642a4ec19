use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Carries the key that was looked up (id or email).
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidArgument(msg) => AppError::BadRequest(msg),
            UserError::NotFound(key) => AppError::NotFound(format!("User {} not found", key)),
            UserError::Database(e) => AppError::Mongo(e),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                UserError::InvalidArgument("Missing required data".into()),
                StatusCode::BAD_REQUEST,
            ),
            (UserError::NotFound("abc".into()), StatusCode::NOT_FOUND),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_not_found_message_names_the_key() {
        let app_error = AppError::from(UserError::NotFound("a@b.com".into()));
        assert_eq!(app_error.to_string(), "Not Found: User a@b.com not found");
    }
}
