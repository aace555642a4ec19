//! JSON body extractor with property whitelisting and field validation.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

/// The set of properties a request body may contain.
pub trait KnownFields {
    /// JSON property names, exactly as they appear on the wire.
    const FIELDS: &'static [&'static str];
}

/// JSON extractor that checks a body in three steps:
///
/// 1. The body must be a JSON object whose keys are all in
///    [`KnownFields::FIELDS`]. Any other key rejects the request with
///    [`AppError::UnknownProperties`] (`"property <name> should not exist"`).
/// 2. The object is deserialized into `T`.
/// 3. `T::validate` runs; failures reject with [`AppError::ValidationError`].
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CreateUser {
///     #[validate(email(message = "email must be an email"))]
///     email: String,
/// }
///
/// impl KnownFields for CreateUser {
///     const FIELDS: &'static [&'static str] = &["email"];
/// }
///
/// async fn create(ValidatedJson(input): ValidatedJson<CreateUser>) { /* ... */ }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + KnownFields,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state).await?;

        let Value::Object(ref object) = body else {
            return Err(AppError::BadRequest(
                "Request body must be a JSON object".to_string(),
            ));
        };

        let unknown: Vec<String> = object
            .keys()
            .filter(|key| !T::FIELDS.contains(&key.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(AppError::UnknownProperties(unknown));
        }

        let data: T =
            serde_json::from_value(body).map_err(|e| AppError::BadRequest(e.to_string()))?;
        data.validate()?;

        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorResponse;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::post,
    };
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Signup {
        #[serde(default)]
        #[validate(
            email(message = "email must be an email"),
            length(min = 1, message = "email should not be empty")
        )]
        email: String,
        nickname: Option<String>,
    }

    impl KnownFields for Signup {
        const FIELDS: &'static [&'static str] = &["email", "nickname"];
    }

    async fn send(body: &str) -> (StatusCode, Option<ErrorResponse>) {
        let app = Router::new().route(
            "/",
            post(|ValidatedJson(s): ValidatedJson<Signup>| async move {
                s.nickname.unwrap_or(s.email)
            }),
        );
        let response = app
            .oneshot(
                Request::post("/")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).ok())
    }

    #[tokio::test]
    async fn test_accepts_valid_body() {
        let (status, _) = send(r#"{"email":"a@b.com","nickname":"ab"}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejects_unknown_property() {
        let (status, body) = send(r#"{"email":"a@b.com","notafield":"x"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.unwrap().message, "property notafield should not exist");
    }

    #[tokio::test]
    async fn test_missing_field_reports_every_rule() {
        let (status, body) = send(r#"{"nickname":"ab"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body.unwrap().message,
            "email must be an email and email should not be empty"
        );
    }

    #[tokio::test]
    async fn test_rejects_non_object_body() {
        let (status, body) = send(r#"["a@b.com"]"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.unwrap().message, "Request body must be a JSON object");
    }

    #[tokio::test]
    async fn test_rejects_malformed_json() {
        let (status, _) = send(r#"{"email":"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
