//! Handler tests for the Users domain
//!
//! These drive the users router over HTTP semantics:
//! - body whitelisting and field validation
//! - response envelopes and status codes
//! - error bodies
//!
//! Storage is the in-memory repository, so no database is needed.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::ErrorResponse;
use domain_users::*;
use http_body_util::BodyExt;
use mongodb::bson::oid::ObjectId;
use serde_json::{Value, json};
use test_utils::TestDataBuilder;
use test_utils::assertions::{assert_object_id, assert_some};
use tower::ServiceExt; // For oneshot()

fn app() -> Router {
    let service = UserService::new(InMemoryUserRepository::new());
    Router::new().nest("/api/users", handlers::router(service))
}

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn create(app: &Router, body: Value) -> User {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/users", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body::<NewUserResponse>(response.into_body())
        .await
        .new_user
}

#[tokio::test]
async fn test_create_user_returns_201_with_defaults() {
    let app = app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users",
            json!({ "username": "PhenomenalMo", "email": "mo123@mail.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = json_body(response.into_body()).await;
    let new_user = &body["newUser"];
    assert_eq!(new_user["username"], "PhenomenalMo");
    assert_eq!(new_user["email"], "mo123@mail.com");
    assert_object_id(new_user["_id"].as_str().unwrap(), "newUser._id");
    assert_eq!(new_user["location"], "");
    assert_eq!(new_user["avatar"], DEFAULT_AVATAR);
    assert_eq!(new_user["bio"], "");
    assert_eq!(new_user["DOB"], "");
}

#[tokio::test]
async fn test_create_user_coerces_numeric_username() {
    let app = app();

    let user = create(&app, json!({ "username": 10, "email": "12345@mail.com" })).await;
    assert_eq!(user.username, "10");
}

#[tokio::test]
async fn test_create_user_without_email_is_rejected() {
    let app = app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users",
            json!({ "username": "testuser" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(
        error.message,
        "email must be an email and email should not be empty"
    );
}

#[tokio::test]
async fn test_create_user_with_unknown_property_is_rejected() {
    let app = app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users",
            json!({
                "username": "PhenomenalMo",
                "email": "mo123@mail.com",
                "notafield": "test123"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "property notafield should not exist");
}

#[tokio::test]
async fn test_create_user_without_username_is_missing_data() {
    let app = app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users",
            json!({ "email": "mo123@mail.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "Missing required data");
}

#[tokio::test]
async fn test_patch_all_fields() {
    let app = app();
    let created = create(
        &app,
        json!({ "username": "user to patch", "email": "usertopatch@gmail.com" }),
    )
    .await;

    let updates = json!({
        "username": "updated user",
        "email": "update123@mail.com",
        "location": "new location",
        "avatar": "https://cdn-icons-png.flaticon.com/512/40/40058.png",
        "bio": "new bio information",
        "DOB": "22/05/1965"
    });

    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/api/users/{}", created.id),
            updates,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated = json_body::<UpdatedUserResponse>(response.into_body())
        .await
        .updated_user;

    assert_eq!(
        updated,
        User {
            id: created.id,
            username: "updated user".into(),
            email: "update123@mail.com".into(),
            location: "new location".into(),
            avatar: "https://cdn-icons-png.flaticon.com/512/40/40058.png".into(),
            bio: "new bio information".into(),
            dob: "22/05/1965".into(),
        }
    );
}

#[tokio::test]
async fn test_repeated_patch_is_idempotent() {
    let app = app();
    let created = create(&app, json!({ "username": "a", "email": "a@mail.com" })).await;
    let uri = format!("/api/users/{}", created.id);
    let patch = json!({ "bio": "same", "location": "here" });

    let mut results = Vec::new();
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(json_request("PATCH", &uri, patch.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        results.push(
            json_body::<UpdatedUserResponse>(response.into_body())
                .await
                .updated_user,
        );
    }

    assert_eq!(results[0], results[1]);
}

#[tokio::test]
async fn test_empty_patch_returns_current_user() {
    let app = app();
    let created = create(&app, json!({ "username": "a", "email": "a@mail.com" })).await;

    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/api/users/{}", created.id),
            json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: UpdatedUserResponse = json_body(response.into_body()).await;
    assert_eq!(body.updated_user, created);
}

#[tokio::test]
async fn test_patch_rejects_unknown_property_and_bad_email() {
    let app = app();
    let created = create(&app, json!({ "username": "a", "email": "a@mail.com" })).await;
    let uri = format!("/api/users/{}", created.id);

    let cases = [
        (json!({ "_id": "x" }), "property _id should not exist"),
        (json!({ "email": "nope" }), "email must be an email"),
    ];

    for (body, message) in cases {
        let response = app
            .clone()
            .oneshot(json_request("PATCH", &uri, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = json_body(response.into_body()).await;
        assert_eq!(error.message, message);
    }
}

#[tokio::test]
async fn test_patch_missing_user_is_404() {
    let response = app()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/users/{}", ObjectId::new().to_hex()),
            json!({ "bio": "x" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_users() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("test_list_users");
    for suffix in ["one", "two"] {
        create(
            &app,
            json!({ "username": builder.username(suffix), "email": builder.email(suffix) }),
        )
        .await;
    }

    let response = app.oneshot(get("/api/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    for user in users {
        for field in ["username", "email", "location", "avatar", "bio", "DOB"] {
            assert!(user[field].is_string(), "{field} should be a string");
        }
    }
}

#[tokio::test]
async fn test_list_users_empty() {
    let response = app().oneshot(get("/api/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: UsersResponse = json_body(response.into_body()).await;
    assert!(body.users.is_empty());
}

#[tokio::test]
async fn test_get_user_by_id() {
    let app = app();
    let created = create(&app, json!({ "username": "a", "email": "a@mail.com" })).await;

    let response = app
        .oneshot(get(&format!("/api/users/{}", created.id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: UserResponse = json_body(response.into_body()).await;
    assert_eq!(body.user, created);
}

#[tokio::test]
async fn test_get_user_not_found_and_malformed_id() {
    let app = app();

    let response = app
        .clone()
        .oneshot(get("/api/users/65f1c2a9e4b0a1b2c3d4e5f6"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/api/users/not-an-id")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "INVALID_OBJECT_ID");
}

#[tokio::test]
async fn test_get_user_by_email() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("test_get_user_by_email");
    let email = builder.email("main");
    let created = create(
        &app,
        json!({ "username": builder.username("main"), "email": email }),
    )
    .await;

    let response = app
        .clone()
        .oneshot(get(&format!("/api/users/login/{}", email)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: UserResponse = json_body(response.into_body()).await;
    assert_eq!(body.user, created);

    let response = app
        .oneshot(get(&format!("/api/users/login/{}", builder.email("other"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_user_by_malformed_email() {
    let response = app()
        .oneshot(get("/api/users/login/not-an-email"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "email must be an email");
}

#[tokio::test]
async fn test_created_user_is_listed() {
    let app = app();
    let created = create(&app, json!({ "username": "a", "email": "a@mail.com" })).await;

    let response = app.oneshot(get("/api/users")).await.unwrap();
    let body: UsersResponse = json_body(response.into_body()).await;

    let listed = assert_some(
        body.users.into_iter().find(|u| u.id == created.id),
        "created user in list",
    );
    assert_eq!(listed, created);
}
