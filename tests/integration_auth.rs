mod common;

use axum::http::{Method, StatusCode};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde_json::json;
use uuid::Uuid;

use common::{TEST_JWT_SECRET, create_test_user, setup_test_app};
use coursehub_auth::Claims;

#[tokio::test]
async fn test_login_success() {
    let app = setup_test_app();
    let user = create_test_user(&app.state, false).await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": user.email, "password": user.password })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap();

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        &Validation::default(),
    )
    .unwrap()
    .claims;
    assert_eq!(claims.sub, user.id.to_string());
    assert!(claims.exp > claims.iat);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = setup_test_app();
    let user = create_test_user(&app.state, false).await;

    let (wrong_status, wrong_body) = app
        .request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": user.email, "password": "wrongpass123" })),
        )
        .await;
    let (unknown_status, unknown_body) = app
        .request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": "nobody@test.com", "password": "wrongpass123" })),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, json!({ "message": "Invalid credentials" }));
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_login_missing_field() {
    let app = setup_test_app();

    let (status, body) = app
        .request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": "someone@test.com" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": ["password is a required field"] }));
}

#[tokio::test]
async fn test_login_invalid_email_format() {
    let app = setup_test_app();

    let (status, body) = app
        .request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": "not-an-email", "password": "testpass123" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": ["email must be a valid email"] }));
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let app = setup_test_app();

    for uri in ["/api/users", "/api/courses"] {
        let (status, body) = app.request(Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body, json!({ "message": "Missing authorization token." }));
    }
}

#[tokio::test]
async fn test_protected_route_with_garbage_token() {
    let app = setup_test_app();

    let (status, body) = app
        .request(Method::GET, "/api/courses", Some("not-a-jwt"), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Invalid token." }));
}

#[tokio::test]
async fn test_protected_route_with_expired_token() {
    let app = setup_test_app();
    let user = create_test_user(&app.state, false).await;

    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user.id.to_string(),
        iat: now - 7200,
        exp: now - 3600,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap();

    let (status, body) = app
        .request(Method::GET, "/api/courses", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Token expired." }));
}

#[tokio::test]
async fn test_token_signed_with_other_secret() {
    let app = setup_test_app();
    let user = create_test_user(&app.state, false).await;

    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user.id.to_string(),
        iat: now,
        exp: now + 3600,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"some-other-secret"),
    )
    .unwrap();

    let (status, body) = app
        .request(Method::GET, "/api/courses", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Invalid token." }));
}

#[tokio::test]
async fn test_token_for_unknown_subject() {
    let app = setup_test_app();
    let token = app.state.tokens.issue(Uuid::new_v4()).unwrap();

    let (status, body) = app
        .request(Method::GET, "/api/courses", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Invalid token." }));
}
