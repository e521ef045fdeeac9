use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use coursehub::router::init_router;
use coursehub::state::AppState;
use coursehub_config::{CorsConfig, EmailConfig, JwtConfig};
use coursehub_db::{MemoryRepository, Repository};
use coursehub_models::{Course, CreateCourseDto, NewUser};

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

#[allow(dead_code)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub token: String,
}

pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    /// Sends one request through the full router and returns the status and
    /// the JSON body (`Value::Null` when the body is empty).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    #[allow(dead_code)]
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry: 3600,
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with_email(EmailConfig::disabled())
}

pub fn setup_test_app_with_email(email_config: EmailConfig) -> TestApp {
    let state = AppState::new(
        Arc::new(MemoryRepository::new()),
        test_jwt_config(),
        email_config,
        CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        },
    );
    TestApp {
        router: init_router(state.clone()),
        state,
    }
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

/// Stores a user directly and issues a token for it.
pub async fn create_test_user(state: &AppState, is_adm: bool) -> TestUser {
    let email = generate_unique_email();
    let password = "testpass123".to_string();

    let record = state
        .repo
        .insert_user(NewUser {
            first_name: FirstName().fake(),
            last_name: LastName().fake(),
            email: email.clone(),
            password_hash: bcrypt::hash(&password, 4).unwrap(),
            is_adm,
        })
        .await
        .unwrap();

    TestUser {
        id: record.id,
        email,
        token: state.tokens.issue(record.id).unwrap(),
        password,
    }
}

#[allow(dead_code)]
pub async fn create_test_course(state: &AppState, name: &str) -> Course {
    state
        .repo
        .insert_course(CreateCourseDto {
            course_name: name.to_string(),
            duration: "40h".to_string(),
        })
        .await
        .unwrap()
}
