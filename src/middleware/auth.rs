use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use uuid::Uuid;

use coursehub_core::{AppError, Requester};

use crate::state::AppState;

/// Extractor that verifies the bearer token and loads the acting user.
///
/// Runs before any body extractor, so authentication failures always win
/// over validation errors.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Requester);

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.0.id
    }

    pub fn is_adm(&self) -> bool {
        self.0.is_adm
    }

    pub fn requester(&self) -> &Requester {
        &self.0
    }
}

/// Returns the token part of an `Authorization: <scheme> <token>` value.
fn token_from_header(value: &str) -> Option<&str> {
    value.split_whitespace().nth(1)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(token_from_header)
            .ok_or_else(AppError::missing_token)?;

        let user_id = state.tokens.verify(token)?;

        // A token can outlive its subject.
        let user = state
            .repo
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid token."))?;

        Ok(AuthUser(Requester {
            id: user.id,
            is_adm: user.is_adm,
        }))
    }
}

/// Declares an extractor that authenticates and then applies the access
/// rule for a target-free operation.
#[macro_export]
macro_rules! require_operation {
    ($name:ident, $operation:expr) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = coursehub_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;

                coursehub_core::authorize(auth_user.requester(), $operation)?;

                Ok($name(auth_user))
            }
        }
    };
}

// Admin-only operations
require_operation!(RequireListUsers, coursehub_core::Operation::ListUsers);
require_operation!(RequireCourseCreate, coursehub_core::Operation::CreateCourse);
require_operation!(RequireCourseUpdate, coursehub_core::Operation::UpdateCourse);
