//! Feature modules, one per resource.
//!
//! Each module follows the same layout:
//!
//! - `controller`: axum handlers with OpenAPI annotations
//! - `service`: business logic over the [`Repository`](coursehub_db::Repository)
//! - `router`: route table for the module
//! - `model`: re-exports of the module's DTOs and entities

use axum::extract::{Path, rejection::PathRejection};
use uuid::Uuid;

use coursehub_core::AppError;

pub mod auth;
pub mod courses;
pub mod users;

pub use self::auth::model::LoginRequest;
pub use self::courses::model::Course;
pub use self::users::model::User;

/// Unwraps a `/{id}` path segment; a segment that is not a UUID cannot
/// name an existing resource, so it is reported as `not_found`.
pub(crate) fn resource_id(
    path: Result<Path<Uuid>, PathRejection>,
    not_found: &'static str,
) -> Result<Uuid, AppError> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::not_found(not_found))
}
