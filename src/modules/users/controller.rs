use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use coursehub_core::{AppError, Operation, authorize};

use crate::middleware::auth::{AuthUser, RequireListUsers};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::resource_id;
use crate::modules::users::model::{CreateUserDto, SubscribeCourseDto, UpdateUserDto, User};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

const USER_NOT_FOUND: &str = "User not found";

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created successfully", body = User),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 409, description = "User already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = UserService::create_user(state.repo.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "List of users", body = Vec<User>),
        (status = 400, description = "Missing authorization token", body = ErrorResponse),
        (status = 401, description = "Invalid token or not an admin", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    _admin: RequireListUsers,
) -> Result<Json<Vec<User>>, AppError> {
    let users = UserService::get_users(state.repo.as_ref()).await?;
    Ok(Json(users))
}

/// Get a user by id (owner only)
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse),
        (status = 403, description = "Another user's record", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, id))]
pub async fn get_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<User>, AppError> {
    let id = resource_id(id, USER_NOT_FOUND)?;
    authorize(auth_user.requester(), Operation::ViewUser(id))?;

    let user = UserService::get_user(state.repo.as_ref(), id).await?;
    Ok(Json(user))
}

/// Partially update a user (owner only)
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse),
        (status = 403, description = "Another user's record", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, id, body))]
pub async fn update_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<ValidatedJson<UpdateUserDto>, AppError>,
) -> Result<Json<User>, AppError> {
    let id = resource_id(id, USER_NOT_FOUND)?;
    authorize(auth_user.requester(), Operation::UpdateUser(id))?;
    let ValidatedJson(dto) = body?;

    let user = UserService::update_user(state.repo.as_ref(), id, dto).await?;
    Ok(Json(user))
}

/// Subscribe a user to a course (owner or admin)
#[utoipa::path(
    post,
    path = "/api/users/{id}/courses",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = SubscribeCourseDto,
    responses(
        (status = 200, description = "User with the course enrolled", body = User),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse),
        (status = 403, description = "Another user's record", body = ErrorResponse),
        (status = 404, description = "User or course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, id))]
pub async fn subscribe_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
    ValidatedJson(dto): ValidatedJson<SubscribeCourseDto>,
) -> Result<Json<User>, AppError> {
    let id = resource_id(id, USER_NOT_FOUND)?;

    let subscription =
        UserService::subscribe(state.repo.as_ref(), auth_user.requester(), id, dto.course_id)
            .await?;

    if subscription.newly_enrolled {
        state
            .email
            .notify_subscription(&subscription.user, &subscription.course);
    }

    Ok(Json(subscription.user))
}
