//! Course models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A course users can subscribe to.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub course_name: String,
    pub duration: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseDto {
    #[validate(length(min = 1, message = "courseName must not be empty"))]
    pub course_name: String,
    #[validate(length(min = 1, message = "duration must not be empty"))]
    pub duration: String,
}

/// Partial course update. Absent fields keep their current value.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseDto {
    #[validate(length(min = 1, message = "courseName must not be empty"))]
    pub course_name: Option<String>,
    #[validate(length(min = 1, message = "duration must not be empty"))]
    pub duration: Option<String>,
}
