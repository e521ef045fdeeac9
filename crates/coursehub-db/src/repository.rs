use async_trait::async_trait;
use uuid::Uuid;

use coursehub_models::{
    Course, CreateCourseDto, NewUser, UpdateCourseDto, UserChanges, UserRecord,
};

use crate::error::StoreError;

/// Storage operations for users, courses, and enrollments.
///
/// Lookups return `Ok(None)` for missing rows; deciding whether that is a
/// 404 is up to the caller. Writes that would duplicate a user's email
/// return [`StoreError::UniqueViolation`].
#[async_trait]
pub trait Repository: Send + Sync + std::fmt::Debug {
    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// All users, oldest first.
    async fn list_users(&self) -> Result<Vec<UserRecord>, StoreError>;

    async fn insert_user(&self, user: NewUser) -> Result<UserRecord, StoreError>;

    /// Applies `changes` and bumps `updated_at`. `None` if the user is gone.
    async fn update_user(
        &self,
        id: Uuid,
        changes: UserChanges,
    ) -> Result<Option<UserRecord>, StoreError>;

    /// Courses the user is enrolled in, in enrollment order.
    async fn user_courses(&self, user_id: Uuid) -> Result<Vec<Course>, StoreError>;

    /// Adds `course_id` to the user's enrollment set and bumps the user's
    /// `updated_at`, atomically.
    ///
    /// An existing enrollment is left as is and `Ok(false)` is returned;
    /// a user is never enrolled in the same course twice.
    async fn enroll(&self, user_id: Uuid, course_id: Uuid) -> Result<bool, StoreError>;

    async fn insert_course(&self, course: CreateCourseDto) -> Result<Course, StoreError>;

    async fn find_course(&self, id: Uuid) -> Result<Option<Course>, StoreError>;

    /// All courses, oldest first.
    async fn list_courses(&self) -> Result<Vec<Course>, StoreError>;

    async fn update_course(
        &self,
        id: Uuid,
        changes: UpdateCourseDto,
    ) -> Result<Option<Course>, StoreError>;
}
