//! PostgreSQL-backed [`Repository`].
//!
//! The schema lives in the workspace `migrations/` directory. Email
//! uniqueness and the enrollment set are enforced by constraints
//! (`users.email UNIQUE`, `user_courses PRIMARY KEY (user_id, course_id)`),
//! so concurrent writers cannot break either invariant.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, instrument};
use uuid::Uuid;

use coursehub_models::{
    Course, CreateCourseDto, NewUser, UpdateCourseDto, UserChanges, UserRecord,
};

use crate::error::StoreError;
use crate::repository::Repository;

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, password_hash, is_adm, created_at, updated_at";
const COURSE_COLUMNS: &str = "id, course_name, duration, created_at, updated_at";

/// Opens a PostgreSQL connection pool for `database_url`.
///
/// # Errors
///
/// Returns the SQLx error if the database cannot be reached.
pub async fn init_db_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

fn email_conflict(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return StoreError::UniqueViolation("email");
    }
    StoreError::Database(e)
}

#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PgRepository {
    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "users"))]
    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "users"))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "users"))]
    async fn list_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        let users = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    #[instrument(skip(self, user), fields(user.email = %user.email, db.operation = "INSERT", db.table = "users"))]
    async fn insert_user(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let now = Utc::now();
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users (id, first_name, last_name, email, password_hash, is_adm, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_adm)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(email_conflict)?;

        debug!(user.id = %record.id, "User row inserted");
        Ok(record)
    }

    #[instrument(skip(self, changes), fields(db.operation = "UPDATE", db.table = "users"))]
    async fn update_user(
        &self,
        id: Uuid,
        changes: UserChanges,
    ) -> Result<Option<UserRecord>, StoreError> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                password_hash = COALESCE($5, password_hash),
                updated_at = $6
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.email)
        .bind(changes.password_hash)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(email_conflict)?;

        Ok(record)
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "user_courses"))]
    async fn user_courses(&self, user_id: Uuid) -> Result<Vec<Course>, StoreError> {
        let courses = sqlx::query_as::<_, Course>(
            "SELECT c.id, c.course_name, c.duration, c.created_at, c.updated_at
             FROM user_courses uc
             JOIN courses c ON c.id = uc.course_id
             WHERE uc.user_id = $1
             ORDER BY uc.position ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    #[instrument(skip(self), fields(db.operation = "INSERT", db.table = "user_courses"))]
    async fn enroll(&self, user_id: Uuid, course_id: Uuid) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO user_courses (user_id, course_id) VALUES ($1, $2)
             ON CONFLICT (user_id, course_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(course_id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            == 1;

        if inserted {
            sqlx::query("UPDATE users SET updated_at = $2 WHERE id = $1")
                .bind(user_id)
                .bind(Utc::now())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        debug!(inserted, "Enrollment stored");
        Ok(inserted)
    }

    #[instrument(skip(self, course), fields(course.name = %course.course_name, db.operation = "INSERT", db.table = "courses"))]
    async fn insert_course(&self, course: CreateCourseDto) -> Result<Course, StoreError> {
        let now = Utc::now();
        let course = sqlx::query_as::<_, Course>(&format!(
            "INSERT INTO courses (id, course_name, duration, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $4)
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&course.course_name)
        .bind(&course.duration)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(course)
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "courses"))]
    async fn find_course(&self, id: Uuid) -> Result<Option<Course>, StoreError> {
        let course = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "courses"))]
    async fn list_courses(&self) -> Result<Vec<Course>, StoreError> {
        let courses = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    #[instrument(skip(self, changes), fields(db.operation = "UPDATE", db.table = "courses"))]
    async fn update_course(
        &self,
        id: Uuid,
        changes: UpdateCourseDto,
    ) -> Result<Option<Course>, StoreError> {
        let course = sqlx::query_as::<_, Course>(&format!(
            "UPDATE courses SET
                course_name = COALESCE($2, course_name),
                duration = COALESCE($3, duration),
                updated_at = $4
             WHERE id = $1
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.course_name)
        .bind(changes.duration)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }
}
