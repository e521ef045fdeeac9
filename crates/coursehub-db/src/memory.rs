//! In-process [`Repository`] backed by hash maps behind a single lock.
//!
//! Holding one write lock per mutation gives each operation the same
//! atomicity the Postgres store gets from its constraints and transactions.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use coursehub_models::{
    Course, CreateCourseDto, NewUser, UpdateCourseDto, UserChanges, UserRecord,
};

use crate::error::StoreError;
use crate::repository::Repository;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, UserRecord>,
    courses: HashMap<Uuid, Course>,
    /// `(user_id, course_id)` pairs in enrollment order.
    enrollments: Vec<(Uuid, Uuid)>,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        let mut users: Vec<UserRecord> = self.tables.read().await.users.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn insert_user(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&user.email, None) {
            return Err(StoreError::UniqueViolation("email"));
        }

        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            is_adm: user.is_adm,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_user(
        &self,
        id: Uuid,
        changes: UserChanges,
    ) -> Result<Option<UserRecord>, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &changes.email
            && tables.email_taken(email, Some(id))
        {
            return Err(StoreError::UniqueViolation("email"));
        }

        let Some(record) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(first_name) = changes.first_name {
            record.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            record.last_name = last_name;
        }
        if let Some(email) = changes.email {
            record.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            record.password_hash = password_hash;
        }
        record.updated_at = Utc::now();

        Ok(Some(record.clone()))
    }

    async fn user_courses(&self, user_id: Uuid) -> Result<Vec<Course>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .enrollments
            .iter()
            .filter(|(user, _)| *user == user_id)
            .filter_map(|(_, course)| tables.courses.get(course).cloned())
            .collect())
    }

    async fn enroll(&self, user_id: Uuid, course_id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.enrollments.contains(&(user_id, course_id)) {
            return Ok(false);
        }

        tables.enrollments.push((user_id, course_id));
        if let Some(user) = tables.users.get_mut(&user_id) {
            user.updated_at = Utc::now();
        }
        Ok(true)
    }

    async fn insert_course(&self, course: CreateCourseDto) -> Result<Course, StoreError> {
        let now = Utc::now();
        let course = Course {
            id: Uuid::new_v4(),
            course_name: course.course_name,
            duration: course.duration,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .write()
            .await
            .courses
            .insert(course.id, course.clone());
        Ok(course)
    }

    async fn find_course(&self, id: Uuid) -> Result<Option<Course>, StoreError> {
        Ok(self.tables.read().await.courses.get(&id).cloned())
    }

    async fn list_courses(&self) -> Result<Vec<Course>, StoreError> {
        let mut courses: Vec<Course> = self.tables.read().await.courses.values().cloned().collect();
        courses.sort_by_key(|c| c.created_at);
        Ok(courses)
    }

    async fn update_course(
        &self,
        id: Uuid,
        changes: UpdateCourseDto,
    ) -> Result<Option<Course>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(course) = tables.courses.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(course_name) = changes.course_name {
            course.course_name = course_name;
        }
        if let Some(duration) = changes.duration {
            course.duration = duration;
        }
        course.updated_at = Utc::now();

        Ok(Some(course.clone()))
    }
}
