use tracing::{debug, info, instrument};
use uuid::Uuid;

use coursehub_core::{AppError, Operation, Requester, authorize, hash_password};
use coursehub_db::{Repository, StoreError};

use super::model::{CreateUserDto, NewUser, UpdateUserDto, User, UserChanges, UserRecord};
use crate::modules::courses::model::Course;

const USER_EXISTS: &str = "User already exists.";
const USER_NOT_FOUND: &str = "User not found";
const COURSE_NOT_FOUND: &str = "Course not found";

fn email_conflict(err: StoreError) -> AppError {
    match err {
        StoreError::UniqueViolation(_) => AppError::conflict(USER_EXISTS),
        other => other.into(),
    }
}

/// Result of a subscribe call. `newly_enrolled` is false when the user
/// already held the course.
#[derive(Debug)]
pub struct Subscription {
    pub user: User,
    pub course: Course,
    pub newly_enrolled: bool,
}

pub struct UserService;

impl UserService {
    async fn with_courses(repo: &dyn Repository, record: UserRecord) -> Result<User, AppError> {
        let courses = repo.user_courses(record.id).await?;
        Ok(User::from_record(record, courses))
    }

    #[instrument(skip(repo, dto), fields(user.email = %dto.email))]
    pub async fn create_user(repo: &dyn Repository, dto: CreateUserDto) -> Result<User, AppError> {
        if repo.find_user_by_email(&dto.email).await?.is_some() {
            return Err(AppError::conflict(USER_EXISTS));
        }

        let password_hash = hash_password(&dto.password)?;
        let record = repo
            .insert_user(NewUser {
                first_name: dto.first_name,
                last_name: dto.last_name,
                email: dto.email,
                password_hash,
                is_adm: dto.is_adm,
            })
            .await
            .map_err(email_conflict)?;

        info!(user.id = %record.id, user.is_adm = record.is_adm, "User created");
        Ok(User::from_record(record, Vec::new()))
    }

    #[instrument(skip(repo))]
    pub async fn get_users(repo: &dyn Repository) -> Result<Vec<User>, AppError> {
        let records = repo.list_users().await?;
        let mut users = Vec::with_capacity(records.len());
        for record in records {
            users.push(Self::with_courses(repo, record).await?);
        }
        Ok(users)
    }

    #[instrument(skip(repo))]
    pub async fn get_user(repo: &dyn Repository, id: Uuid) -> Result<User, AppError> {
        let record = repo
            .find_user(id)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))?;

        Self::with_courses(repo, record).await
    }

    #[instrument(skip(repo, dto))]
    pub async fn update_user(
        repo: &dyn Repository,
        id: Uuid,
        dto: UpdateUserDto,
    ) -> Result<User, AppError> {
        if let Some(email) = &dto.email
            && let Some(existing) = repo.find_user_by_email(email).await?
            && existing.id != id
        {
            return Err(AppError::conflict(USER_EXISTS));
        }

        let password_hash = match &dto.password {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let changes = UserChanges {
            first_name: dto.first_name,
            last_name: dto.last_name,
            email: dto.email,
            password_hash,
        };

        let record = repo
            .update_user(id, changes)
            .await
            .map_err(email_conflict)?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))?;

        debug!(user.id = %record.id, "User updated");
        Self::with_courses(repo, record).await
    }

    /// Enrolls `target` in `course_id` on behalf of `requester`.
    ///
    /// The course is resolved before the ownership rule is applied, so an
    /// unknown course is a 404 even for a requester who would be refused.
    /// Enrolling an already enrolled course leaves the set unchanged.
    #[instrument(skip(repo), fields(requester.id = %requester.id))]
    pub async fn subscribe(
        repo: &dyn Repository,
        requester: &Requester,
        target: Uuid,
        course_id: Uuid,
    ) -> Result<Subscription, AppError> {
        let course = repo
            .find_course(course_id)
            .await?
            .ok_or_else(|| AppError::not_found(COURSE_NOT_FOUND))?;

        authorize(requester, Operation::SubscribeUser(target))?;

        let record = repo
            .find_user(target)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))?;

        let newly_enrolled = repo.enroll(record.id, course.id).await?;
        if newly_enrolled {
            info!(user.id = %record.id, course.id = %course.id, "User subscribed to course");
        } else {
            debug!(user.id = %record.id, course.id = %course.id, "User already subscribed");
        }

        // Re-read so `updatedAt` reflects the enrollment.
        let record = repo.find_user(record.id).await?.unwrap_or(record);
        let user = Self::with_courses(repo, record).await?;

        Ok(Subscription {
            user,
            course,
            newly_enrolled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursehub_db::MemoryRepository;
    use coursehub_models::CreateCourseDto;

    #[tokio::test]
    async fn test_subscribe_reports_new_enrollment_once() {
        let repo = MemoryRepository::new();
        let user = repo
            .insert_user(NewUser {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@test.com".to_string(),
                password_hash: "hash".to_string(),
                is_adm: false,
            })
            .await
            .unwrap();
        let course = repo
            .insert_course(CreateCourseDto {
                course_name: "Intro to Rust".to_string(),
                duration: "40h".to_string(),
            })
            .await
            .unwrap();
        let requester = Requester {
            id: user.id,
            is_adm: false,
        };

        let first = UserService::subscribe(&repo, &requester, user.id, course.id)
            .await
            .unwrap();
        let second = UserService::subscribe(&repo, &requester, user.id, course.id)
            .await
            .unwrap();

        assert!(first.newly_enrolled);
        assert!(!second.newly_enrolled);
        assert_eq!(second.user.courses.len(), 1);
    }
}
