use tracing::{info, instrument};
use uuid::Uuid;

use coursehub_core::AppError;
use coursehub_db::Repository;

use super::model::{Course, CreateCourseDto, UpdateCourseDto};

pub struct CourseService;

impl CourseService {
    #[instrument(skip(repo))]
    pub async fn create_course(
        repo: &dyn Repository,
        dto: CreateCourseDto,
    ) -> Result<Course, AppError> {
        let course = repo.insert_course(dto).await?;
        info!(course.id = %course.id, "Course created");
        Ok(course)
    }

    #[instrument(skip(repo))]
    pub async fn get_courses(repo: &dyn Repository) -> Result<Vec<Course>, AppError> {
        Ok(repo.list_courses().await?)
    }

    #[instrument(skip(repo))]
    pub async fn update_course(
        repo: &dyn Repository,
        id: Uuid,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        repo.update_course(id, dto)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found"))
    }
}
