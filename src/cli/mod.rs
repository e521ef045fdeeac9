//! Administrative commands run outside the HTTP server.

use anyhow::{Context, anyhow};
use validator::Validate;

use coursehub_db::Repository;

use crate::modules::users::model::{CreateUserDto, User};
use crate::modules::users::service::UserService;

/// Registers an administrator. The API never grants `isAdm` after creation,
/// so this is the supported way to bootstrap the first admin.
pub async fn create_admin(
    repo: &dyn Repository,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<User> {
    let dto = CreateUserDto {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        is_adm: true,
    };

    dto.validate().context("Invalid admin details")?;

    UserService::create_user(repo, dto)
        .await
        .map_err(|e| anyhow!("{}", e.error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursehub_db::MemoryRepository;

    #[tokio::test]
    async fn test_create_admin_sets_flag() {
        let repo = MemoryRepository::new();
        let user = create_admin(&repo, "Root", "Admin", "root@test.com", "password123")
            .await
            .unwrap();

        assert!(user.is_adm);
        assert!(user.courses.is_empty());
    }

    #[tokio::test]
    async fn test_create_admin_duplicate_email() {
        let repo = MemoryRepository::new();
        create_admin(&repo, "Root", "Admin", "root@test.com", "password123")
            .await
            .unwrap();

        let err = create_admin(&repo, "Other", "Admin", "root@test.com", "password123")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User already exists.");
    }

    #[tokio::test]
    async fn test_create_admin_rejects_short_password() {
        let repo = MemoryRepository::new();
        let result = create_admin(&repo, "Root", "Admin", "root@test.com", "short").await;
        assert!(result.is_err());
    }
}
