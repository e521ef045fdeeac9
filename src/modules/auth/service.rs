use tracing::{debug, info, instrument};

use coursehub_auth::TokenService;
use coursehub_core::{AppError, verify_password};
use coursehub_db::Repository;

use super::model::{LoginRequest, LoginResponse};

/// Shared by the unknown-email and wrong-password paths so the two are
/// indistinguishable to the caller.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub struct AuthService;

impl AuthService {
    #[instrument(skip(repo, tokens, dto), fields(user.email = %dto.email))]
    pub async fn login_user(
        repo: &dyn Repository,
        tokens: &TokenService,
        dto: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let Some(user) = repo.find_user_by_email(&dto.email).await? else {
            debug!("Login attempt for unknown email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&dto.password, &user.password_hash)? {
            debug!(user.id = %user.id, "Login attempt with wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let token = tokens.issue(user.id)?;
        info!(user.id = %user.id, "User logged in");

        Ok(LoginResponse { token })
    }
}
