use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use coursehub_auth::TokenService;
use coursehub_config::{CorsConfig, EmailConfig, JwtConfig, ServerConfig};
use coursehub_db::{MemoryRepository, PgRepository, Repository, init_db_pool};

use crate::utils::email::EmailService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub tokens: TokenService,
    pub email: EmailService,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(
        repo: Arc<dyn Repository>,
        jwt_config: JwtConfig,
        email_config: EmailConfig,
        cors_config: CorsConfig,
    ) -> Self {
        Self {
            repo,
            tokens: TokenService::new(jwt_config),
            email: EmailService::new(email_config),
            cors_config,
        }
    }
}

/// Builds the state from the environment, connecting to Postgres and
/// applying migrations when `DATABASE_URL` is set.
pub async fn init_app_state(server_config: &ServerConfig) -> anyhow::Result<AppState> {
    let repo: Arc<dyn Repository> = match &server_config.database_url {
        Some(url) => {
            let pool = init_db_pool(url)
                .await
                .context("Failed to connect to database")?;
            sqlx::migrate!()
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            info!("Connected to PostgreSQL and applied migrations");
            Arc::new(PgRepository::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory storage; data is lost on restart");
            Arc::new(MemoryRepository::new())
        }
    };

    Ok(AppState::new(
        repo,
        JwtConfig::from_env(),
        EmailConfig::from_env(),
        CorsConfig::from_env(),
    ))
}
