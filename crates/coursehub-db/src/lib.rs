//! # Coursehub DB
//!
//! Persistence for the Coursehub API.
//!
//! Services talk to storage only through the [`Repository`] trait. Two
//! implementations ship with the crate:
//!
//! - [`PgRepository`]: PostgreSQL via SQLx
//! - [`MemoryRepository`]: process-local maps, used by tests and by the
//!   server when no `DATABASE_URL` is configured
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use coursehub_db::{PgRepository, Repository, init_db_pool};
//!
//! let pool = init_db_pool(&database_url).await?;
//! let repo: Arc<dyn Repository> = Arc::new(PgRepository::new(pool));
//! ```

pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;

pub use error::StoreError;
pub use memory::MemoryRepository;
pub use postgres::{PgRepository, init_db_pool};
pub use repository::Repository;

// Re-export PgPool for convenience
pub use sqlx::PgPool;
