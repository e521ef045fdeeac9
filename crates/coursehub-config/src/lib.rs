//! # Coursehub Config
//!
//! Configuration types for the Coursehub API, loaded from environment variables.
//!
//! - [`jwt`]: Token signing secret and lifetime
//! - [`cors`]: Allowed CORS origins
//! - [`email`]: SMTP settings for notification emails
//! - [`server`]: Listen address
//!
//! Each config is read once at start-up and passed around as an immutable value.
//!
//! # Example
//!
//! ```ignore
//! use coursehub_config::{CorsConfig, EmailConfig, JwtConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod email;
pub mod jwt;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use email::EmailConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;
