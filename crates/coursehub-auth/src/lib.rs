//! # Coursehub Auth
//!
//! Session tokens for the Coursehub API.
//!
//! - [`claims`]: The JWT claim set (`sub`, `iat`, `exp`)
//! - [`jwt`]: [`TokenService`], which issues and verifies tokens
//!
//! Tokens are stateless HS256 JWTs. The only identity they carry is the
//! subject user id; everything else about the user is loaded per request.
//!
//! # Example
//!
//! ```ignore
//! use coursehub_auth::TokenService;
//! use coursehub_config::JwtConfig;
//!
//! let tokens = TokenService::new(JwtConfig::from_env());
//! let token = tokens.issue(user_id)?;
//! assert_eq!(tokens.verify(&token)?, user_id);
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{TokenError, TokenService};
