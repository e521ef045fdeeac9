//! # Coursehub Core
//!
//! Core types, errors, and utilities for the Coursehub API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: bcrypt password hashing and verification
//! - [`access`]: Ownership and admin rules for every protected operation
//!
//! # Example
//!
//! ```ignore
//! use coursehub_core::access::{Operation, Requester, authorize};
//! use coursehub_core::password::{hash_password, verify_password};
//!
//! let hash = hash_password("secure_password")?;
//! assert!(verify_password("secure_password", &hash)?);
//!
//! let requester = Requester { id: user_id, is_adm: false };
//! authorize(&requester, Operation::ViewUser(user_id))?;
//! ```

pub mod access;
pub mod errors;
pub mod password;

// Re-export commonly used types at crate root
pub use access::{Denial, Operation, Requester, authorize};
pub use errors::AppError;
pub use password::{hash_password, verify_password};
