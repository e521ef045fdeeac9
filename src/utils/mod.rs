//! Shared utilities.
//!
//! - [`email`]: SMTP notifications

pub mod email;
