//! Request extractors for authentication and authorization.
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. [`auth::AuthUser`] verifies the JWT and loads the acting user
//! 3. Admin gates such as [`auth::RequireCourseCreate`] apply the access rule
//! 4. Handler executes if all checks pass
//!
//! Ownership rules need the path id, so handlers for those routes call
//! [`coursehub_core::authorize`] themselves.
//!
//! ```ignore
//! async fn create_course(
//!     RequireCourseCreate(auth_user): RequireCourseCreate,
//!     ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
//! ) -> impl IntoResponse {
//!     // Only executes for admins
//! }
//! ```

pub mod auth;
