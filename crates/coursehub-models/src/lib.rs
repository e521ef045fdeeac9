//! # Coursehub Models
//!
//! Domain models and DTOs for the Coursehub API.
//!
//! - [`users`]: User records, the public user representation, and user DTOs
//! - [`courses`]: Courses and course DTOs
//! - [`auth`]: Login request and response
//!
//! Wire formats use camelCase field names (`firstName`, `isAdm`,
//! `courseName`, `createdAt`).

pub mod auth;
pub mod courses;
pub mod users;

pub use auth::{LoginRequest, LoginResponse};
pub use courses::{Course, CreateCourseDto, UpdateCourseDto};
pub use users::{
    CreateUserDto, NewUser, SubscribeCourseDto, UpdateUserDto, User, UserChanges, UserRecord,
};
