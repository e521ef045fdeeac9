pub use coursehub_models::{LoginRequest, LoginResponse};
