pub use coursehub_models::{Course, CreateCourseDto, UpdateCourseDto};
