use axum::{
    Router,
    routing::{get, patch},
};

use crate::modules::courses::controller::{create_course, get_courses, update_course};
use crate::state::AppState;

pub fn init_courses_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_courses).post(create_course))
        .route("/{id}", patch(update_course))
}
