use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::users::controller::{
    create_user, get_user, get_users, subscribe_course, update_user,
};
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users).post(create_user))
        .route("/{id}", get(get_user).patch(update_user))
        .route("/{id}/courses", post(subscribe_course))
}
