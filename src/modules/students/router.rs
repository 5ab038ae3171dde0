use axum::{Router, routing::get};

use super::controller::{get_my_enrollments, get_my_gpa};
use crate::state::AppState;

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/me/enrollments", get(get_my_enrollments))
        .route("/me/gpa", get(get_my_gpa))
}
