use axum::{
    Router,
    routing::{get, put},
};

use super::controller::{get_transcript, record_grade};
use crate::state::AppState;

pub fn init_grades_router() -> Router<AppState> {
    Router::new()
        .route("/{enrollment_id}", put(record_grade))
        .route("/students/{student_id}/transcript", get(get_transcript))
}
