use axum::{Router, routing::get};

use super::controller::get_my_groups;
use crate::state::AppState;

pub fn init_teachers_router() -> Router<AppState> {
    Router::new().route("/me/groups", get(get_my_groups))
}
