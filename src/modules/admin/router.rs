use axum::{Router, routing::get};

use super::controller::list_users;
use crate::state::AppState;

pub fn init_admin_router() -> Router<AppState> {
    Router::new().route("/users", get(list_users))
}
