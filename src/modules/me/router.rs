use axum::{Router, routing::get};

use super::controller::get_me;
use crate::state::AppState;

/// Merged at the API root, no gate: anonymous callers are answered too.
pub fn init_me_router() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}
