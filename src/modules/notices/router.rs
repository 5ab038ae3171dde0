use axum::{Router, routing::get};

use super::controller::get_notices;
use crate::state::AppState;

pub fn init_notices_router() -> Router<AppState> {
    Router::new().route("/notices", get(get_notices))
}
