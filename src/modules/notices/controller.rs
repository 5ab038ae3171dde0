use axum::{Json, extract::State};
use kampus_models::Notice;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;

/// Pending notices of the caller; returned notices are removed
#[utoipa::path(
    get,
    path = "/api/notices",
    responses(
        (status = 200, description = "Notices, oldest first", body = [Notice]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Notices"
)]
pub async fn get_notices(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Json<Vec<Notice>> {
    Json(state.notices.drain(principal.user_id).await)
}
