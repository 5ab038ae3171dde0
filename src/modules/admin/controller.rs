use axum::{Json, extract::State};
use kampus_core::AppError;
use tracing::instrument;

use super::model::UserWithRole;
use crate::middleware::role::resolve_role;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;

/// All users with their resolved roles
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "Users with resolved roles", body = [UserWithRole]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admins only", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserWithRole>>, AppError> {
    let users = state.directory.list_users().await?;

    let mut result = Vec::with_capacity(users.len());
    for user in users {
        let role = resolve_role(state.directory.as_ref(), Some(&user.principal())).await;
        result.push(UserWithRole { user, role });
    }
    Ok(Json(result))
}
