use axum::{Extension, Json, extract::State};
use kampus_core::AppError;
use kampus_models::{CurrentUser, TeacherGroup};
use tracing::instrument;

use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;

/// Course groups taught by the calling teacher
#[utoipa::path(
    get,
    path = "/api/teachers/me/groups",
    responses(
        (status = 200, description = "Groups with enrollment counts", body = [TeacherGroup]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - teachers only", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teachers"
)]
#[instrument(skip(state, current), fields(user = %current.identity()))]
pub async fn get_my_groups(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Vec<TeacherGroup>>, AppError> {
    let teacher_id = current
        .user_id()
        .ok_or_else(|| AppError::unauthorized("Authentication required".to_string()))?;
    let groups = state.directory.groups_for_teacher(teacher_id).await?;
    Ok(Json(groups))
}
