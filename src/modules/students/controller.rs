use axum::{Extension, Json, extract::State};
use kampus_core::AppError;
use kampus_models::{CurrentUser, EnrollmentView};
use tracing::instrument;

use super::model::GpaSummary;
use super::service::StudentService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;

fn student_id(current: &CurrentUser) -> Result<uuid::Uuid, AppError> {
    current
        .user_id()
        .ok_or_else(|| AppError::unauthorized("Authentication required".to_string()))
}

/// Enrollments of the calling student
#[utoipa::path(
    get,
    path = "/api/students/me/enrollments",
    responses(
        (status = 200, description = "Enrollments with formatted grades", body = [EnrollmentView]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - students only", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state, current), fields(user = %current.identity()))]
pub async fn get_my_enrollments(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Vec<EnrollmentView>>, AppError> {
    let records = StudentService::enrollments(state.directory.as_ref(), student_id(&current)?).await?;
    Ok(Json(records.iter().map(EnrollmentView::from).collect()))
}

/// GPA of the calling student
#[utoipa::path(
    get,
    path = "/api/students/me/gpa",
    responses(
        (status = 200, description = "Weighted GPA over completed enrollments", body = GpaSummary),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - students only", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state, current), fields(user = %current.identity()))]
pub async fn get_my_gpa(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<GpaSummary>, AppError> {
    let summary = StudentService::gpa(state.directory.as_ref(), student_id(&current)?).await?;
    Ok(Json(summary))
}
