use axum::{
    Extension, Json,
    extract::{Path, State},
};
use kampus_core::AppError;
use kampus_models::{CurrentUser, RecordGradeDto};
use tracing::instrument;
use uuid::Uuid;

use super::model::{GradeResponse, TranscriptResponse};
use super::service::GradeService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Record a final grade and notify the student
#[utoipa::path(
    put,
    path = "/api/grades/{enrollment_id}",
    params(
        ("enrollment_id" = Uuid, Path, description = "Enrollment ID")
    ),
    request_body = RecordGradeDto,
    responses(
        (status = 200, description = "Grade recorded", body = GradeResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - teachers of the group or admins only", body = ErrorResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse),
        (status = 422, description = "Invalid grade or score", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Grades"
)]
#[instrument(skip(state, current, dto))]
pub async fn record_grade(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(enrollment_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<RecordGradeDto>,
) -> Result<Json<GradeResponse>, AppError> {
    let response = GradeService::record_grade(&state, &current, enrollment_id, dto).await?;
    Ok(Json(response))
}

/// Transcript of a student with GPA
#[utoipa::path(
    get,
    path = "/api/grades/students/{student_id}/transcript",
    params(
        ("student_id" = Uuid, Path, description = "Student user ID")
    ),
    responses(
        (status = 200, description = "Transcript", body = TranscriptResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - teachers or admins only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Grades"
)]
#[instrument(skip(state))]
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<TranscriptResponse>, AppError> {
    let transcript = GradeService::transcript(&state, student_id).await?;
    Ok(Json(transcript))
}
