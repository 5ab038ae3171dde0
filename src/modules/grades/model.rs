use kampus_models::EnrollmentView;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct GradeResponse {
    pub enrollment: EnrollmentView,
    /// Whether the student was emailed about the grade.
    pub notified: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TranscriptResponse {
    pub student_id: Uuid,
    pub student_name: String,
    pub enrollments: Vec<EnrollmentView>,
    pub gpa: f64,
    pub completed_credits: f64,
}
