use kampus_core::grading::{calculate_gpa, completed_credits};
use kampus_core::AppError;
use kampus_db::Directory;
use kampus_models::EnrollmentRecord;
use tracing::instrument;
use uuid::Uuid;

use super::model::GpaSummary;

pub struct StudentService;

impl StudentService {
    #[instrument(skip(directory))]
    pub async fn enrollments(
        directory: &dyn Directory,
        student_id: Uuid,
    ) -> Result<Vec<EnrollmentRecord>, AppError> {
        Ok(directory.enrollments_for_student(student_id).await?)
    }

    pub fn summarize(records: &[EnrollmentRecord]) -> GpaSummary {
        GpaSummary {
            gpa: calculate_gpa(records),
            completed_credits: completed_credits(records),
        }
    }

    #[instrument(skip(directory))]
    pub async fn gpa(directory: &dyn Directory, student_id: Uuid) -> Result<GpaSummary, AppError> {
        let records = Self::enrollments(directory, student_id).await?;
        Ok(Self::summarize(&records))
    }
}
