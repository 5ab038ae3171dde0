use anyhow::anyhow;
use kampus_core::{AppError, LetterGrade, format_grade, semester_label};
use kampus_models::{CurrentUser, EnrollmentRecord, EnrollmentView, NoticeLevel, RecordGradeDto, Role};
use serde_json::json;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::model::{GradeResponse, TranscriptResponse};
use crate::modules::students::service::StudentService;
use crate::state::AppState;

pub struct GradeService;

impl GradeService {
    /// Teachers grade their own groups only; admins and staff grade any.
    fn may_grade(current: &CurrentUser, enrollment: &EnrollmentRecord) -> bool {
        current.role == Role::Admin
            || current.is_staff()
            || (enrollment.teacher_id.is_some() && enrollment.teacher_id == current.user_id())
    }

    #[instrument(skip(state, current, dto), fields(user = %current.identity()))]
    pub async fn record_grade(
        state: &AppState,
        current: &CurrentUser,
        enrollment_id: Uuid,
        dto: RecordGradeDto,
    ) -> Result<GradeResponse, AppError> {
        let grader_id = current
            .user_id()
            .ok_or_else(|| AppError::unauthorized("Authentication required".to_string()))?;

        let grade = dto
            .grade
            .parse::<LetterGrade>()
            .map_err(|_| AppError::unprocessable(anyhow!("Invalid grade: {}", dto.grade)))?;

        let existing = state
            .directory
            .find_enrollment(enrollment_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Enrollment not found")))?;

        if !Self::may_grade(current, &existing) {
            return Err(AppError::forbidden(
                "You can only grade students in groups you teach.".to_string(),
            ));
        }

        let record = state
            .directory
            .record_grade(enrollment_id, grade, dto.score)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Enrollment not found")))?;

        info!(enrollment_id = %enrollment_id, grade = %grade, "Grade recorded");

        let notified = Self::notify_student(state, &record).await;
        let (level, message) = if notified {
            (NoticeLevel::Success, format!("Grade {} recorded for {}.", grade, record.course_code))
        } else {
            (
                NoticeLevel::Warning,
                format!(
                    "Grade {} recorded for {}, but the student could not be emailed.",
                    grade, record.course_code
                ),
            )
        };
        state.notices.push(grader_id, level, message).await;

        Ok(GradeResponse {
            enrollment: EnrollmentView::from(&record),
            notified,
        })
    }

    /// Email the student about a stored grade.
    ///
    /// The grade is already committed here, so every failure is logged and
    /// reported as `false` instead of failing the request.
    async fn notify_student(state: &AppState, record: &EnrollmentRecord) -> bool {
        let student = match state.directory.find_user(record.student_id).await {
            Ok(Some(student)) => student,
            Ok(None) => {
                warn!(student_id = %record.student_id, "Graded student has no account, not emailing");
                return false;
            }
            Err(e) => {
                error!(student_id = %record.student_id, error = %e, "Failed to load graded student");
                return false;
            }
        };
        let summary = match StudentService::gpa(state.directory.as_ref(), student.id).await {
            Ok(summary) => summary,
            Err(e) => {
                error!(student_id = %student.id, error = %e, "Failed to compute GPA for grade email");
                return false;
            }
        };

        let context = json!({
            "student_name": student.full_name(),
            "course_code": record.course_code,
            "course_name": record.course_name,
            "semester": semester_label(&record.semester),
            "year": record.year,
            "grade": format_grade(record.grade.as_deref(), record.score),
            "gpa": format!("{:.2}", summary.gpa),
        });

        state
            .email
            .send_templated(
                &format!("Final grade posted: {}", record.course_code),
                "grade_posted",
                &context,
                &student.email,
            )
            .await
    }

    #[instrument(skip(state))]
    pub async fn transcript(
        state: &AppState,
        student_id: Uuid,
    ) -> Result<TranscriptResponse, AppError> {
        let student = state
            .directory
            .find_user(student_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))?;

        let records = StudentService::enrollments(state.directory.as_ref(), student_id).await?;
        let summary = StudentService::summarize(&records);

        Ok(TranscriptResponse {
            student_id,
            student_name: student.full_name(),
            enrollments: records.iter().map(EnrollmentView::from).collect(),
            gpa: summary.gpa,
            completed_credits: summary.completed_credits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kampus_models::{EnrollmentStatus, Principal};

    fn enrollment(teacher_id: Option<Uuid>) -> EnrollmentRecord {
        EnrollmentRecord {
            enrollment_id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            group_id: Uuid::new_v4(),
            teacher_id,
            course_code: "KIM102".to_string(),
            course_name: "Chemistry II".to_string(),
            credits: 3,
            semester: "spring".to_string(),
            year: 2026,
            grade: None,
            score: None,
            status: EnrollmentStatus::Enrolled,
        }
    }

    fn caller(role: Role, is_staff: bool) -> CurrentUser {
        CurrentUser {
            principal: Some(Principal {
                user_id: Uuid::new_v4(),
                email: "grader@kampus.edu".to_string(),
                is_staff,
            }),
            role,
        }
    }

    #[test]
    fn test_teacher_grades_own_group_only() {
        let teacher = caller(Role::Teacher, false);
        assert!(GradeService::may_grade(&teacher, &enrollment(teacher.user_id())));
        assert!(!GradeService::may_grade(&teacher, &enrollment(Some(Uuid::new_v4()))));
        assert!(!GradeService::may_grade(&teacher, &enrollment(None)));
    }

    #[test]
    fn test_admin_and_staff_grade_any_group() {
        let other = enrollment(Some(Uuid::new_v4()));
        assert!(GradeService::may_grade(&caller(Role::Admin, false), &other));
        assert!(GradeService::may_grade(&caller(Role::Unknown, true), &other));
    }
}
