//! Course, course group and enrollment models.
//!
//! Credits live on the [`Course`]; an enrollment reaches them through its
//! group. [`EnrollmentRecord`] is the joined read model used for GPA and
//! transcripts.

use std::fmt;
use std::str::FromStr;

use kampus_core::grading::GradeRecord;
use kampus_core::{format_grade, semester_label};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub credits: i32,
}

/// A section of a course taught in one semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CourseGroup {
    pub id: Uuid,
    pub course_id: Uuid,
    pub teacher_id: Option<Uuid>,
    pub name: String,
    pub semester: String,
    pub year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Enrolled,
    Completed,
    Dropped,
    Failed,
}

impl EnrollmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EnrollmentStatus::Enrolled => "enrolled",
            EnrollmentStatus::Completed => "completed",
            EnrollmentStatus::Dropped => "dropped",
            EnrollmentStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enrolled" => Ok(EnrollmentStatus::Enrolled),
            "completed" => Ok(EnrollmentStatus::Completed),
            "dropped" => Ok(EnrollmentStatus::Dropped),
            "failed" => Ok(EnrollmentStatus::Failed),
            other => Err(format!("Invalid enrollment status: {}", other)),
        }
    }
}

/// An enrollment joined with its group and course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EnrollmentRecord {
    pub enrollment_id: Uuid,
    pub student_id: Uuid,
    pub group_id: Uuid,
    pub teacher_id: Option<Uuid>,
    pub course_code: String,
    pub course_name: String,
    pub credits: i32,
    pub semester: String,
    pub year: i32,
    /// Stored letter grade; may hold legacy values outside the letter scale.
    pub grade: Option<String>,
    pub score: Option<f64>,
    pub status: EnrollmentStatus,
}

impl GradeRecord for EnrollmentRecord {
    fn grade(&self) -> Option<&str> {
        self.grade.as_deref()
    }

    fn is_completed(&self) -> bool {
        self.status == EnrollmentStatus::Completed
    }

    fn credits(&self) -> f64 {
        f64::from(self.credits)
    }
}

/// Enrollment as shown to users, with display strings filled in.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EnrollmentView {
    pub enrollment_id: Uuid,
    pub course_code: String,
    pub course_name: String,
    pub credits: i32,
    pub semester: String,
    pub semester_label: String,
    pub year: i32,
    pub grade: Option<String>,
    pub score: Option<f64>,
    pub grade_display: String,
    pub status: EnrollmentStatus,
}

impl From<&EnrollmentRecord> for EnrollmentView {
    fn from(record: &EnrollmentRecord) -> Self {
        Self {
            enrollment_id: record.enrollment_id,
            course_code: record.course_code.clone(),
            course_name: record.course_name.clone(),
            credits: record.credits,
            semester: record.semester.clone(),
            semester_label: semester_label(&record.semester).to_string(),
            year: record.year,
            grade: record.grade.clone(),
            score: record.score,
            grade_display: format_grade(record.grade.as_deref(), record.score),
            status: record.status,
        }
    }
}

/// A group taught by a teacher, with its enrollment count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TeacherGroup {
    pub group_id: Uuid,
    pub group_name: String,
    pub course_code: String,
    pub course_name: String,
    pub credits: i32,
    pub semester: String,
    pub semester_label: String,
    pub year: i32,
    pub student_count: i64,
}

/// Request body for recording a grade.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RecordGradeDto {
    #[validate(length(equal = 2, message = "Grade must be a two-letter grade such as AA or CB"))]
    pub grade: String,
    #[validate(range(min = 0.0, max = 100.0, message = "Score must be between 0 and 100"))]
    pub score: Option<f64>,
}
