//! Data-access port used by the HTTP layer.
//!
//! [`Directory`] is the only way request handling reads users, profiles and
//! enrollments. Adapters: [`crate::PgDirectory`] for Postgres and
//! [`crate::InMemoryDirectory`] for tests and demo mode.

use async_trait::async_trait;
use kampus_core::LetterGrade;
use kampus_models::{
    EnrollmentRecord, TeacherGroup, User, UserCredentials, UserProfile, UserType,
};
use uuid::Uuid;

/// Errors raised by directory adapters.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// The backing store could not be reached.
    #[error("directory connection failed: {message}")]
    Connection { message: String },
    /// A query or mutation failed during execution.
    #[error("directory query failed: {message}")]
    Query { message: String },
    /// A stored value could not be mapped onto the domain model.
    #[error("directory returned invalid data: {message}")]
    Decode { message: String },
}

impl From<sqlx::Error> for DirectoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DirectoryError::Connection {
                    message: err.to_string(),
                }
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => DirectoryError::Decode {
                message: err.to_string(),
            },
            other => DirectoryError::Query {
                message: other.to_string(),
            },
        }
    }
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
}

#[async_trait]
pub trait Directory: Send + Sync {
    /// Look up login credentials by email.
    async fn find_credentials(&self, email: &str)
    -> Result<Option<UserCredentials>, DirectoryError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DirectoryError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DirectoryError>;

    async fn list_users(&self) -> Result<Vec<User>, DirectoryError>;

    async fn create_user(&self, user: NewUser) -> Result<User, DirectoryError>;

    /// The user's profile, or `None` when the user has no profile attached.
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, DirectoryError>;

    /// Attach, replace (`Some`) or remove (`None`) the user's profile.
    async fn set_user_type(
        &self,
        user_id: Uuid,
        user_type: Option<UserType>,
    ) -> Result<(), DirectoryError>;

    async fn enrollments_for_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<EnrollmentRecord>, DirectoryError>;

    async fn groups_for_teacher(&self, teacher_id: Uuid)
    -> Result<Vec<TeacherGroup>, DirectoryError>;

    async fn find_enrollment(&self, id: Uuid) -> Result<Option<EnrollmentRecord>, DirectoryError>;

    /// Store a final grade and mark the enrollment completed.
    ///
    /// Returns the updated record, or `None` if the enrollment does not exist.
    async fn record_grade(
        &self,
        enrollment_id: Uuid,
        grade: LetterGrade,
        score: Option<f64>,
    ) -> Result<Option<EnrollmentRecord>, DirectoryError>;
}
