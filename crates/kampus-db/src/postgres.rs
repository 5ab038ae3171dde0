//! Postgres adapter for [`Directory`].

use async_trait::async_trait;
use kampus_core::{LetterGrade, semester_label};
use kampus_models::{
    EnrollmentRecord, EnrollmentStatus, TeacherGroup, User, UserCredentials, UserProfile,
    UserType,
};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::directory::{Directory, DirectoryError, NewUser};

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, is_staff, is_active, created_at, updated_at";

const ENROLLMENT_SELECT: &str = r#"
    SELECT e.id AS enrollment_id, e.student_id, e.group_id, g.teacher_id,
           c.code AS course_code, c.name AS course_name, c.credits,
           g.semester, g.year, e.grade, e.score, e.status
    FROM enrollments e
    JOIN course_groups g ON g.id = e.group_id
    JOIN courses c ON c.id = g.course_id
"#;

#[derive(FromRow)]
struct ProfileRow {
    user_id: Uuid,
    user_type: String,
}

impl TryFrom<ProfileRow> for UserProfile {
    type Error = DirectoryError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let user_type = row
            .user_type
            .parse::<UserType>()
            .map_err(|message| DirectoryError::Decode { message })?;
        Ok(UserProfile {
            user_id: row.user_id,
            user_type,
        })
    }
}

#[derive(FromRow)]
struct EnrollmentRow {
    enrollment_id: Uuid,
    student_id: Uuid,
    group_id: Uuid,
    teacher_id: Option<Uuid>,
    course_code: String,
    course_name: String,
    credits: i32,
    semester: String,
    year: i32,
    grade: Option<String>,
    score: Option<f64>,
    status: String,
}

impl TryFrom<EnrollmentRow> for EnrollmentRecord {
    type Error = DirectoryError;

    fn try_from(row: EnrollmentRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<EnrollmentStatus>()
            .map_err(|message| DirectoryError::Decode { message })?;
        Ok(EnrollmentRecord {
            enrollment_id: row.enrollment_id,
            student_id: row.student_id,
            group_id: row.group_id,
            teacher_id: row.teacher_id,
            course_code: row.course_code,
            course_name: row.course_name,
            credits: row.credits,
            semester: row.semester,
            year: row.year,
            grade: row.grade,
            score: row.score,
            status,
        })
    }
}

#[derive(FromRow)]
struct TeacherGroupRow {
    group_id: Uuid,
    group_name: String,
    course_code: String,
    course_name: String,
    credits: i32,
    semester: String,
    year: i32,
    student_count: i64,
}

impl From<TeacherGroupRow> for TeacherGroup {
    fn from(row: TeacherGroupRow) -> Self {
        TeacherGroup {
            semester_label: semester_label(&row.semester).to_string(),
            group_id: row.group_id,
            group_name: row.group_name,
            course_code: row.course_code,
            course_name: row.course_name,
            credits: row.credits,
            semester: row.semester,
            year: row.year,
            student_count: row.student_count,
        }
    }
}

/// [`Directory`] backed by a Postgres pool.
#[derive(Clone, Debug)]
pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Directory for PgDirectory {
    #[instrument(skip(self))]
    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, DirectoryError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, email, password_hash, is_staff, is_active FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(credentials)
    }

    #[instrument(skip(self))]
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DirectoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DirectoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<User>, DirectoryError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY last_name, first_name",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: NewUser) -> Result<User, DirectoryError> {
        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (first_name, last_name, email, password_hash, is_staff) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_staff)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, DirectoryError> {
        sqlx::query_as::<_, ProfileRow>(
            "SELECT user_id, user_type FROM user_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .map(UserProfile::try_from)
        .transpose()
    }

    #[instrument(skip(self))]
    async fn set_user_type(
        &self,
        user_id: Uuid,
        user_type: Option<UserType>,
    ) -> Result<(), DirectoryError> {
        match user_type {
            Some(user_type) => {
                sqlx::query(
                    "INSERT INTO user_profiles (user_id, user_type) VALUES ($1, $2) \
                     ON CONFLICT (user_id) DO UPDATE SET user_type = EXCLUDED.user_type",
                )
                .bind(user_id)
                .bind(user_type.as_str())
                .execute(&self.pool)
                .await?;
            }
            None => {
                sqlx::query("DELETE FROM user_profiles WHERE user_id = $1")
                    .bind(user_id)
                    .execute(&self.pool)
                    .await?;
            }
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn enrollments_for_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<EnrollmentRecord>, DirectoryError> {
        sqlx::query_as::<_, EnrollmentRow>(&format!(
            "{} WHERE e.student_id = $1 ORDER BY g.year, g.semester, c.code",
            ENROLLMENT_SELECT
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(EnrollmentRecord::try_from)
        .collect()
    }

    #[instrument(skip(self))]
    async fn groups_for_teacher(
        &self,
        teacher_id: Uuid,
    ) -> Result<Vec<TeacherGroup>, DirectoryError> {
        let rows = sqlx::query_as::<_, TeacherGroupRow>(
            r#"
            SELECT g.id AS group_id, g.name AS group_name, c.code AS course_code,
                   c.name AS course_name, c.credits, g.semester, g.year,
                   COUNT(e.id) AS student_count
            FROM course_groups g
            JOIN courses c ON c.id = g.course_id
            LEFT JOIN enrollments e ON e.group_id = g.id
            WHERE g.teacher_id = $1
            GROUP BY g.id, c.id
            ORDER BY g.year DESC, g.semester, c.code
            "#,
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(TeacherGroup::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_enrollment(&self, id: Uuid) -> Result<Option<EnrollmentRecord>, DirectoryError> {
        sqlx::query_as::<_, EnrollmentRow>(&format!("{} WHERE e.id = $1", ENROLLMENT_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(EnrollmentRecord::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn record_grade(
        &self,
        enrollment_id: Uuid,
        grade: LetterGrade,
        score: Option<f64>,
    ) -> Result<Option<EnrollmentRecord>, DirectoryError> {
        let updated = sqlx::query(
            "UPDATE enrollments SET grade = $2, score = $3, status = 'completed', \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(enrollment_id)
        .bind(grade.as_str())
        .bind(score)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_enrollment(enrollment_id).await
    }
}
