//! In-memory [`Directory`] used by the test suite and by demo mode.
//!
//! Profiles are kept as raw strings, the way the database stores them, so a
//! corrupted `user_type` surfaces as a [`DirectoryError::Decode`] just like it
//! would from Postgres. [`InMemoryDirectory::set_available`] simulates an
//! unreachable store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use kampus_core::{LetterGrade, semester_label};
use kampus_models::{
    Course, CourseGroup, EnrollmentRecord, EnrollmentStatus, TeacherGroup, User, UserCredentials,
    UserProfile, UserType,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::directory::{Directory, DirectoryError, NewUser};

#[derive(Debug, Clone)]
struct StoredEnrollment {
    id: Uuid,
    student_id: Uuid,
    group_id: Uuid,
    grade: Option<String>,
    score: Option<f64>,
    status: EnrollmentStatus,
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    password_hashes: HashMap<Uuid, String>,
    profiles: HashMap<Uuid, String>,
    courses: HashMap<Uuid, Course>,
    groups: HashMap<Uuid, CourseGroup>,
    enrollments: HashMap<Uuid, StoredEnrollment>,
}

impl Tables {
    fn record(&self, enrollment: &StoredEnrollment) -> Result<EnrollmentRecord, DirectoryError> {
        let group = self
            .groups
            .get(&enrollment.group_id)
            .ok_or_else(|| DirectoryError::Query {
                message: format!("course group {} not found", enrollment.group_id),
            })?;
        let course = self
            .courses
            .get(&group.course_id)
            .ok_or_else(|| DirectoryError::Query {
                message: format!("course {} not found", group.course_id),
            })?;

        Ok(EnrollmentRecord {
            enrollment_id: enrollment.id,
            student_id: enrollment.student_id,
            group_id: group.id,
            teacher_id: group.teacher_id,
            course_code: course.code.clone(),
            course_name: course.name.clone(),
            credits: course.credits,
            semester: group.semester.clone(),
            year: group.year,
            grade: enrollment.grade.clone(),
            score: enrollment.score,
            status: enrollment.status,
        })
    }
}

#[derive(Debug)]
pub struct InMemoryDirectory {
    tables: RwLock<Tables>,
    available: AtomicBool,
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Make every subsequent call fail with [`DirectoryError::Connection`] (`false`)
    /// or succeed again (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), DirectoryError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DirectoryError::Connection {
                message: "in-memory directory marked unavailable".to_string(),
            })
        }
    }

    /// Store a profile value verbatim, bypassing [`UserType`] validation.
    pub async fn set_raw_user_type(&self, user_id: Uuid, raw: &str) {
        self.tables
            .write()
            .await
            .profiles
            .insert(user_id, raw.to_string());
    }

    /// Change a stored account's staff flag. Returns `false` for an unknown user.
    pub async fn set_staff(&self, user_id: Uuid, is_staff: bool) -> bool {
        self.update_user(user_id, |user| user.is_staff = is_staff).await
    }

    /// Activate or deactivate a stored account. Returns `false` for an unknown user.
    pub async fn set_active(&self, user_id: Uuid, is_active: bool) -> bool {
        self.update_user(user_id, |user| user.is_active = is_active).await
    }

    async fn update_user(&self, user_id: Uuid, change: impl FnOnce(&mut User)) -> bool {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.get_mut(&user_id) else {
            return false;
        };
        change(user);
        user.updated_at = Utc::now();
        true
    }

    pub async fn add_course(&self, code: &str, name: &str, credits: i32) -> Course {
        let course = Course {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: name.to_string(),
            credits,
        };
        self.tables
            .write()
            .await
            .courses
            .insert(course.id, course.clone());
        course
    }

    pub async fn add_group(
        &self,
        course_id: Uuid,
        teacher_id: Option<Uuid>,
        semester: &str,
        year: i32,
    ) -> CourseGroup {
        let group = CourseGroup {
            id: Uuid::new_v4(),
            course_id,
            teacher_id,
            name: "A".to_string(),
            semester: semester.to_string(),
            year,
        };
        self.tables
            .write()
            .await
            .groups
            .insert(group.id, group.clone());
        group
    }

    /// Enroll a student and return the enrollment id.
    pub async fn enroll(
        &self,
        student_id: Uuid,
        group_id: Uuid,
        grade: Option<&str>,
        status: EnrollmentStatus,
    ) -> Uuid {
        let enrollment = StoredEnrollment {
            id: Uuid::new_v4(),
            student_id,
            group_id,
            grade: grade.map(str::to_string),
            score: None,
            status,
        };
        let id = enrollment.id;
        self.tables.write().await.enrollments.insert(id, enrollment);
        id
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, DirectoryError> {
        self.ensure_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email == email)
            .and_then(|user| {
                tables
                    .password_hashes
                    .get(&user.id)
                    .map(|hash| UserCredentials {
                        id: user.id,
                        email: user.email.clone(),
                        password_hash: hash.clone(),
                        is_staff: user.is_staff,
                        is_active: user.is_active,
                    })
            }))
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DirectoryError> {
        self.ensure_available()?;
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DirectoryError> {
        self.ensure_available()?;
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, DirectoryError> {
        self.ensure_available()?;
        let mut users: Vec<User> = self.tables.read().await.users.values().cloned().collect();
        users.sort_by(|a, b| {
            (a.last_name.as_str(), a.first_name.as_str())
                .cmp(&(b.last_name.as_str(), b.first_name.as_str()))
        });
        Ok(users)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DirectoryError> {
        self.ensure_available()?;
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(DirectoryError::Query {
                message: format!("duplicate email: {}", user.email),
            });
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            is_staff: user.is_staff,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.password_hashes.insert(created.id, user.password_hash);
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, DirectoryError> {
        self.ensure_available()?;
        let tables = self.tables.read().await;
        let Some(raw) = tables.profiles.get(&user_id) else {
            return Ok(None);
        };
        let user_type = raw
            .parse::<UserType>()
            .map_err(|message| DirectoryError::Decode { message })?;
        Ok(Some(UserProfile { user_id, user_type }))
    }

    async fn set_user_type(
        &self,
        user_id: Uuid,
        user_type: Option<UserType>,
    ) -> Result<(), DirectoryError> {
        self.ensure_available()?;
        let mut tables = self.tables.write().await;
        match user_type {
            Some(user_type) => {
                tables.profiles.insert(user_id, user_type.as_str().to_string());
            }
            None => {
                tables.profiles.remove(&user_id);
            }
        }
        Ok(())
    }

    async fn enrollments_for_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<EnrollmentRecord>, DirectoryError> {
        self.ensure_available()?;
        let tables = self.tables.read().await;
        let mut records = tables
            .enrollments
            .values()
            .filter(|e| e.student_id == student_id)
            .map(|e| tables.record(e))
            .collect::<Result<Vec<_>, _>>()?;
        records.sort_by(|a, b| {
            (a.year, a.semester.as_str(), a.course_code.as_str())
                .cmp(&(b.year, b.semester.as_str(), b.course_code.as_str()))
        });
        Ok(records)
    }

    async fn groups_for_teacher(
        &self,
        teacher_id: Uuid,
    ) -> Result<Vec<TeacherGroup>, DirectoryError> {
        self.ensure_available()?;
        let tables = self.tables.read().await;
        let mut groups = Vec::new();
        for group in tables
            .groups
            .values()
            .filter(|g| g.teacher_id == Some(teacher_id))
        {
            let Some(course) = tables.courses.get(&group.course_id) else {
                continue;
            };
            let student_count = tables
                .enrollments
                .values()
                .filter(|e| e.group_id == group.id)
                .count();
            groups.push(TeacherGroup {
                group_id: group.id,
                group_name: group.name.clone(),
                course_code: course.code.clone(),
                course_name: course.name.clone(),
                credits: course.credits,
                semester: group.semester.clone(),
                semester_label: semester_label(&group.semester).to_string(),
                year: group.year,
                student_count: i64::try_from(student_count).unwrap_or(i64::MAX),
            });
        }
        groups.sort_by(|a, b| {
            b.year
                .cmp(&a.year)
                .then_with(|| a.semester.cmp(&b.semester))
                .then_with(|| a.course_code.cmp(&b.course_code))
        });
        Ok(groups)
    }

    async fn find_enrollment(&self, id: Uuid) -> Result<Option<EnrollmentRecord>, DirectoryError> {
        self.ensure_available()?;
        let tables = self.tables.read().await;
        tables
            .enrollments
            .get(&id)
            .map(|e| tables.record(e))
            .transpose()
    }

    async fn record_grade(
        &self,
        enrollment_id: Uuid,
        grade: LetterGrade,
        score: Option<f64>,
    ) -> Result<Option<EnrollmentRecord>, DirectoryError> {
        self.ensure_available()?;
        let mut tables = self.tables.write().await;
        let Some(enrollment) = tables.enrollments.get_mut(&enrollment_id) else {
            return Ok(None);
        };
        enrollment.grade = Some(grade.as_str().to_string());
        enrollment.score = score;
        enrollment.status = EnrollmentStatus::Completed;
        let updated = enrollment.clone();
        tables.record(&updated).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str, is_staff: bool) -> NewUser {
        NewUser {
            first_name: "Ada".to_string(),
            last_name: "Yılmaz".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            is_staff,
        }
    }

    #[tokio::test]
    async fn test_profile_lifecycle() {
        let directory = InMemoryDirectory::new();
        let user = directory.create_user(new_user("ada@kampus.edu", false)).await.unwrap();

        assert_eq!(directory.find_profile(user.id).await.unwrap(), None);

        directory.set_user_type(user.id, Some(UserType::Teacher)).await.unwrap();
        let profile = directory.find_profile(user.id).await.unwrap().unwrap();
        assert_eq!(profile.user_type, UserType::Teacher);

        directory.set_user_type(user.id, None).await.unwrap();
        assert_eq!(directory.find_profile(user.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_profile_is_decode_error() {
        let directory = InMemoryDirectory::new();
        let user = directory.create_user(new_user("bad@kampus.edu", false)).await.unwrap();
        directory.set_raw_user_type(user.id, "superuser").await;

        let err = directory.find_profile(user.id).await.unwrap_err();
        assert!(matches!(err, DirectoryError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_unavailable_directory() {
        let directory = InMemoryDirectory::new();
        directory.set_available(false);
        let err = directory.find_profile(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DirectoryError::Connection { .. }));
    }

    #[tokio::test]
    async fn test_account_flags() {
        let directory = InMemoryDirectory::new();
        let user = directory.create_user(new_user("staff@kampus.edu", true)).await.unwrap();

        assert!(directory.set_staff(user.id, false).await);
        assert!(directory.set_active(user.id, false).await);
        let stored = directory.find_user(user.id).await.unwrap().unwrap();
        assert!(!stored.is_staff);
        assert!(!stored.is_active);

        assert!(!directory.set_staff(Uuid::new_v4(), true).await);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let directory = InMemoryDirectory::new();
        directory.create_user(new_user("dup@kampus.edu", false)).await.unwrap();
        assert!(directory.create_user(new_user("dup@kampus.edu", true)).await.is_err());
    }

    #[tokio::test]
    async fn test_record_grade_completes_enrollment() {
        let directory = InMemoryDirectory::new();
        let teacher = directory.create_user(new_user("t@kampus.edu", false)).await.unwrap();
        let student = directory.create_user(new_user("s@kampus.edu", false)).await.unwrap();
        let course = directory.add_course("FIZ101", "Physics I", 4).await;
        let group = directory.add_group(course.id, Some(teacher.id), "spring", 2025).await;
        let enrollment_id = directory
            .enroll(student.id, group.id, None, EnrollmentStatus::Enrolled)
            .await;

        let record = directory
            .record_grade(enrollment_id, LetterGrade::BB, Some(76.0))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.grade.as_deref(), Some("BB"));
        assert_eq!(record.status, EnrollmentStatus::Completed);
        assert_eq!(record.credits, 4);

        let groups = directory.groups_for_teacher(teacher.id).await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].student_count, 1);
        assert_eq!(groups[0].semester_label, "Bahar");

        assert!(
            directory
                .record_grade(Uuid::new_v4(), LetterGrade::AA, None)
                .await
                .unwrap()
                .is_none()
        );
    }
}
