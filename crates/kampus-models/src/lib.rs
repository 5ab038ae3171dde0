//! # Kampus Models
//!
//! Domain models and DTOs for the Kampus API.
//!
//! # Modules
//!
//! - [`users`]: users, profiles, principals and the resolved [`Role`]
//! - [`academics`]: courses, course groups and enrollments
//! - [`notices`]: user-facing notices queued for the next page
//!
//! # Example
//!
//! ```ignore
//! use kampus_models::users::{Role, UserType};
//!
//! let role = Role::from_profile(false, Some(UserType::Teacher));
//! assert_eq!(role.user_type(), Some("teacher"));
//! ```

pub mod academics;
pub mod notices;
pub mod users;

// Re-export commonly used types at crate root for convenience
pub use academics::{
    Course, CourseGroup, EnrollmentRecord, EnrollmentStatus, EnrollmentView, RecordGradeDto,
    TeacherGroup,
};
pub use notices::{Notice, NoticeLevel};
pub use users::{CurrentUser, Principal, Role, User, UserCredentials, UserProfile, UserType};
