//! # Kampus Core
//!
//! Core types, errors, and utilities for the Kampus API.
//!
//! This crate provides foundational types used throughout the Kampus application:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: Password hashing and verification
//! - [`grading`]: Letter grade scale and GPA aggregation
//! - [`display`]: Formatting helpers for grades and semesters
//!
//! # Example
//!
//! ```ignore
//! use kampus_core::errors::AppError;
//! use kampus_core::grading::calculate_gpa;
//!
//! let error = AppError::forbidden("Students only".to_string());
//! let gpa = calculate_gpa(&enrollments);
//! ```

pub mod display;
pub mod errors;
pub mod grading;
pub mod password;

// Re-export commonly used types at crate root
pub use display::{format_grade, semester_label};
pub use errors::AppError;
pub use grading::{GradeRecord, LetterGrade, calculate_gpa};
pub use password::{hash_password, verify_password};
