//! Feature modules.
//!
//! Each module has a `controller.rs` (handlers), a `router.rs` and, where the
//! handlers need more than a directory call, `service.rs` and `model.rs`.

pub mod admin;
pub mod auth;
pub mod grades;
pub mod me;
pub mod notices;
pub mod students;
pub mod teachers;
