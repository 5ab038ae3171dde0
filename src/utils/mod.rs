//! Shared utilities.
//!
//! - [`email`]: templated email dispatch
//! - [`notices`]: per-user notice queue

pub mod email;
pub mod notices;
