//! # Kampus Auth
//!
//! Authentication types and JWT utilities for the Kampus API.
//!
//! - [`claims`]: access token claim structure
//! - [`jwt`]: token creation and verification
//!
//! Access tokens identify the principal (user id, email) and carry the staff
//! flag. The user's school role is deliberately *not* embedded in the token:
//! it is resolved per request from the user's profile, so a role change takes
//! effect immediately.
//!
//! # Example
//!
//! ```ignore
//! use kampus_auth::{create_access_token, verify_token};
//! use kampus_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "teacher@kampus.edu", false, &config)?;
//! let claims = verify_token(&token, &config)?;
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
