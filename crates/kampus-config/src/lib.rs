//! # Kampus Config
//!
//! Configuration types for the Kampus API.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`jwt`]: JWT authentication configuration
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`email`]: Email/SMTP configuration
//! - [`http`]: Listener address and API path prefix
//!
//! # Example
//!
//! ```ignore
//! use kampus_config::{CorsConfig, EmailConfig, HttpConfig, JwtConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let http_config = HttpConfig::from_env();
//! ```

pub mod cors;
pub mod email;
pub mod http;
pub mod jwt;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use email::EmailConfig;
pub use http::HttpConfig;
pub use jwt::JwtConfig;
