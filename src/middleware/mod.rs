//! Request middleware and extractors.
//!
//! Layer order on the application router, outermost first:
//!
//! 1. [`security_headers`]: response hardening headers
//! 2. [`role::annotate_role`]: attaches the resolved role to the request
//! 3. [`api_logging`]: request and response lines for API paths
//! 4. per route group, one of the role gates in [`role`]
//!
//! [`auth`] turns a bearer token into a principal.

pub mod api_logging;
pub mod auth;
pub mod role;
pub mod security_headers;

pub use security_headers::security_headers;
