//! Access token signing.
//!
//! - `JWT_SECRET`: HMAC secret; the development fallback must not reach production
//! - `JWT_ACCESS_EXPIRY`: token lifetime in seconds (default one hour)

use std::env;

const DEV_SECRET: &str = "kampus-dev-secret-change-me";
const DEFAULT_EXPIRY_SECS: i64 = 3600;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET is not set, signing tokens with the development secret");
            DEV_SECRET.to_string()
        });
        let access_token_expiry = env::var("JWT_ACCESS_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|secs: &i64| *secs > 0)
            .unwrap_or(DEFAULT_EXPIRY_SECS);

        Self {
            secret,
            access_token_expiry,
        }
    }
}
