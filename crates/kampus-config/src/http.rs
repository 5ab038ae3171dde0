//! Listener and routing configuration.
//!
//! - `BIND_ADDRESS`: socket address the server listens on (default `0.0.0.0:3000`)
//! - `API_PREFIX`: path prefix that marks API requests for request logging (default `/api/`)

use std::env;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpConfig {
    pub bind_address: String,
    pub api_prefix: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            api_prefix: "/api/".to_string(),
        }
    }
}

impl HttpConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            api_prefix: env::var("API_PREFIX")
                .ok()
                .filter(|p| p.starts_with('/'))
                .unwrap_or(defaults.api_prefix),
        }
    }

    pub fn is_api_path(&self, path: &str) -> bool {
        path.starts_with(&self.api_prefix)
    }
}
