//! Browser origins allowed to call the API.
//!
//! - `ALLOWED_ORIGINS`: comma-separated origin list (default: the local
//!   frontend dev servers on ports 3000 and 5173)

use std::env;

const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        let raw = env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ORIGINS.to_string());
        Self::from_list(&raw)
    }

    /// Blank entries are dropped.
    pub fn from_list(raw: &str) -> Self {
        Self {
            allowed_origins: raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_list_is_trimmed() {
        let config = CorsConfig::from_list(" https://kampus.edu.tr , ,http://localhost:5173");
        assert_eq!(
            config.allowed_origins,
            vec!["https://kampus.edu.tr", "http://localhost:5173"]
        );
    }
}
