//! Kampus Observability
//!
//! Subscriber setup for the `tracing` macros used across the workspace.
//!
//! - [`init_basic_console_logging`]: console output only.
//! - [`init_tracing`] (feature `file-logging`, default): console output plus
//!   daily-rolling JSON and error-only files under `LOG_DIR`.
//!
//! At runtime, file logging can be switched off with `FILE_LOGGING_ENABLED=false`.
//!
//! ```no_run
//! if kampus_observability::is_file_logging_enabled() {
//!     kampus_observability::init_tracing();
//! } else {
//!     kampus_observability::init_basic_console_logging();
//! }
//! ```

pub mod basic_logging;
#[cfg(feature = "file-logging")]
pub mod logging;

pub use basic_logging::init_basic_console_logging;
#[cfg(feature = "file-logging")]
pub use logging::init_tracing;

/// Whether file logging should be initialized.
///
/// Always `false` when the `file-logging` feature is not compiled in.
pub fn is_file_logging_enabled() -> bool {
    if !cfg!(feature = "file-logging") {
        return false;
    }
    dotenvy::dotenv().ok();
    std::env::var("FILE_LOGGING_ENABLED")
        .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "false" | "0" | "no"))
        .unwrap_or(true)
}

/// Falls back to console logging when the `file-logging` feature is disabled.
#[cfg(not(feature = "file-logging"))]
pub fn init_tracing() {
    init_basic_console_logging();
}

/// Log a security-relevant event at `warn` under the `security` target.
///
/// ```ignore
/// security_event!("access_denied", user = %email, gate = "admin_only");
/// ```
#[macro_export]
macro_rules! security_event {
    ($event:expr) => {
        tracing::warn!(target: "security", event = $event, "Security event")
    };
    ($event:expr, $($field:tt)*) => {
        tracing::warn!(target: "security", event = $event, $($field)*, "Security event")
    };
}
