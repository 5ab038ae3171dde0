use std::fs;

use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::basic_logging::init_basic_console_logging;

const DEFAULT_LOG_DIR: &str = "storage/logs";

/// Console plus rolling file subscriber.
///
/// Writes `kampus.json` (structured, `info` and up, one file per day) and
/// `kampus.log` (plain text, errors only) under `LOG_DIR`. If the directory
/// cannot be created, logging degrades to console only.
pub fn init_tracing() {
    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());

    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!(
            "⚠️  Failed to create log directory {}: {}. Falling back to console logging",
            log_dir, e
        );
        init_basic_console_logging();
        return;
    }

    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("kampus=info,kampus_db=info,security=info,tower_http=warn,hyper=info")
    });

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(console_filter);

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "kampus.log");

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_filter(EnvFilter::new("error"));

    // JSON file for structured ingestion
    let json_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "kampus.json");

    let json_layer = fmt::layer()
        .json()
        .with_writer(json_appender)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    if tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(json_layer)
        .try_init()
        .is_err()
    {
        eprintln!("tracing subscriber already set, keeping the existing one");
        return;
    }

    info!(log_dir = %log_dir, "Tracing initialized with file logging");
}
