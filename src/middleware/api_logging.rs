use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use kampus_models::CurrentUser;
use tracing::{error, info, warn};

use crate::state::AppState;

/// Log API traffic: one line when a request under the API prefix arrives and
/// one when its response leaves. Other paths pass through silently.
///
/// Reads the [`CurrentUser`] left by the role annotation layer, so it must run
/// inside it.
pub async fn api_logging_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if !state.http_config.is_api_path(req.uri().path()) {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .map_or("anonymous", CurrentUser::identity)
        .to_string();

    info!(method = %method, path = %path, user = %user, "API request");

    let response = next.run(req).await;
    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    match status {
        500..=599 => error!(method = %method, path = %path, status, latency_ms, "API response"),
        400..=499 => warn!(method = %method, path = %path, status, latency_ms, "API response"),
        _ => info!(method = %method, path = %path, status, latency_ms, "API response"),
    }

    response
}
