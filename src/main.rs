use dotenvy::dotenv;
use kampus::router::init_router;
use kampus::state::init_app_state;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenv().ok();

    if kampus_observability::is_file_logging_enabled() {
        kampus_observability::init_tracing();
    } else {
        kampus_observability::init_basic_console_logging();
    }

    let state = match init_app_state().await {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to initialize application state");
            std::process::exit(1);
        }
    };
    let bind_address = state.http_config.bind_address.clone();
    let app = init_router(state);

    let listener = match tokio::net::TcpListener::bind(&bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(address = %bind_address, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };

    info!(address = %bind_address, "🚀 Server running");
    info!("📖 Scalar UI available at /scalar");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
