use std::sync::Arc;

use kampus_config::{CorsConfig, EmailConfig, HttpConfig, JwtConfig};
use kampus_db::{Directory, DirectoryError, InMemoryDirectory, PgDirectory, init_db_pool};
use tracing::{info, warn};

use crate::utils::email::EmailService;
use crate::utils::notices::NoticeBoard;

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn Directory>,
    pub jwt_config: JwtConfig,
    pub email_config: EmailConfig,
    pub cors_config: CorsConfig,
    pub http_config: HttpConfig,
    pub email: Arc<EmailService>,
    pub notices: NoticeBoard,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("http_config", &self.http_config)
            .field("cors_config", &self.cors_config)
            .finish_non_exhaustive()
    }
}

/// Build the application state from the environment.
///
/// Uses Postgres when `DATABASE_URL` is set and an empty in-memory directory
/// otherwise.
pub async fn init_app_state() -> Result<AppState, DirectoryError> {
    let directory: Arc<dyn Directory> = if std::env::var("DATABASE_URL").is_ok() {
        let pool = init_db_pool().await?;
        info!("Connected to Postgres");
        Arc::new(PgDirectory::new(pool))
    } else {
        warn!("DATABASE_URL is not set, running on an in-memory directory (demo mode)");
        Arc::new(InMemoryDirectory::new())
    };

    let email_config = EmailConfig::from_env();
    let email = Arc::new(EmailService::from_config(&email_config));

    Ok(AppState {
        directory,
        jwt_config: JwtConfig::from_env(),
        email_config,
        cors_config: CorsConfig::from_env(),
        http_config: HttpConfig::from_env(),
        email,
        notices: NoticeBoard::new(),
    })
}
