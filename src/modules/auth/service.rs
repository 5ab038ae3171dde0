use kampus_auth::create_access_token;
use kampus_config::JwtConfig;
use kampus_core::{AppError, verify_password};
use kampus_db::Directory;
use tracing::{info, instrument};

use super::model::{LoginRequest, LoginResponse};
use crate::middleware::role::resolve_role;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService;

impl AuthService {
    #[instrument(skip(directory, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login_user(
        directory: &dyn Directory,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let credentials = directory
            .find_credentials(&dto.email)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&dto.password, &credentials.password_hash)? {
            return Err(AppError::unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let user = directory
            .find_user(credentials.id)
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS.to_string()))?;

        let access_token =
            create_access_token(user.id, &user.email, user.is_staff, jwt_config)?;
        let role = resolve_role(directory, Some(&user.principal())).await;

        info!(user_id = %user.id, role = %role, "User logged in");

        Ok(LoginResponse {
            access_token,
            user,
            role,
        })
    }
}
