use kampus_models::{Role, User};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserWithRole {
    #[serde(flatten)]
    pub user: User,
    pub role: Role,
}
