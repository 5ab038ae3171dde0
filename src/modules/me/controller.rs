use axum::{Extension, Json};
use kampus_models::CurrentUser;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::middleware::role::RequestRole;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    /// `student`, `teacher`, `admin`, `unknown`, or null for anonymous requests
    pub user_type: Option<String>,
    pub email: Option<String>,
}

/// Role resolved for the calling request
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Resolved role of the caller", body = MeResponse)
    ),
    security(
        (),
        ("bearer_auth" = [])
    ),
    tag = "Me"
)]
pub async fn get_me(
    Extension(RequestRole(role)): Extension<RequestRole>,
    Extension(current): Extension<CurrentUser>,
) -> Json<MeResponse> {
    Json(MeResponse {
        user_type: role.user_type().map(str::to_string),
        email: current.principal.map(|p| p.email),
    })
}
