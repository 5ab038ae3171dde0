use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use kampus_auth::{Claims, verify_token};
use kampus_config::JwtConfig;
use kampus_core::AppError;
use kampus_models::Principal;
use uuid::Uuid;

use crate::state::AppState;

/// The principal behind the request's bearer token.
///
/// `Ok(None)` when no bearer token is present; an error when a token is
/// present but invalid or expired.
pub fn authenticate(
    headers: &HeaderMap,
    jwt_config: &JwtConfig,
) -> Result<Option<Principal>, AppError> {
    let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() else {
        return Ok(None);
    };
    let claims = verify_token(bearer.token(), jwt_config)?;
    principal_from_claims(claims).map(Some)
}

pub fn principal_from_claims(claims: Claims) -> Result<Principal, AppError> {
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))?;
    Ok(Principal {
        user_id,
        email: claims.email,
        is_staff: claims.is_staff,
    })
}

/// Extractor for handlers that need an authenticated principal but no
/// particular role.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(&parts.headers, &state.jwt_config)?
            .map(AuthUser)
            .ok_or_else(|| AppError::unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode, header};
    use kampus_auth::create_access_token;

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry: 3600,
        }
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_no_header_is_anonymous() {
        assert_eq!(authenticate(&HeaderMap::new(), &jwt_config()).unwrap(), None);
    }

    #[test]
    fn test_valid_token() {
        let config = jwt_config();
        let user_id = Uuid::new_v4();
        let token = create_access_token(user_id, "staff@kampus.edu", true, &config).unwrap();

        let principal = authenticate(&headers_with(&format!("Bearer {}", token)), &config)
            .unwrap()
            .unwrap();
        assert_eq!(principal.user_id, user_id);
        assert_eq!(principal.email, "staff@kampus.edu");
        assert!(principal.is_staff);
    }

    #[test]
    fn test_bad_token_is_unauthorized() {
        let err = authenticate(&headers_with("Bearer not-a-jwt"), &jwt_config()).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_non_uuid_subject_rejected() {
        let claims = Claims {
            sub: "42".to_string(),
            email: "x@kampus.edu".to_string(),
            is_staff: false,
            exp: 9999999999,
            iat: 1234567890,
        };
        assert!(principal_from_claims(claims).is_err());
    }
}
