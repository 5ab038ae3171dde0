use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use kampus_core::AppError;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// Joins every field's rule violation into one sorted, comma-separated line.
///
/// A rule without a custom message is reported as "`field` is invalid".
fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>();
    messages.sort();
    messages.join(", ")
}

/// Maps a body the JSON extractor could not deserialize to a 400.
///
/// A missing field is named in the message; a value of the wrong type or
/// broken syntax gets a generic one.
fn rejection_error(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request(anyhow!("Missing 'Content-Type: application/json' header"));
    }

    let body = rejection.body_text();
    if let Some(field) = body
        .split("missing field `")
        .nth(1)
        .and_then(|s| s.split('`').next())
    {
        return AppError::bad_request(anyhow!("{} is required", field));
    }

    if body.contains("invalid type") {
        return AppError::bad_request(anyhow!("Invalid field type in request"));
    }

    AppError::bad_request(anyhow!("Invalid request body"))
}

/// JSON body extractor that runs `validator` rules before the handler.
///
/// The two failure classes map to different statuses:
///
/// * **400 Bad Request**: the body never became a `T` (no JSON content type,
///   syntax error, missing field, wrong value type).
/// * **422 Unprocessable Entity**: `T` deserialized but failed its
///   `#[validate]` rules; the message lists every violation.
///
/// Handlers that check domain values themselves (a letter grade outside the
/// scale, say) use 422 as well, so clients can treat 400 as "fix the request
/// shape" and 422 as "fix the values".
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_error)?;

        value
            .validate()
            .map_err(|errors| AppError::unprocessable(anyhow!("{}", format_errors(&errors))))?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[validate(email(message = "Invalid email format"))]
        email: String,
        #[validate(length(min = 8))]
        password: String,
    }

    async fn extract(content_type: Option<&str>, body: &str) -> Result<Signup, AppError> {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        ValidatedJson::<Signup>::from_request(request, &())
            .await
            .map(|ValidatedJson(value)| value)
    }

    #[tokio::test]
    async fn test_shape_errors_are_bad_request() {
        let err = extract(None, r#"{"email":"a@b.com","password":"longenough"}"#)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = extract(Some("application/json"), r#"{"email":"a@b.com"}"#)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error.to_string(), "password is required");

        let err = extract(Some("application/json"), r#"{"email":"a@b.com","password":5}"#)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error.to_string(), "Invalid field type in request");

        let err = extract(Some("application/json"), "{not json").await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rule_violations_are_unprocessable() {
        let err = extract(
            Some("application/json"),
            r#"{"email":"nope","password":"short"}"#,
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error.to_string(), "Invalid email format, password is invalid");
    }

    #[tokio::test]
    async fn test_valid_body_passes_through() {
        let signup = extract(
            Some("application/json"),
            r#"{"email":"a@b.com","password":"longenough"}"#,
        )
        .await
        .unwrap();
        assert_eq!(signup.email, "a@b.com");
    }
}
