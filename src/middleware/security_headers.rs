use axum::http::{HeaderName, HeaderValue, header};
use tower::ServiceBuilder;
use tower::layer::util::{Identity, Stack};
use tower_http::set_header::SetResponseHeaderLayer;

/// Headers stamped on every response.
pub const SECURITY_HEADERS: [(HeaderName, &str); 3] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
    (header::X_XSS_PROTECTION, "1; mode=block"),
];

type HeaderLayer = SetResponseHeaderLayer<HeaderValue>;

pub type SecurityHeadersLayer =
    ServiceBuilder<Stack<HeaderLayer, Stack<HeaderLayer, Stack<HeaderLayer, Identity>>>>;

/// Layer setting [`SECURITY_HEADERS`] on every response, whatever its status
/// or origin. Existing values are overwritten.
pub fn security_headers() -> SecurityHeadersLayer {
    let [nosniff, frame, xss] = SECURITY_HEADERS
        .map(|(name, value)| SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value)));
    ServiceBuilder::new().layer(nosniff).layer(frame).layer(xss)
}
