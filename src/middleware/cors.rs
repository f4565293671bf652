use axum::http::HeaderName;
use tower_http::cors::{Any, CorsLayer};

use crate::middleware::auth::EXPOSED_AUTH_HEADERS;

/// Open CORS that also lets browsers read the token headers.
pub fn api_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any)
        .expose_headers(EXPOSED_AUTH_HEADERS.map(HeaderName::from_static))
}
