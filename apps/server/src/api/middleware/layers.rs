//! Layer factories for middleware

use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

const CORS_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

/// Tracing/logging middleware
pub fn trace() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::DEBUG))
}

/// CORS middleware
///
/// `*` (or an empty list) allows any origin; otherwise only the listed origins are echoed.
pub fn cors(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([header::ORIGIN, header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(CORS_MAX_AGE);

    if origins.is_empty() || origins.iter().any(|o| o.trim() == "*") {
        return layer.allow_origin(Any);
    }

    let header_values: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
        .collect();

    // If all configured origins were invalid, emit no allow-origin header at all.
    if header_values.is_empty() {
        return layer;
    }

    layer.allow_origin(AllowOrigin::list(header_values))
}

/// Compression middleware
pub fn compression() -> CompressionLayer {
    CompressionLayer::new()
}
