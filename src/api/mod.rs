//! REST API endpoints.
//!
//! Axum-based HTTP API serving league aggregations and pass-through
//! upstream data. Every route is reachable both at the root and under
//! `/api`.

pub mod routes;
pub mod state;

use std::path::PathBuf;
use std::str::FromStr;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::fetch::FetchError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Upstream answered with something we could not read.
    #[error("Unexpected upstream response: {0}")]
    UpstreamFormat(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::NotFound(what) => ApiError::NotFound(what),
            FetchError::Format(msg) => ApiError::UpstreamFormat(msg),
            FetchError::InvalidUrl(msg) => ApiError::Internal(msg),
            e @ (FetchError::Unavailable(_)
            | FetchError::RateLimited { .. }
            | FetchError::HttpStatus { .. }) => ApiError::UpstreamUnavailable(e.to_string()),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::UpstreamFormat(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_FORMAT"),
            ApiError::UpstreamUnavailable(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Parse a positive numeric id from a path segment or query value.
pub fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, ApiError> {
    let raw = raw.trim();
    match raw.parse::<u64>() {
        Ok(n) if n > 0 => raw
            .parse::<T>()
            .map_err(|_| ApiError::BadRequest(format!("{} out of range: {}", what, raw))),
        _ => Err(ApiError::BadRequest(format!(
            "{} must be a positive integer, got {:?}",
            what, raw
        ))),
    }
}

/// Router construction options.
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    /// Log every request through `TraceLayer`
    pub access_log: bool,

    /// Serve a built frontend for unmatched paths
    pub static_dir: Option<PathBuf>,
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(allowed))
}

/// Build the application router.
pub fn build_router(state: AppState, options: &RouterOptions) -> Router {
    let routes = routes::router();

    let mut app = Router::new()
        .merge(routes.clone())
        .nest("/api", routes)
        .with_state(state);

    if let Some(dir) = &options.static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    let app = app.layer(cors_layer(&options.cors_origins));

    if options.access_log {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    }
}
