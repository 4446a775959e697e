//! API layer - HTTP handlers and routing
//!
//! - Public donor endpoints under `/api/donors`
//! - Admin session and donation endpoints under `/api/admin`
//! - Static client files for every other path

pub mod admin;
pub mod common;
pub mod donors;
pub mod middleware;


use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use std::path::Path;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub use middleware::{ApiError, AppState};

/// Build the `/api` router
pub fn build_api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/donors", donors::router(state.clone()))
        .nest("/admin", admin::router(state))
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str, web_path: &Path) -> Router {
    Router::new()
        .nest("/api", build_api_router(state.clone()))
        .fallback_service(ServeDir::new(web_path))
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = match origin.trim() {
        "*" | "" => AllowOrigin::any(),
        origin => match origin.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!(origin, "Invalid CORS origin, allowing any origin");
                AllowOrigin::any()
            }
        },
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
