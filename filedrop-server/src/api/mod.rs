pub mod files;
pub mod health;
pub mod openapi;
pub mod schemas;
pub mod upload;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use filedrop_core::RetentionPeriod;
use filedrop_lifecycle::LifecycleManager;

use crate::ratelimit::{RateLimitLayer, RateLimiter};

use self::openapi::ApiDoc;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    /// The lifecycle orchestration core.
    pub lifecycle: Arc<LifecycleManager>,
    /// Base URL download links are resolved against.
    pub external_url: Arc<str>,
    /// Retention applied when an upload carries no `duration` part.
    pub default_retention: RetentionPeriod,
}

/// Build the Axum router with all API routes, middleware, and Swagger UI.
///
/// The rate limiter applies to uploads only; reads are unmetered.
pub fn router(state: AppState, limiter: Option<Arc<RateLimiter>>) -> Router {
    // Leave headroom above the configured file size for multipart framing.
    let body_limit = state.lifecycle.limits().max_size_bytes + 64 * 1024;

    let upload_routes = Router::new()
        .route("/v1/upload", post(upload::upload))
        .route_layer(RateLimitLayer::new(limiter))
        .layer(DefaultBodyLimit::max(
            usize::try_from(body_limit).unwrap_or(usize::MAX),
        ));

    Router::new()
        // Health
        .route("/health", get(health::health))
        // Files
        .route("/v1/files", get(files::list_files))
        .route("/v1/files/{id}", get(files::describe_file))
        .route("/v1/download/{id}", get(files::download_file))
        .merge(upload_routes)
        .with_state(state)
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
