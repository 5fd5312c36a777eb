//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{alias}`  - Short link redirect
//! - `GET  /health`   - Health check: storage reachability
//! - `/api/v1/*`      - REST API for creating, listing and deleting links
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

/// All routes with tracing, before path normalization.
///
/// `/health` is a static route and takes precedence over `/{alias}`; the alias
/// `health` is reserved so the two never compete.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/{alias}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api/v1", api::routes::v1_routes())
        .with_state(state)
        .layer(tracing::layer())
}
