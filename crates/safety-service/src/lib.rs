//! Safety API HTTP service.
//!
//! # Endpoints
//!
//! - `GET /` - API descriptor
//! - `GET /api/health` - Liveness
//! - `/api/emergency-bells` - Bell listing, proximity search, filter, stats
//! - `/api/hotzone` - Hotzone listing, proximity search, CRUD, incidents, stats
//! - `/api/community` - Paginated posts, post detail, comments
//!
//! Anything else answers 404 with the error envelope.

#![deny(warnings)]

pub mod bells;
pub mod community;
pub mod hotzone;

use axum::{routing::get, Router};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use safety_service_shared::{
    endpoint_not_found, health_check, home, panic_response, request_span, AppState,
};

/// Every route of the API, before state and layers are applied.
///
/// Each resource prefix answers both with and without a trailing slash
/// (`/api/hotzone` and `/api/hotzone/`).
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/api/health", get(health_check))
        .nest("/api/emergency-bells", bells::routes())
        .route("/api/emergency-bells/", bells::collection())
        .nest("/api/hotzone", hotzone::routes())
        .route("/api/hotzone/", hotzone::collection())
        .nest("/api/community", community::routes())
        .route("/api/community/", community::collection())
}

/// Fallback, panic recovery, request tracing and permissive CORS.
pub fn with_service_layers(router: Router) -> Router {
    router
        .fallback(endpoint_not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(CorsLayer::permissive())
}

/// The complete application router.
pub fn build_router(state: AppState) -> Router {
    with_service_layers(api_routes().with_state(state))
}
