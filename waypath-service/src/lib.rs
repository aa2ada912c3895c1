//! Waypath Service Library
//!
//! HTTP handlers, router and types for the route distance service.
//! This library is used by both the waypath-service binary and integration tests.

pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use waypath::RouteStore;

/// Application state shared across handlers.
pub struct AppState {
    /// Route storage handle.
    pub store: RouteStore,
}

impl AppState {
    /// Wrap a store for use as router state.
    pub fn new(store: RouteStore) -> Arc<Self> {
        Arc::new(Self { store })
    }
}

/// Build the API router with tracing and permissive CORS.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/routes",
            get(handlers::list_routes).post(handlers::create_route),
        )
        .route(
            "/api/routes/:id",
            get(handlers::get_route).delete(handlers::delete_route),
        )
        .route("/api/routes/:id/geojson", get(handlers::get_route_geojson))
        .route("/healthz", get(handlers::health_check))
        .route("/stats", get(handlers::get_stats))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}

// Re-export commonly used types for convenience
pub use handlers::{
    ErrorResponse, HealthResponse, RouteCreate, RouteDetail, RouteSummary, StatsResponse,
    WaypointCreate, WaypointOut,
};
