//! Waypath Service - HTTP microservice for route distances.
//!
//! A REST API that stores named routes of ordered waypoints and reports the
//! great-circle length of each route.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `WAYPATH_PORT` | HTTP server port | 8080 |
//! | `WAYPATH_MAX_WAYPOINTS` | Maximum waypoints per route | 10000 |
//! | `RUST_LOG` | Log level (e.g., "info", "debug") | "info" |
//!
//! ## Endpoints
//!
//! - `POST /api/routes` - Create a route
//! - `GET /api/routes` - List routes with total distances
//! - `GET /api/routes/{id}` - Get a route with its waypoints
//! - `DELETE /api/routes/{id}` - Delete a route
//! - `GET /api/routes/{id}/geojson` - Get a route as GeoJSON
//! - `GET /healthz` - Health check
//! - `GET /stats` - Storage statistics
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use waypath::RouteStoreBuilder;
use waypath_service::{handlers, router, AppState};

/// OpenAPI documentation for the Waypath service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Waypath Route Service",
        version = "0.1.0",
        description = "REST API for storing routes and computing their great-circle distance.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "Pedro Sanz Martinez", url = "https://github.com/pedrosanzmtz/waypath")
    ),
    paths(
        handlers::create_route,
        handlers::list_routes,
        handlers::get_route,
        handlers::delete_route,
        handlers::get_route_geojson,
        handlers::health_check,
        handlers::get_stats,
    ),
    components(
        schemas(
            handlers::WaypointCreate,
            handlers::RouteCreate,
            handlers::WaypointOut,
            handlers::RouteSummary,
            handlers::RouteDetail,
            handlers::ErrorResponse,
            handlers::HealthResponse,
            handlers::StatsResponse,
        )
    ),
    tags(
        (name = "routes", description = "Route storage and distance endpoints"),
        (name = "system", description = "System and health endpoints")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "waypath_service=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port: u16 = std::env::var("WAYPATH_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    let store = match RouteStoreBuilder::from_env() {
        Ok(builder) => builder.build(),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring invalid store configuration, using defaults");
            RouteStoreBuilder::new().build()
        }
    };

    tracing::info!(
        max_waypoints = store.max_waypoints(),
        port = port,
        "Starting Waypath service"
    );

    let app = router(AppState::new(store))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolve when the process receives Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
