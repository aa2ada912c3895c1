//! HTTP request handlers for the route service.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use waypath::{Coordinate, NewRoute, Route, RouteError, Waypoint};

use crate::AppState;

/// A waypoint in a route creation request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct WaypointCreate {
    /// Latitude in decimal degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in decimal degrees (-180 to 180).
    pub longitude: f64,
    /// Position within the route, starting at 1. Must be unique per route.
    pub order: u32,
}

/// Route creation request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RouteCreate {
    /// Route name (1 to 100 characters).
    pub name: String,
    /// Waypoints, in any order. At least one is required.
    pub waypoints: Vec<WaypointCreate>,
}

impl RouteCreate {
    /// Convert into the library payload, validating every coordinate.
    pub fn into_new_route(self) -> waypath::Result<NewRoute> {
        let waypoints = self
            .waypoints
            .into_iter()
            .map(|w| {
                Coordinate::new(w.latitude, w.longitude).map(|c| Waypoint::new(w.order, c))
            })
            .collect::<waypath::Result<Vec<_>>>()?;

        Ok(NewRoute::new(self.name, waypoints))
    }
}

/// A stored waypoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct WaypointOut {
    /// Waypoint id, unique across all routes.
    pub id: u64,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Position within the route.
    pub order: u32,
}

/// Route listing entry.
#[derive(Debug, Serialize, ToSchema)]
pub struct RouteSummary {
    /// Route id.
    pub id: u64,
    /// Route name.
    pub name: String,
    /// Number of waypoints.
    pub waypoint_count: usize,
    /// Total distance in meters, rounded to 3 decimals.
    pub total_distance_meters: f64,
    /// Creation timestamp (RFC 3339).
    pub created_at: DateTime<Utc>,
}

impl From<&Route> for RouteSummary {
    fn from(route: &Route) -> Self {
        Self {
            id: route.id,
            name: route.name.clone(),
            waypoint_count: route.waypoint_count(),
            total_distance_meters: route.reported_distance(),
            created_at: route.created_at,
        }
    }
}

/// Full route with its ordered waypoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct RouteDetail {
    /// Route id.
    pub id: u64,
    /// Route name.
    pub name: String,
    /// Waypoints in ascending order.
    pub waypoints: Vec<WaypointOut>,
    /// Total distance in meters, rounded to 3 decimals.
    pub total_distance_meters: f64,
    /// Creation timestamp (RFC 3339).
    pub created_at: DateTime<Utc>,
}

impl From<&Route> for RouteDetail {
    fn from(route: &Route) -> Self {
        Self {
            id: route.id,
            name: route.name.clone(),
            waypoints: route
                .waypoints_with_ids()
                .map(|(id, w)| WaypointOut {
                    id,
                    latitude: w.coordinate.lat(),
                    longitude: w.coordinate.lon(),
                    order: w.sequence,
                })
                .collect(),
            total_distance_meters: route.reported_distance(),
            created_at: route.created_at,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Storage statistics response.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    /// Number of stored routes.
    pub routes: u64,
    /// Number of waypoints across all routes.
    pub waypoints: u64,
    /// Average waypoints per route.
    pub mean_waypoints: f64,
}

/// Create a route.
///
/// Waypoints may be submitted in any order; they are stored sorted by `order`.
///
/// # Returns
///
/// - `201 Created` with the stored route
/// - `400 Bad Request` if the name, coordinates or waypoint orders are invalid
/// - `422 Unprocessable Entity` if the body is not valid JSON for this schema
#[utoipa::path(
    post,
    path = "/api/routes",
    tag = "routes",
    request_body = RouteCreate,
    responses(
        (status = 201, description = "Route created", body = RouteDetail),
        (status = 400, description = "Invalid route", body = ErrorResponse)
    )
)]
pub async fn create_route(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RouteCreate>,
) -> impl IntoResponse {
    tracing::debug!(
        name = %payload.name,
        waypoints = payload.waypoints.len(),
        "Create route"
    );

    match payload
        .into_new_route()
        .and_then(|new_route| state.store.create(new_route))
    {
        Ok(route) => {
            tracing::info!(
                route_id = route.id,
                name = %route.name,
                waypoints = route.waypoint_count(),
                total_distance_meters = route.reported_distance(),
                "Route created"
            );
            (StatusCode::CREATED, Json(RouteDetail::from(&route))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// List all routes with their total distances.
#[utoipa::path(
    get,
    path = "/api/routes",
    tag = "routes",
    responses(
        (status = 200, description = "All routes", body = [RouteSummary])
    )
)]
pub async fn list_routes(State(state): State<Arc<AppState>>) -> Json<Vec<RouteSummary>> {
    let routes = state.store.list();
    tracing::debug!(count = routes.len(), "List routes");

    Json(routes.iter().map(RouteSummary::from).collect())
}

/// Get a single route with its waypoints.
///
/// # Returns
///
/// - `200 OK` with the route
/// - `404 Not Found` if no route has this id
#[utoipa::path(
    get,
    path = "/api/routes/{id}",
    tag = "routes",
    params(("id" = u64, Path, description = "Route id")),
    responses(
        (status = 200, description = "Route found", body = RouteDetail),
        (status = 404, description = "Route not found", body = ErrorResponse)
    )
)]
pub async fn get_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    match state.store.get(id) {
        Ok(route) => (StatusCode::OK, Json(RouteDetail::from(&route))).into_response(),
        Err(e) => error_response(e),
    }
}

/// Delete a route and all of its waypoints.
#[utoipa::path(
    delete,
    path = "/api/routes/{id}",
    tag = "routes",
    params(("id" = u64, Path, description = "Route id")),
    responses(
        (status = 204, description = "Route deleted"),
        (status = 404, description = "Route not found", body = ErrorResponse)
    )
)]
pub async fn delete_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    match state.store.delete(id) {
        Ok(route) => {
            tracing::info!(
                route_id = route.id,
                waypoints = route.waypoint_count(),
                "Route deleted"
            );
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Get a route as a GeoJSON `Feature` with a `LineString` geometry.
#[utoipa::path(
    get,
    path = "/api/routes/{id}/geojson",
    tag = "routes",
    params(("id" = u64, Path, description = "Route id")),
    responses(
        (status = 200, description = "GeoJSON Feature"),
        (status = 404, description = "Route not found", body = ErrorResponse)
    )
)]
pub async fn get_route_geojson(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    match state.store.get(id) {
        Ok(route) => (
            StatusCode::OK,
            Json(waypath::geojson::route_to_feature(&route)),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// Create an error response for route operations.
fn error_response(e: RouteError) -> axum::response::Response {
    let status = match &e {
        RouteError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
        e if e.is_validation() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    tracing::warn!(error = %e, status = status.as_u16(), "Route request failed");

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

/// Health check endpoint.
///
/// Returns service status and version.
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "system",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Get storage statistics.
#[utoipa::path(
    get,
    path = "/stats",
    tag = "system",
    responses((status = 200, description = "Storage statistics", body = StatsResponse))
)]
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let stats = state.store.stats();

    Json(StatsResponse {
        routes: stats.route_count,
        waypoints: stats.waypoint_count,
        mean_waypoints: stats.mean_waypoints(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_create_deserialize() {
        let json = r#"{
            "name": "L",
            "waypoints": [
                {"latitude": 0.0, "longitude": 1.0, "order": 2},
                {"latitude": 0.0, "longitude": 0.0, "order": 1}
            ]
        }"#;
        let payload: RouteCreate = serde_json::from_str(json).unwrap();
        assert_eq!(payload.name, "L");
        assert_eq!(payload.waypoints.len(), 2);
        assert_eq!(payload.waypoints[0].order, 2);
    }

    #[test]
    fn test_into_new_route_rejects_bad_coordinate() {
        let payload = RouteCreate {
            name: "bad".to_string(),
            waypoints: vec![WaypointCreate {
                latitude: 95.0,
                longitude: 0.0,
                order: 1,
            }],
        };
        assert!(matches!(
            payload.into_new_route(),
            Err(RouteError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_route_detail_serialize() {
        let store = waypath::RouteStore::new();
        let route = store
            .create(
                RouteCreate {
                    name: "L".to_string(),
                    waypoints: vec![
                        WaypointCreate {
                            latitude: 1.0,
                            longitude: 1.0,
                            order: 3,
                        },
                        WaypointCreate {
                            latitude: 0.0,
                            longitude: 0.0,
                            order: 1,
                        },
                    ],
                }
                .into_new_route()
                .unwrap(),
            )
            .unwrap();

        let json = serde_json::to_value(RouteDetail::from(&route)).unwrap();
        assert_eq!(json["name"], "L");
        assert_eq!(json["waypoints"][0]["order"], 1);
        assert_eq!(json["waypoints"][1]["order"], 3);
        assert_eq!(
            json["total_distance_meters"].as_f64().unwrap(),
            route.reported_distance()
        );
        assert!(json["created_at"].as_str().is_some());

        // Every representation reports the same bits
        let reported = route.reported_distance().to_bits();
        assert_eq!(
            RouteSummary::from(&route).total_distance_meters.to_bits(),
            reported
        );
        assert_eq!(
            RouteDetail::from(&route).total_distance_meters.to_bits(),
            reported
        );
        let feature = waypath::geojson::route_to_feature(&route);
        assert_eq!(
            feature
                .property("total_distance_meters")
                .and_then(|v| v.as_f64())
                .map(f64::to_bits),
            Some(reported)
        );
    }

    #[test]
    fn test_health_response_serialize() {
        let response = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("ok"));
        assert!(json.contains("0.1.0"));
    }
}
