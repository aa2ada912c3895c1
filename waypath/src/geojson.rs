//! GeoJSON conversion for routes.
//!
//! This module converts stored routes into GeoJSON features and reads
//! coordinate sequences out of GeoJSON geometries.
//! Enable the `geojson` feature to use this module.
//!
//! # Example
//!
//! ```ignore
//! use waypath::geojson::{coordinates_from_geometry, route_to_feature};
//! use waypath::total_distance;
//! use geojson::Geometry;
//!
//! let line: Geometry = r#"{
//!     "type": "LineString",
//!     "coordinates": [[-0.1278, 51.5074], [2.3522, 48.8566]]
//! }"#.parse().unwrap();
//!
//! let coords = coordinates_from_geometry(&line)?;
//! println!("{} m", total_distance(&coords));
//! ```

use geojson::{feature::Id, Feature, Geometry, Value as GeoJsonValue};

use crate::coordinate::Coordinate;
use crate::error::{Result, RouteError};
use crate::route::Route;

/// Convert a route into a GeoJSON `Feature` with a `LineString` geometry.
///
/// Positions are written in GeoJSON order, `[longitude, latitude]`, following
/// the route's sequence order. The route id is set as the feature `id`, and
/// the feature carries these properties:
///
/// - `id`
/// - `name`
/// - `waypoint_count`
/// - `total_distance_meters` (rounded for presentation)
pub fn route_to_feature(route: &Route) -> Feature {
    let positions: Vec<Vec<f64>> = route
        .waypoints()
        .iter()
        .map(|w| vec![w.coordinate.lon(), w.coordinate.lat()])
        .collect();

    let mut feature = Feature::from(Geometry::new(GeoJsonValue::LineString(positions)));
    feature.id = Some(Id::Number(route.id.into()));
    feature.set_property("id", route.id);
    feature.set_property("name", route.name.clone());
    feature.set_property("waypoint_count", route.waypoint_count() as u64);
    feature.set_property("total_distance_meters", route.reported_distance());
    feature
}

/// Extract an ordered coordinate sequence from a GeoJSON geometry.
///
/// Supported geometry types:
/// - LineString
/// - MultiPoint
///
/// Positions are `[longitude, latitude]` or `[longitude, latitude, altitude]`;
/// any altitude is ignored.
///
/// # Errors
///
/// Returns an error if:
/// - The geometry is of any other type
/// - A position has fewer than 2 elements
/// - A position is outside the valid coordinate range
pub fn coordinates_from_geometry(geometry: &Geometry) -> Result<Vec<Coordinate>> {
    match &geometry.value {
        GeoJsonValue::LineString(positions) | GeoJsonValue::MultiPoint(positions) => {
            positions.iter().map(|p| position_to_coordinate(p)).collect()
        }
        other => Err(RouteError::UnsupportedGeometry {
            kind: geometry_kind(other).to_string(),
        }),
    }
}

fn geometry_kind(value: &GeoJsonValue) -> &'static str {
    match value {
        GeoJsonValue::Point(_) => "Point",
        GeoJsonValue::MultiPoint(_) => "MultiPoint",
        GeoJsonValue::LineString(_) => "LineString",
        GeoJsonValue::MultiLineString(_) => "MultiLineString",
        GeoJsonValue::Polygon(_) => "Polygon",
        GeoJsonValue::MultiPolygon(_) => "MultiPolygon",
        GeoJsonValue::GeometryCollection(_) => "GeometryCollection",
    }
}

fn position_to_coordinate(position: &[f64]) -> Result<Coordinate> {
    match position {
        [lon, lat, ..] => Coordinate::new(*lat, *lon),
        _ => Err(RouteError::InvalidPosition {
            len: position.len(),
        }),
    }
}
