//! Error types for the Waypath library.

use thiserror::Error;

/// Errors that can occur when building or storing routes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    /// A latitude or longitude is NaN or infinite.
    #[error("Coordinate is not a finite number: lat={lat}, lon={lon}")]
    NonFiniteCoordinate { lat: f64, lon: f64 },

    /// Coordinates are outside the valid WGS84 range.
    #[error("Coordinates out of bounds: lat={lat}, lon={lon} (valid: lat ±90°, lon ±180°)")]
    OutOfBounds { lat: f64, lon: f64 },

    /// Route name is empty or longer than the allowed maximum.
    #[error("Invalid route name length: {len} characters (expected 1 to 100)")]
    InvalidName { len: usize },

    /// A route was submitted without waypoints.
    #[error("A route requires at least one waypoint")]
    EmptyRoute,

    /// Waypoint sequence indices start at 1.
    #[error("Invalid waypoint order: {order} (must be >= 1)")]
    InvalidSequence { order: u32 },

    /// Two waypoints in the same route share a sequence index.
    #[error("Duplicate waypoint order: {order}")]
    DuplicateSequence { order: u32 },

    /// A route has more waypoints than the store accepts.
    #[error("Too many waypoints: {count} (limit is {limit})")]
    TooManyWaypoints { count: usize, limit: usize },

    /// No route exists with the given id.
    #[error("Route not found: {id}")]
    RouteNotFound { id: u64 },

    /// GeoJSON geometry type cannot describe a route.
    #[error("Unsupported geometry type: {kind} (expected LineString or MultiPoint)")]
    UnsupportedGeometry { kind: String },

    /// A GeoJSON position has fewer than two elements.
    #[error("Position must have at least 2 elements (lon, lat), got {len}")]
    InvalidPosition { len: usize },

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl RouteError {
    /// Whether the error describes a bad request payload rather than a lookup failure.
    pub fn is_validation(&self) -> bool {
        !matches!(self, RouteError::RouteNotFound { .. } | RouteError::Config(_))
    }
}

/// Result type alias using [`RouteError`].
pub type Result<T> = std::result::Result<T, RouteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RouteError::OutOfBounds {
            lat: 91.0,
            lon: 0.0,
        };
        assert!(err.to_string().contains("91"));
        assert!(err.to_string().contains("out of bounds"));

        let err = RouteError::InvalidName { len: 101 };
        assert!(err.to_string().contains("101"));

        let err = RouteError::DuplicateSequence { order: 3 };
        assert!(err.to_string().contains('3'));

        let err = RouteError::RouteNotFound { id: 42 };
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_is_validation() {
        assert!(RouteError::EmptyRoute.is_validation());
        assert!(RouteError::InvalidSequence { order: 0 }.is_validation());
        assert!(!RouteError::RouteNotFound { id: 1 }.is_validation());
        assert!(!RouteError::Config("bad".into()).is_validation());
    }
}
