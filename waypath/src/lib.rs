//! # Waypath - Route Distance Library
//!
//! Great-circle distance and route aggregation for named routes made of
//! ordered waypoints.
//!
//! ## Features
//!
//! - **Validated input**: [`Coordinate`] can only hold finite, in-range values
//! - **Haversine distance**: spherical Earth, radius 6,371,000 m, numerically
//!   safe at antipodes
//! - **Deterministic totals**: consecutive pairs summed in sequence order
//! - **Route storage**: thread-safe in-memory [`RouteStore`]
//! - **GeoJSON** (feature `geojson`): export routes, import LineStrings
//!
//! ## Quick Start
//!
//! ```
//! use waypath::{distance, total_distance, Coordinate};
//!
//! let london = Coordinate::new(51.5074, -0.1278).unwrap();
//! let paris = Coordinate::new(48.8566, 2.3522).unwrap();
//!
//! let meters = distance(london, paris);
//! assert!((meters - 343_556.0).abs() < 500.0);
//!
//! assert_eq!(total_distance(&[london, paris]), meters);
//! ```
//!
//! ## Units
//!
//! All distances are in meters. Totals are kept unrounded; values reported to
//! users are rounded to 3 decimal places with [`round_distance`].

pub mod coordinate;
pub mod distance;
pub mod error;
#[cfg(feature = "geojson")]
pub mod geojson;
pub mod route;
pub mod store;

// Re-export main types at crate root for convenience
pub use coordinate::Coordinate;
pub use distance::{
    distance, round_distance, total_distance, total_distance_by_sequence, EARTH_RADIUS_METERS,
    REPORTED_DECIMALS,
};
pub use error::{Result, RouteError};
pub use route::{sort_by_sequence, validate_sequences, NewRoute, Route, Waypoint, MAX_NAME_LEN};
pub use store::{RouteStore, RouteStoreBuilder, StoreStats};
