//! Great-circle distance and route aggregation.
//!
//! All distances are in **meters**, computed with the haversine formula on a
//! spherical Earth of radius [`EARTH_RADIUS_METERS`].
//!
//! Totals are kept unrounded. Anything that reports a distance to a caller
//! goes through [`round_distance`], so the HTTP service, the CLI and
//! [`Route::reported_distance`](crate::Route::reported_distance) all produce
//! identical values for identical input.

use crate::coordinate::Coordinate;
use crate::route::{sort_by_sequence, Waypoint};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Number of decimal places kept when a distance is reported.
pub const REPORTED_DECIMALS: i32 = 3;

/// Great-circle distance between two coordinates, in meters.
///
/// Symmetric, non-negative, and zero for identical points. Antipodal points
/// return half the Earth's circumference (≈ 20,015 km).
///
/// # Examples
///
/// ```
/// use waypath::{distance, Coordinate};
///
/// let a = Coordinate::new(0.0, 0.0).unwrap();
/// let b = Coordinate::new(0.0, 1.0).unwrap();
/// let meters = distance(a, b);
/// assert!((meters - 111_194.93).abs() < 0.01);
/// ```
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat().to_radians();
    let phi2 = b.lat().to_radians();
    let delta_phi = (b.lat() - a.lat()).to_radians();
    let delta_lambda = (b.lon() - a.lon()).to_radians();

    let sin_dphi = (delta_phi / 2.0).sin();
    let sin_dlambda = (delta_lambda / 2.0).sin();

    // Rounding can push h just past 1.0 near antipodes.
    let h = (sin_dphi * sin_dphi + phi1.cos() * phi2.cos() * sin_dlambda * sin_dlambda)
        .clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Total length of an already ordered sequence of coordinates, in meters.
///
/// Sums `distance(coords[i - 1], coords[i])` left to right, so the rounding
/// behaviour is reproducible. Returns exactly `0.0` for fewer than two points.
/// The input is **not** re-sorted; use [`total_distance_by_sequence`] for
/// waypoints in arbitrary order.
///
/// # Examples
///
/// ```
/// use waypath::{distance, total_distance, Coordinate};
///
/// let a = Coordinate::new(0.0, 0.0).unwrap();
/// let b = Coordinate::new(0.0, 1.0).unwrap();
/// let c = Coordinate::new(1.0, 1.0).unwrap();
///
/// assert_eq!(total_distance(&[]), 0.0);
/// assert_eq!(total_distance(&[a]), 0.0);
/// assert_eq!(total_distance(&[a, b, c]), distance(a, b) + distance(b, c));
/// ```
pub fn total_distance(coords: &[Coordinate]) -> f64 {
    coords
        .windows(2)
        .fold(0.0, |total, pair| total + distance(pair[0], pair[1]))
}

/// Total length of a set of waypoints, ordered by their sequence index.
///
/// The waypoints are copied and stable-sorted by sequence index before being
/// summed, so callers holding unsorted waypoints do not need their own
/// ordering step.
pub fn total_distance_by_sequence(waypoints: &[Waypoint]) -> f64 {
    let mut ordered = waypoints.to_vec();
    sort_by_sequence(&mut ordered);

    let coords: Vec<Coordinate> = ordered.iter().map(|w| w.coordinate).collect();
    total_distance(&coords)
}

/// Round a distance to [`REPORTED_DECIMALS`] decimal places.
///
/// ```
/// use waypath::round_distance;
///
/// assert_eq!(round_distance(343_556.123_456), 343_556.123);
/// assert_eq!(round_distance(0.0), 0.0);
/// ```
pub fn round_distance(meters: f64) -> f64 {
    let factor = 10f64.powi(REPORTED_DECIMALS);
    (meters * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn waypoint(sequence: u32, lat: f64, lon: f64) -> Waypoint {
        Waypoint::new(sequence, coord(lat, lon))
    }

    #[test]
    fn test_identical_points() {
        assert_eq!(distance(coord(0.0, 0.0), coord(0.0, 0.0)), 0.0);
        assert!(distance(coord(35.6762, 139.6503), coord(35.6762, 139.6503)).abs() < 1e-9);
        assert!(distance(coord(-90.0, 0.0), coord(-90.0, 0.0)).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_at_equator() {
        let d = distance(coord(0.0, 0.0), coord(0.0, 1.0));
        assert!((d - 111_194.9).abs() < 0.1, "got {d}");
    }

    #[test]
    fn test_london_paris() {
        let london = coord(51.5074, -0.1278);
        let paris = coord(48.8566, 2.3522);
        let d = distance(london, paris);
        assert!((d - 343_556.0).abs() < 500.0, "got {d}");
    }

    #[test]
    fn test_antipodal_points() {
        let half_circumference = PI * EARTH_RADIUS_METERS;

        let d = distance(coord(0.0, 0.0), coord(0.0, 180.0));
        assert!(d.is_finite());
        assert!((d - half_circumference).abs() < 1e-6);

        let d = distance(coord(90.0, 0.0), coord(-90.0, 0.0));
        assert!((d - half_circumference).abs() < 1e-6);

        let d = distance(coord(45.0, -30.0), coord(-45.0, 150.0));
        assert!(d.is_finite());
        assert!((d - half_circumference).abs() < 1.0);
    }

    #[test]
    fn test_symmetry_and_non_negative() {
        let points = [
            coord(0.0, 0.0),
            coord(51.5074, -0.1278),
            coord(-33.8688, 151.2093),
            coord(89.9, 179.9),
            coord(-89.9, -179.9),
            coord(19.4326, -99.1332),
        ];
        for &a in &points {
            for &b in &points {
                let ab = distance(a, b);
                assert!(ab >= 0.0);
                assert_eq!(ab, distance(b, a));
            }
        }
    }

    #[test]
    fn test_geodesic_additivity() {
        // Equator
        let (a, b, c) = (coord(0.0, 0.0), coord(0.0, 10.0), coord(0.0, 30.0));
        assert!((distance(a, c) - (distance(a, b) + distance(b, c))).abs() < 1e-6);

        // Meridian
        let (a, b, c) = (coord(-20.0, 5.0), coord(10.0, 5.0), coord(45.0, 5.0));
        assert!((distance(a, c) - (distance(a, b) + distance(b, c))).abs() < 1e-6);
    }

    #[test]
    fn test_total_distance_short_sequences() {
        assert_eq!(total_distance(&[]), 0.0);
        assert_eq!(total_distance(&[coord(35.5, 138.5)]), 0.0);
    }

    #[test]
    fn test_total_distance_l_shape() {
        let a = coord(0.0, 0.0);
        let b = coord(0.0, 1.0);
        let c = coord(1.0, 1.0);

        let total = total_distance(&[a, b, c]);
        assert_eq!(total, distance(a, b) + distance(b, c));
        assert!(total > distance(a, c));
    }

    #[test]
    fn test_total_distance_deterministic() {
        let coords = [
            coord(51.5074, -0.1278),
            coord(48.8566, 2.3522),
            coord(52.52, 13.405),
            coord(41.9028, 12.4964),
        ];
        let first = total_distance(&coords);
        for _ in 0..10 {
            assert_eq!(total_distance(&coords).to_bits(), first.to_bits());
        }
    }

    #[test]
    fn test_total_distance_by_sequence_sorts() {
        let unsorted = [
            waypoint(3, 1.0, 1.0),
            waypoint(1, 0.0, 0.0),
            waypoint(2, 0.0, 1.0),
        ];
        let expected = total_distance(&[coord(0.0, 0.0), coord(0.0, 1.0), coord(1.0, 1.0)]);
        assert_eq!(total_distance_by_sequence(&unsorted), expected);
    }

    #[test]
    fn test_total_distance_by_sequence_short() {
        assert_eq!(total_distance_by_sequence(&[]), 0.0);
        assert_eq!(total_distance_by_sequence(&[waypoint(7, 10.0, 10.0)]), 0.0);
    }

    #[test]
    fn test_round_distance() {
        assert_eq!(round_distance(111_194.926_644_558_74), 111_194.927);
        assert_eq!(round_distance(1.0004), 1.0);
        assert_eq!(round_distance(1.0006), 1.001);
        assert_eq!(round_distance(0.0), 0.0);
    }
}
