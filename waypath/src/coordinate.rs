//! Validated geographic coordinates.
//!
//! A [`Coordinate`] can only be built through [`Coordinate::new`], which rejects
//! non-finite values and anything outside the WGS84 latitude/longitude range.
//! Everything downstream (distance, aggregation, storage) can therefore assume
//! its inputs are well-formed.

use crate::error::{Result, RouteError};

/// Valid latitude range in decimal degrees.
pub const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;

/// Valid longitude range in decimal degrees.
pub const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Create a coordinate, validating both components.
    ///
    /// # Arguments
    ///
    /// * `lat` - Latitude in decimal degrees (-90 to 90)
    /// * `lon` - Longitude in decimal degrees (-180 to 180)
    ///
    /// # Errors
    ///
    /// - [`RouteError::NonFiniteCoordinate`] if either value is NaN or infinite
    /// - [`RouteError::OutOfBounds`] if either value is outside its range
    ///
    /// # Examples
    ///
    /// ```
    /// use waypath::Coordinate;
    ///
    /// let london = Coordinate::new(51.5074, -0.1278).unwrap();
    /// assert_eq!(london.lat(), 51.5074);
    ///
    /// assert!(Coordinate::new(91.0, 0.0).is_err());
    /// assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    /// ```
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        validate(lat, lon)?;
        Ok(Self { lat, lon })
    }

    /// Latitude in decimal degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in decimal degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl TryFrom<(f64, f64)> for Coordinate {
    type Error = RouteError;

    /// Convert a `(lat, lon)` tuple.
    fn try_from((lat, lon): (f64, f64)) -> Result<Self> {
        Self::new(lat, lon)
    }
}

/// Validate a latitude/longitude pair without building a [`Coordinate`].
pub fn validate(lat: f64, lon: f64) -> Result<()> {
    if !lat.is_finite() || !lon.is_finite() {
        return Err(RouteError::NonFiniteCoordinate { lat, lon });
    }
    if !LATITUDE_RANGE.contains(&lat) || !LONGITUDE_RANGE.contains(&lon) {
        return Err(RouteError::OutOfBounds { lat, lon });
    }
    Ok(())
}
