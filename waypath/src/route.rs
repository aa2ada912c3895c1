//! Route and waypoint model.
//!
//! A [`NewRoute`] is what a caller submits: a name plus waypoints in any order.
//! Once validated and stored it becomes a [`Route`], whose waypoints are always
//! held in ascending sequence order and whose total distance is derived on
//! every read.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::coordinate::Coordinate;
use crate::distance::{round_distance, total_distance};
use crate::error::{Result, RouteError};

/// Maximum route name length, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// A coordinate with its position in a route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Position within the route, starting at 1.
    pub sequence: u32,
    /// Location of the waypoint.
    pub coordinate: Coordinate,
}

impl Waypoint {
    /// Create a new waypoint.
    pub fn new(sequence: u32, coordinate: Coordinate) -> Self {
        Self {
            sequence,
            coordinate,
        }
    }
}

/// Stable sort of waypoints by ascending sequence index.
pub fn sort_by_sequence(waypoints: &mut [Waypoint]) {
    waypoints.sort_by_key(|w| w.sequence);
}

/// A route submitted for creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRoute {
    /// Route name (1 to 100 characters).
    pub name: String,
    /// Waypoints, in any order.
    pub waypoints: Vec<Waypoint>,
}

impl NewRoute {
    /// Create a new route payload.
    pub fn new(name: impl Into<String>, waypoints: Vec<Waypoint>) -> Self {
        Self {
            name: name.into(),
            waypoints,
        }
    }

    /// Check the payload against the route invariants.
    ///
    /// # Errors
    ///
    /// - [`RouteError::InvalidName`] if the name is empty or longer than [`MAX_NAME_LEN`]
    /// - [`RouteError::EmptyRoute`] if there are no waypoints
    /// - [`RouteError::InvalidSequence`] if a sequence index is 0
    /// - [`RouteError::DuplicateSequence`] if two waypoints share an index
    pub fn validate(&self) -> Result<()> {
        let len = self.name.chars().count();
        if len == 0 || len > MAX_NAME_LEN {
            return Err(RouteError::InvalidName { len });
        }

        if self.waypoints.is_empty() {
            return Err(RouteError::EmptyRoute);
        }

        validate_sequences(&self.waypoints)
    }
}

/// Check that every sequence index is at least 1 and unique.
pub fn validate_sequences(waypoints: &[Waypoint]) -> Result<()> {
    let mut seen = HashSet::with_capacity(waypoints.len());
    for waypoint in waypoints {
        if waypoint.sequence == 0 {
            return Err(RouteError::InvalidSequence {
                order: waypoint.sequence,
            });
        }
        if !seen.insert(waypoint.sequence) {
            return Err(RouteError::DuplicateSequence {
                order: waypoint.sequence,
            });
        }
    }
    Ok(())
}

/// A stored route.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Identifier assigned by the store.
    pub id: u64,
    /// Route name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Waypoints, sorted by ascending sequence index.
    waypoints: Vec<Waypoint>,
    /// Store id of the first waypoint; the rest follow consecutively.
    first_waypoint_id: u64,
}

impl Route {
    /// Build a route from a validated payload, sorting its waypoints.
    pub(crate) fn from_new(
        id: u64,
        first_waypoint_id: u64,
        new_route: NewRoute,
        created_at: DateTime<Utc>,
    ) -> Self {
        let NewRoute {
            name,
            mut waypoints,
        } = new_route;
        sort_by_sequence(&mut waypoints);

        Self {
            id,
            name,
            created_at,
            waypoints,
            first_waypoint_id,
        }
    }

    /// Waypoints in ascending sequence order.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Waypoints paired with their store-assigned ids, in sequence order.
    ///
    /// Ids are unique across the whole store and never reused.
    pub fn waypoints_with_ids(&self) -> impl Iterator<Item = (u64, &Waypoint)> + '_ {
        (self.first_waypoint_id..).zip(self.waypoints.iter())
    }

    /// Number of waypoints.
    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    /// Coordinates in ascending sequence order.
    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.waypoints.iter().map(|w| w.coordinate).collect()
    }

    /// Total route length in meters, unrounded.
    ///
    /// Recomputed from the current waypoints on every call.
    pub fn total_distance(&self) -> f64 {
        total_distance(&self.coordinates())
    }

    /// Total route length in meters, rounded for presentation.
    pub fn reported_distance(&self) -> f64 {
        round_distance(self.total_distance())
    }
}
