//! In-memory route storage.
//!
//! This module provides [`RouteStore`], the storage handle the HTTP service
//! holds in its application state. It is constructed explicitly (directly or
//! through [`RouteStoreBuilder`]) and passed to whoever needs it; there is no
//! global instance.
//!
//! ```ignore
//! use waypath::{Coordinate, NewRoute, RouteStore, Waypoint};
//!
//! let store = RouteStore::builder().max_waypoints(500).build();
//!
//! let route = store.create(NewRoute::new(
//!     "Morning run",
//!     vec![
//!         Waypoint::new(1, Coordinate::new(51.5074, -0.1278)?),
//!         Waypoint::new(2, Coordinate::new(51.5155, -0.0922)?),
//!     ],
//! ))?;
//!
//! println!("{}: {} m", route.name, route.reported_distance());
//! ```

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use crate::error::{Result, RouteError};
use crate::route::{NewRoute, Route};

/// Default per-route waypoint limit.
pub const DEFAULT_MAX_WAYPOINTS: usize = 10_000;

/// Statistics about stored data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of stored routes.
    pub route_count: u64,
    /// Number of waypoints across all routes.
    pub waypoint_count: u64,
}

impl StoreStats {
    /// Average number of waypoints per route.
    ///
    /// Returns 0.0 if the store is empty.
    pub fn mean_waypoints(&self) -> f64 {
        if self.route_count == 0 {
            0.0
        } else {
            self.waypoint_count as f64 / self.route_count as f64
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    /// Routes keyed by id; ordered so listings are stable.
    routes: BTreeMap<u64, Route>,
    /// Last id handed to a route.
    next_id: u64,
    /// Last id handed to a waypoint.
    next_waypoint_id: u64,
}

/// Thread-safe in-memory route store.
///
/// Every operation takes the lock for its own duration only and returns owned
/// snapshots, so callers never observe a route being modified mid-read.
#[derive(Debug)]
pub struct RouteStore {
    inner: RwLock<Inner>,
    max_waypoints: usize,
}

impl Default for RouteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteStore {
    /// Create an empty store with the default waypoint limit.
    pub fn new() -> Self {
        RouteStoreBuilder::new().build()
    }

    /// Create a builder for more configuration options.
    pub fn builder() -> RouteStoreBuilder {
        RouteStoreBuilder::new()
    }

    /// Maximum number of waypoints accepted per route.
    pub fn max_waypoints(&self) -> usize {
        self.max_waypoints
    }

    /// Validate and store a new route.
    ///
    /// Waypoints are sorted by sequence index before storage. The returned
    /// [`Route`] is a copy of what was stored.
    ///
    /// # Errors
    ///
    /// Any validation error from [`NewRoute::validate`], or
    /// [`RouteError::TooManyWaypoints`] if the route exceeds the store limit.
    pub fn create(&self, new_route: NewRoute) -> Result<Route> {
        new_route.validate()?;

        let count = new_route.waypoints.len();
        if count > self.max_waypoints {
            return Err(RouteError::TooManyWaypoints {
                count,
                limit: self.max_waypoints,
            });
        }

        let mut inner = self.write();
        inner.next_id += 1;
        let id = inner.next_id;
        let first_waypoint_id = inner.next_waypoint_id + 1;
        inner.next_waypoint_id += count as u64;
        let route = Route::from_new(id, first_waypoint_id, new_route, Utc::now());
        inner.routes.insert(id, route.clone());

        Ok(route)
    }

    /// All routes, in ascending id order.
    pub fn list(&self) -> Vec<Route> {
        self.read().routes.values().cloned().collect()
    }

    /// Fetch a single route.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::RouteNotFound`] if no route has this id.
    pub fn get(&self, id: u64) -> Result<Route> {
        self.read()
            .routes
            .get(&id)
            .cloned()
            .ok_or(RouteError::RouteNotFound { id })
    }

    /// Delete a route together with all of its waypoints.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::RouteNotFound`] if no route has this id.
    pub fn delete(&self, id: u64) -> Result<Route> {
        self.write()
            .routes
            .remove(&id)
            .ok_or(RouteError::RouteNotFound { id })
    }

    /// Number of stored routes.
    pub fn len(&self) -> usize {
        self.read().routes.len()
    }

    /// Whether the store holds no routes.
    pub fn is_empty(&self) -> bool {
        self.read().routes.is_empty()
    }

    /// Get storage statistics.
    pub fn stats(&self) -> StoreStats {
        let inner = self.read();
        StoreStats {
            route_count: inner.routes.len() as u64,
            waypoint_count: inner
                .routes
                .values()
                .map(|r| r.waypoint_count() as u64)
                .sum(),
        }
    }

    // Writes are single insert/remove calls, so a poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Builder for creating [`RouteStore`] with custom configuration.
///
/// # Example
///
/// ```
/// use waypath::RouteStoreBuilder;
///
/// let store = RouteStoreBuilder::new().max_waypoints(1000).build();
/// assert_eq!(store.max_waypoints(), 1000);
/// ```
#[derive(Debug, Clone)]
pub struct RouteStoreBuilder {
    max_waypoints: usize,
}

impl Default for RouteStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteStoreBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            max_waypoints: DEFAULT_MAX_WAYPOINTS,
        }
    }

    /// Create a builder configured from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `WAYPATH_MAX_WAYPOINTS` | Maximum waypoints per route | 10000 |
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Config`] if `WAYPATH_MAX_WAYPOINTS` is set but is
    /// not a positive integer.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::new();

        if let Ok(value) = std::env::var("WAYPATH_MAX_WAYPOINTS") {
            let max_waypoints = value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| {
                    RouteError::Config(format!(
                        "WAYPATH_MAX_WAYPOINTS must be a positive integer, got {value:?}"
                    ))
                })?;
            builder = builder.max_waypoints(max_waypoints);
        }

        Ok(builder)
    }

    /// Set the maximum number of waypoints accepted per route.
    ///
    /// Default is 10000.
    pub fn max_waypoints(mut self, limit: usize) -> Self {
        self.max_waypoints = limit;
        self
    }

    /// Build the [`RouteStore`].
    pub fn build(self) -> RouteStore {
        RouteStore {
            inner: RwLock::new(Inner::default()),
            max_waypoints: self.max_waypoints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::Coordinate;
    use crate::route::Waypoint;
    use std::sync::Arc;
    use std::thread;

    fn waypoint(sequence: u32, lat: f64, lon: f64) -> Waypoint {
        Waypoint::new(sequence, Coordinate::new(lat, lon).unwrap())
    }

    fn l_shape(name: &str) -> NewRoute {
        NewRoute::new(
            name,
            vec![
                waypoint(2, 0.0, 1.0),
                waypoint(1, 0.0, 0.0),
                waypoint(3, 1.0, 1.0),
            ],
        )
    }

    #[test]
    fn test_create_and_get() {
        let store = RouteStore::new();
        let created = store.create(l_shape("L")).unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.name, "L");
        assert_eq!(created.waypoints()[0].sequence, 1);

        let fetched = store.get(created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(
            fetched.total_distance().to_bits(),
            created.total_distance().to_bits()
        );
    }

    #[test]
    fn test_ids_increase() {
        let store = RouteStore::new();
        let a = store.create(l_shape("a")).unwrap();
        let b = store.create(l_shape("b")).unwrap();
        store.delete(a.id).unwrap();
        let c = store.create(l_shape("c")).unwrap();

        assert_eq!((a.id, b.id, c.id), (1, 2, 3));
    }

    #[test]
    fn test_waypoint_ids_unique_across_routes() {
        let store = RouteStore::new();
        let a = store.create(l_shape("a")).unwrap();
        store.delete(a.id).unwrap();
        let b = store.create(l_shape("b")).unwrap();

        let a_ids: Vec<u64> = a.waypoints_with_ids().map(|(id, _)| id).collect();
        let b_ids: Vec<u64> = b.waypoints_with_ids().map(|(id, _)| id).collect();
        assert_eq!(a_ids, vec![1, 2, 3]);
        assert_eq!(b_ids, vec![4, 5, 6]);
        assert_eq!(store.get(b.id).unwrap(), b);
    }

    #[test]
    fn test_create_rejects_invalid() {
        let store = RouteStore::new();
        assert_eq!(
            store.create(NewRoute::new("Empty", vec![])),
            Err(RouteError::EmptyRoute)
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_max_waypoints() {
        let store = RouteStore::builder().max_waypoints(2).build();
        assert_eq!(
            store.create(l_shape("L")),
            Err(RouteError::TooManyWaypoints { count: 3, limit: 2 })
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_get_missing() {
        let store = RouteStore::new();
        assert_eq!(store.get(99), Err(RouteError::RouteNotFound { id: 99 }));
    }

    #[test]
    fn test_list_in_id_order() {
        let store = RouteStore::new();
        for name in ["first", "second", "third"] {
            store.create(l_shape(name)).unwrap();
        }

        let names: Vec<String> = store.list().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_delete_cascades_waypoints() {
        let store = RouteStore::new();
        let route = store.create(l_shape("L")).unwrap();
        store.create(l_shape("M")).unwrap();
        assert_eq!(store.stats().waypoint_count, 6);

        let removed = store.delete(route.id).unwrap();
        assert_eq!(removed.id, route.id);

        let stats = store.stats();
        assert_eq!(stats.route_count, 1);
        assert_eq!(stats.waypoint_count, 3);
        assert_eq!(store.get(route.id), Err(RouteError::RouteNotFound { id: 1 }));
        assert_eq!(
            store.delete(route.id),
            Err(RouteError::RouteNotFound { id: 1 })
        );
    }

    #[test]
    fn test_stats() {
        let store = RouteStore::new();
        assert_eq!(store.stats(), StoreStats::default());
        assert_eq!(store.stats().mean_waypoints(), 0.0);

        store.create(l_shape("L")).unwrap();
        store
            .create(NewRoute::new("P", vec![waypoint(1, 0.0, 0.0)]))
            .unwrap();

        let stats = store.stats();
        assert_eq!(stats.route_count, 2);
        assert_eq!(stats.waypoint_count, 4);
        assert_eq!(stats.mean_waypoints(), 2.0);
    }

    #[test]
    fn test_concurrent_creates() {
        let store = Arc::new(RouteStore::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for j in 0..25 {
                        store.create(l_shape(&format!("r{i}-{j}"))).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 200);
        let ids: Vec<u64> = store.list().iter().map(|r| r.id).collect();
        assert_eq!(ids, (1..=200).collect::<Vec<_>>());
    }

    #[test]
    fn test_builder_defaults() {
        let store = RouteStoreBuilder::default().build();
        assert_eq!(store.max_waypoints(), DEFAULT_MAX_WAYPOINTS);
    }

    #[test]
    fn test_from_env() {
        // Single test mutates the variable to avoid races between tests
        std::env::remove_var("WAYPATH_MAX_WAYPOINTS");
        let store = RouteStoreBuilder::from_env().unwrap().build();
        assert_eq!(store.max_waypoints(), DEFAULT_MAX_WAYPOINTS);

        std::env::set_var("WAYPATH_MAX_WAYPOINTS", "250");
        let store = RouteStoreBuilder::from_env().unwrap().build();
        assert_eq!(store.max_waypoints(), 250);

        std::env::set_var("WAYPATH_MAX_WAYPOINTS", "zero");
        assert!(matches!(
            RouteStoreBuilder::from_env(),
            Err(RouteError::Config(_))
        ));

        std::env::set_var("WAYPATH_MAX_WAYPOINTS", "0");
        assert!(RouteStoreBuilder::from_env().is_err());

        std::env::remove_var("WAYPATH_MAX_WAYPOINTS");
    }
}
