//! Physical constants and system parameters

/// Mean Earth radius used by the flat-earth approximation (m)
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Meters spanned by one degree of latitude
pub const METERS_PER_DEGREE_LATITUDE: f64 = std::f64::consts::PI * EARTH_RADIUS_METERS / 180.0;

/// Refresh period of the live recording loop (ms)
pub const DEFAULT_UPDATE_INTERVAL_MS: u32 = 500;

/// Refresh period when the recording runs under a countdown limit (ms)
pub const DEFAULT_TIMED_UPDATE_INTERVAL_MS: u32 = 1000;

/// Minimum number of distinct vertices in a footprint polygon
pub const MIN_POLYGON_POINTS: usize = 3;
