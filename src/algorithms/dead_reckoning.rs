//! Dead-reckoning position estimation
//!
//! Converts per-tick displacements in meters into a running latitude/longitude
//! estimate using a local flat-earth approximation:
//! - latitude moves by `north / METERS_PER_DEGREE_LATITUDE`
//! - longitude moves by the same scale divided by `cos(latitude)` of the
//!   previous position, approximating meridian convergence
//!
//! The model is valid for campus-scale walks. It drifts over long traverses,
//! and at exactly +/-90 degrees latitude the longitude step is unbounded; the
//! poles are outside the operating envelope and are not special-cased.

use crate::core::{GeoPoint, METERS_PER_DEGREE_LATITUDE};

/// Running geographic position estimate
#[derive(Debug, Clone)]
pub struct PositionEstimator {
    position: GeoPoint,
    previous: GeoPoint,
    /// Marker rotation in degrees
    heading: f64,
    /// Every estimate since initialization, oldest first
    path: Vec<GeoPoint>,
}

impl PositionEstimator {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        let start = GeoPoint::new(latitude, longitude);
        Self {
            position: start,
            previous: start,
            heading: 0.0,
            path: vec![start],
        }
    }

    /// Reset the estimate to a fresh fix, discarding the walked path
    pub fn initialize(&mut self, latitude: f64, longitude: f64) {
        *self = Self::new(latitude, longitude);
    }

    /// Apply a displacement of `lat_distance_m` north and `lng_distance_m` east
    pub fn advance(&mut self, lat_distance_m: f64, lng_distance_m: f64) -> GeoPoint {
        self.previous = self.position;

        let lat = self.previous.lat + lat_distance_m / METERS_PER_DEGREE_LATITUDE;
        let lng = self.previous.lng
            + (lng_distance_m / METERS_PER_DEGREE_LATITUDE) / self.previous.lat.to_radians().cos();

        self.position = GeoPoint::new(lat, lng);
        self.path.push(self.position);
        self.position
    }

    /// Apply a displacement and record the heading used to rotate the marker
    pub fn update(&mut self, lat_distance_m: f64, lng_distance_m: f64, heading_deg: f64) -> GeoPoint {
        self.heading = heading_deg;
        self.advance(lat_distance_m, lng_distance_m)
    }

    pub fn position(&self) -> GeoPoint {
        self.position
    }

    pub fn previous_position(&self) -> GeoPoint {
        self.previous
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Points for the walked-path polyline.
    ///
    /// Holds one point per update for the lifetime of the recording, so the
    /// renderer can redraw the whole walk. `initialize` clears it; a recording
    /// limit bounds its length to limit / tick interval + 1.
    pub fn path(&self) -> &[GeoPoint] {
        &self.path
    }
}
