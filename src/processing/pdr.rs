//! Pedestrian dead-reckoning sample integration
//!
//! The sensor-fusion layer reports the walked trajectory as cumulative
//! east/north offsets from the start of a recording. Each tick this module
//! turns the latest reading into the step taken since the previous one.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// One reading from the sensor-fusion layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PdrSample {
    /// Cumulative offset east of the start (m)
    pub x: f64,
    /// Cumulative offset north of the start (m)
    pub y: f64,
    /// Device orientation (radians, clockwise from north)
    #[serde(default)]
    pub heading: f64,
    /// Height relative to the start of the recording (m)
    #[serde(default)]
    pub elevation: f64,
}

impl PdrSample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, heading: 0.0, elevation: 0.0 }
    }

    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = heading;
        self
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = elevation;
        self
    }
}

/// Step taken between two consecutive readings
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Displacement {
    pub north_m: f64,
    pub east_m: f64,
    pub distance_m: f64,
}

/// Differences cumulative PDR readings and keeps the total distance walked
#[derive(Debug, Clone)]
pub struct PdrIntegrator {
    last: Vector2<f64>,
    distance_travelled: f64,
    samples: u64,
}

impl Default for PdrIntegrator {
    fn default() -> Self {
        Self {
            last: Vector2::zeros(),
            distance_travelled: 0.0,
            samples: 0,
        }
    }
}

impl PdrIntegrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a reading and return the step since the previous one
    pub fn push(&mut self, sample: &PdrSample) -> Displacement {
        let current = Vector2::new(sample.x, sample.y);
        let step = current - self.last;
        let distance = step.norm();

        self.last = current;
        self.distance_travelled += distance;
        self.samples += 1;

        Displacement {
            north_m: step.y,
            east_m: step.x,
            distance_m: distance,
        }
    }

    /// Total path length walked so far (m)
    pub fn distance_travelled(&self) -> f64 {
        self.distance_travelled
    }

    pub fn sample_count(&self) -> u64 {
        self.samples
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_measured_from_origin() {
        let mut integrator = PdrIntegrator::new();
        let step = integrator.push(&PdrSample::new(3.0, 4.0));

        assert_eq!(step.east_m, 3.0);
        assert_eq!(step.north_m, 4.0);
        assert!((step.distance_m - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_accumulates_path_length() {
        let mut integrator = PdrIntegrator::new();
        integrator.push(&PdrSample::new(0.0, 10.0));
        integrator.push(&PdrSample::new(10.0, 10.0));
        let back = integrator.push(&PdrSample::new(0.0, 10.0));

        assert_eq!(back.east_m, -10.0);
        assert_eq!(back.north_m, 0.0);
        // Path length, not net displacement
        assert!((integrator.distance_travelled() - 30.0).abs() < 1e-9);
        assert_eq!(integrator.sample_count(), 3);
    }

    #[test]
    fn test_stationary_samples_add_nothing() {
        let mut integrator = PdrIntegrator::new();
        integrator.push(&PdrSample::new(1.0, 1.0));
        let still = integrator.push(&PdrSample::new(1.0, 1.0));

        assert_eq!(still.distance_m, 0.0);
        assert!((integrator.distance_travelled() - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_reset() {
        let mut integrator = PdrIntegrator::new();
        integrator.push(&PdrSample::new(5.0, 0.0));
        integrator.reset();

        assert_eq!(integrator.distance_travelled(), 0.0);
        let step = integrator.push(&PdrSample::new(5.0, 0.0));
        assert_eq!(step.east_m, 5.0);
    }

    #[test]
    fn test_sample_defaults_when_deserializing() {
        let sample: PdrSample = serde_json::from_str(r#"{"x": 1.0, "y": 2.0}"#).unwrap();
        assert_eq!(sample, PdrSample::new(1.0, 2.0));

        let full: PdrSample =
            serde_json::from_str(r#"{"x": 1.0, "y": 2.0, "heading": 1.5, "elevation": 3.0}"#).unwrap();
        assert_eq!(full, PdrSample::new(1.0, 2.0).with_heading(1.5).with_elevation(3.0));
    }
}
