//! Core navigation algorithms

pub mod dead_reckoning;
pub mod polygon;

pub use dead_reckoning::PositionEstimator;
pub use polygon::Polygon;
