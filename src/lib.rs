//! Pedestrian Indoor Navigation
//!
//! Dead-reckoning position tracking with indoor floor-plan selection: walked
//! displacements are turned into a latitude/longitude estimate, and building
//! footprints decide which floor plans can be overlaid on the map.

pub mod core;
pub mod algorithms;
pub mod indoor;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use crate::core::{GeoBounds, GeoPoint, EARTH_RADIUS_METERS, METERS_PER_DEGREE_LATITUDE};
pub use algorithms::{Polygon, PositionEstimator};
pub use indoor::{ImageRef, IndoorView, IndoorViewTracker, ViewUpdate};
pub use processing::{Displacement, PdrIntegrator, PdrSample};
pub use validation::{NavResult, NavigationError};
pub use utils::{BuildingConfig, ConfigurationManager, FloorConfig, SessionConfig};
pub use api::{IndoorDisplay, NavigationSession, OutlineDisplay, SessionSnapshot};
