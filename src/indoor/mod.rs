//! Indoor floor-plan views and their tracking against the user's position

pub mod tracker;
pub mod view;

pub use tracker::{IndoorViewTracker, ViewUpdate};
pub use view::{ImageRef, IndoorView};
