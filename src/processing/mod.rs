//! Sensor sample processing

pub mod pdr;

pub use pdr::{Displacement, PdrIntegrator, PdrSample};
