//! Configuration loading and validation

pub mod config;

pub use config::{BuildingConfig, ConfigurationManager, FloorConfig, SessionConfig, ValidationResult};
