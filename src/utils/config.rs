use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::algorithms::polygon::Polygon;
use crate::core::{GeoBounds, GeoPoint, DEFAULT_TIMED_UPDATE_INTERVAL_MS, DEFAULT_UPDATE_INTERVAL_MS};
use crate::indoor::view::{ImageRef, IndoorView};
use crate::validation::error::{NavResult, NavigationError};

/// Settings for a recording session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Refresh period of the live update loop (milliseconds)
    pub update_interval_ms: u32,
    /// Refresh period when the recording runs under a countdown limit (milliseconds)
    pub timed_update_interval_ms: u32,
    /// Stop recording after this long (milliseconds); `None` records until stopped
    pub recording_limit_ms: Option<u64>,
    /// Select floors automatically from the measured elevation
    pub auto_elevation: bool,
    /// Fallback start position when no GNSS fix is supplied
    pub initial_position: Option<GeoPoint>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
            timed_update_interval_ms: DEFAULT_TIMED_UPDATE_INTERVAL_MS,
            recording_limit_ms: None,
            auto_elevation: false,
            initial_position: None,
        }
    }
}

/// One floor plan of a building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorConfig {
    /// Unique indoor view identifier, e.g. "nucleus_2f"
    pub id: String,
    /// Southwest corner of the overlay image
    pub south_west: GeoPoint,
    /// Northeast corner of the overlay image
    pub north_east: GeoPoint,
    /// Approximate floor height (meters)
    #[serde(default)]
    pub elevation: Option<f64>,
    /// Floor-plan raster handed to the renderer
    pub image: String,
}

/// A building footprint and its floors, lowest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingConfig {
    pub name: String,
    /// Detection polygon shared by every floor
    pub footprint: Vec<GeoPoint>,
    pub floors: Vec<FloorConfig>,
}

/// Configuration validation result
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether configuration is valid
    pub is_valid: bool,
    /// Validation errors
    pub errors: Vec<NavigationError>,
    /// Validation warnings
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn from_parts(errors: Vec<NavigationError>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    fn into_first_error(self) -> NavResult<Vec<String>> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.warnings),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ConfigFileData {
    #[serde(default)]
    session: SessionConfig,
    #[serde(default)]
    buildings: Vec<BuildingConfig>,
}

/// Loads, validates and saves the navigation configuration
pub struct ConfigurationManager {
    session: SessionConfig,
    /// Buildings in catalog order
    buildings: Vec<BuildingConfig>,
    config_file_path: Option<String>,
    is_modified: bool,
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationManager {
    /// Create a configuration manager with default settings and no buildings
    pub fn new() -> Self {
        Self {
            session: SessionConfig::default(),
            buildings: Vec::new(),
            config_file_path: None,
            is_modified: false,
        }
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> NavResult<Self> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    /// Create configuration manager from a JSON document
    pub fn from_json_str(content: &str) -> NavResult<Self> {
        let data: ConfigFileData = serde_json::from_str(content)?;
        let mut manager = Self::new();
        manager.apply(data)?;
        Ok(manager)
    }

    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    pub fn buildings(&self) -> &[BuildingConfig] {
        &self.buildings
    }

    pub fn set_auto_elevation(&mut self, enabled: bool) {
        if self.session.auto_elevation != enabled {
            self.session.auto_elevation = enabled;
            self.is_modified = true;
        }
    }

    pub fn set_initial_position(&mut self, position: GeoPoint) -> NavResult<()> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        Self::check_position(&position, &mut errors, &mut warnings);
        ValidationResult::from_parts(errors, warnings).into_first_error()?;

        self.session.initial_position = Some(position);
        self.is_modified = true;
        Ok(())
    }

    /// Append a building after validating it against the existing catalog
    pub fn add_building(&mut self, building: BuildingConfig) -> NavResult<()> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        Self::check_building(&building, &mut errors, &mut warnings);

        for floor in &building.floors {
            let clash = self
                .buildings
                .iter()
                .flat_map(|b| b.floors.iter())
                .any(|existing| existing.id == floor.id);
            if clash {
                errors.push(NavigationError::configuration(format!(
                    "duplicate indoor view id '{}'",
                    floor.id
                )));
            }
        }

        for warning in ValidationResult::from_parts(errors, warnings).into_first_error()? {
            warn!(building = %building.name, "{}", warning);
        }

        self.buildings.push(building);
        self.is_modified = true;
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> NavResult<()> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| NavigationError::Io {
            path: path_str.clone(),
            message: e.to_string(),
        })?;

        let data: ConfigFileData = serde_json::from_str(&content).map_err(|e| NavigationError::Serialization {
            message: format!("failed to parse config file '{}': {}", path_str, e),
        })?;

        self.apply(data)?;
        self.config_file_path = Some(path_str);
        Ok(())
    }

    /// Save configuration to JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> NavResult<()> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let data = ConfigFileData {
            session: self.session.clone(),
            buildings: self.buildings.clone(),
        };
        let content = serde_json::to_string_pretty(&data)?;

        fs::write(&path, content).map_err(|e| NavigationError::Io {
            path: path_str.clone(),
            message: e.to_string(),
        })?;

        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save to the currently loaded file path
    pub fn save(&mut self) -> NavResult<()> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(NavigationError::Io {
                path: String::new(),
                message: "no file path set for saving configuration".to_string(),
            }),
        }
    }

    /// Check if configuration has been modified since last save
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Validate session settings and the building catalog
    pub fn validate(&self) -> ValidationResult {
        Self::validate_parts(&self.session, &self.buildings)
    }

    /// Build the indoor view catalog: buildings in order, floors lowest first.
    ///
    /// Fails on the first validation error; warnings are logged.
    pub fn load_catalog(&self) -> NavResult<Vec<IndoorView>> {
        for warning in self.validate().into_first_error()? {
            warn!("{}", warning);
        }

        let mut catalog = Vec::new();
        for building in &self.buildings {
            let footprint = Arc::new(Polygon::new(building.footprint.clone())?);
            for floor in &building.floors {
                catalog.push(IndoorView::new(
                    floor.id.clone(),
                    GeoBounds::new(floor.south_west, floor.north_east),
                    footprint.clone(),
                    floor.elevation,
                    ImageRef::new(floor.image.clone()),
                ));
            }
        }

        info!(buildings = self.buildings.len(), views = catalog.len(), "indoor view catalog loaded");
        Ok(catalog)
    }

    fn apply(&mut self, data: ConfigFileData) -> NavResult<()> {
        let warnings = Self::validate_parts(&data.session, &data.buildings).into_first_error()?;
        for warning in warnings {
            warn!("{}", warning);
        }

        self.session = data.session;
        self.buildings = data.buildings;
        self.is_modified = false;
        Ok(())
    }

    fn validate_parts(session: &SessionConfig, buildings: &[BuildingConfig]) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if session.update_interval_ms == 0 {
            errors.push(NavigationError::configuration("update_interval_ms must be positive"));
        }
        if session.timed_update_interval_ms == 0 {
            errors.push(NavigationError::configuration("timed_update_interval_ms must be positive"));
        }
        if session.recording_limit_ms == Some(0) {
            errors.push(NavigationError::configuration("recording_limit_ms must be positive when set"));
        }
        if let Some(position) = &session.initial_position {
            Self::check_position(position, &mut errors, &mut warnings);
        }

        if buildings.is_empty() {
            errors.push(NavigationError::configuration("indoor view catalog is empty"));
        }

        let mut seen = HashSet::new();
        for building in buildings {
            Self::check_building(building, &mut errors, &mut warnings);
            for floor in &building.floors {
                if !seen.insert(floor.id.as_str()) {
                    errors.push(NavigationError::configuration(format!(
                        "duplicate indoor view id '{}'",
                        floor.id
                    )));
                }
            }
        }

        if session.auto_elevation
            && buildings
                .iter()
                .flat_map(|b| b.floors.iter())
                .any(|floor| floor.elevation.is_none())
        {
            warnings.push("auto_elevation is enabled but some floors have no elevation".to_string());
        }

        ValidationResult::from_parts(errors, warnings)
    }

    fn check_position(position: &GeoPoint, errors: &mut Vec<NavigationError>, warnings: &mut Vec<String>) {
        if !(-90.0..=90.0).contains(&position.lat) {
            errors.push(NavigationError::configuration(format!(
                "latitude {} must be between -90 and 90 degrees",
                position.lat
            )));
        } else if position.lat.abs() == 90.0 {
            warnings.push("start position at a pole: longitude updates are unbounded".to_string());
        }
        if !(-180.0..=180.0).contains(&position.lng) {
            errors.push(NavigationError::configuration(format!(
                "longitude {} must be between -180 and 180 degrees",
                position.lng
            )));
        }
    }

    fn check_building(building: &BuildingConfig, errors: &mut Vec<NavigationError>, warnings: &mut Vec<String>) {
        if let Err(err) = Polygon::new(building.footprint.clone()) {
            errors.push(NavigationError::configuration(format!(
                "building '{}' footprint: {}",
                building.name, err
            )));
        }

        if building.floors.is_empty() {
            errors.push(NavigationError::configuration(format!(
                "building '{}' has no floors",
                building.name
            )));
        }

        let mut floor_ids = HashSet::new();
        let mut last_elevation: Option<f64> = None;
        for floor in &building.floors {
            if floor.id.trim().is_empty() {
                errors.push(NavigationError::configuration(format!(
                    "building '{}' has a floor with an empty id",
                    building.name
                )));
            } else if !floor_ids.insert(floor.id.as_str()) {
                errors.push(NavigationError::configuration(format!(
                    "building '{}' lists floor id '{}' twice",
                    building.name, floor.id
                )));
            }

            if !GeoBounds::new(floor.south_west, floor.north_east).is_well_formed() {
                warnings.push(format!(
                    "floor '{}' bounds are not ordered southwest to northeast",
                    floor.id
                ));
            }

            if let Some(elevation) = floor.elevation {
                if !elevation.is_finite() {
                    errors.push(NavigationError::configuration(format!(
                        "floor '{}' elevation is not finite",
                        floor.id
                    )));
                    continue;
                }
                if last_elevation.is_some_and(|previous| elevation < previous) {
                    warnings.push(format!(
                        "floor '{}' is listed above a higher floor; navigation follows list order",
                        floor.id
                    ));
                }
                last_elevation = Some(elevation);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_building(name: &str, floor_count: usize) -> BuildingConfig {
        BuildingConfig {
            name: name.to_string(),
            footprint: vec![
                GeoPoint::new(55.9228, -3.1745),
                GeoPoint::new(55.9232, -3.1745),
                GeoPoint::new(55.9232, -3.1735),
                GeoPoint::new(55.9228, -3.1735),
            ],
            floors: (0..floor_count)
                .map(|level| FloorConfig {
                    id: format!("{}_{}f", name, level),
                    south_west: GeoPoint::new(55.9228, -3.1745),
                    north_east: GeoPoint::new(55.9232, -3.1735),
                    elevation: Some(level as f64 * 4.0),
                    image: format!("{}_{}f.png", name, level),
                })
                .collect(),
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("indoor_nav_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_default_session_config() {
        let config = SessionConfig::default();
        assert_eq!(config.update_interval_ms, 500);
        assert_eq!(config.timed_update_interval_ms, 1000);
        assert!(config.recording_limit_ms.is_none());
        assert!(!config.auto_elevation);
        assert!(config.initial_position.is_none());
    }

    #[test]
    fn test_configuration_manager_creation() {
        let manager = ConfigurationManager::new();
        assert!(manager.buildings().is_empty());
        assert!(!manager.is_modified());
        // No buildings yet
        assert!(!manager.validate().is_valid);
        assert!(matches!(manager.load_catalog(), Err(NavigationError::Configuration { .. })));
    }

    #[test]
    fn test_catalog_order_follows_configuration() {
        let mut manager = ConfigurationManager::new();
        manager.add_building(sample_building("nucleus", 3)).unwrap();
        manager.add_building(sample_building("library", 2)).unwrap();
        assert!(manager.is_modified());

        let catalog = manager.load_catalog().unwrap();
        let ids: Vec<&str> = catalog.iter().map(|v| v.id()).collect();
        assert_eq!(ids, vec!["nucleus_0f", "nucleus_1f", "nucleus_2f", "library_0f", "library_1f"]);
        assert!(catalog[0].same_building(&catalog[2]));
        assert!(!catalog[0].same_building(&catalog[3]));
        assert_eq!(catalog[1].elevation(), Some(4.0));
    }

    #[test]
    fn test_invalid_buildings_rejected() {
        let mut manager = ConfigurationManager::new();

        let mut degenerate = sample_building("shed", 1);
        degenerate.footprint.truncate(2);
        assert!(manager.add_building(degenerate).is_err());

        assert!(manager.add_building(sample_building("empty", 0)).is_err());

        manager.add_building(sample_building("nucleus", 1)).unwrap();
        let duplicate = sample_building("nucleus", 1);
        assert!(manager.add_building(duplicate).is_err());
        assert_eq!(manager.buildings().len(), 1);
    }

    #[test]
    fn test_repeated_floor_id_within_building_rejected() {
        let mut manager = ConfigurationManager::new();
        let mut building = sample_building("annex", 2);
        building.floors[1].id = building.floors[0].id.clone();

        let err = manager.add_building(building).err().unwrap();
        assert!(err.to_string().contains("annex_0f"));
        assert!(manager.buildings().is_empty());
        assert!(!manager.is_modified());

        manager.add_building(sample_building("annex", 2)).unwrap();
        assert_eq!(manager.load_catalog().unwrap().len(), 2);
    }

    #[test]
    fn test_validation_warnings() {
        let mut manager = ConfigurationManager::new();
        let mut building = sample_building("tower", 2);
        building.floors[0].elevation = Some(10.0);
        building.floors[1].south_west = GeoPoint::new(56.0, -3.1745);
        building.floors[1].elevation = None;
        manager.add_building(building).unwrap();
        manager.set_auto_elevation(true);

        let result = manager.validate();
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 2);
        assert!(manager.load_catalog().is_ok());
    }

    #[test]
    fn test_invalid_intervals_and_positions() {
        let json = r#"{ "session": { "update_interval_ms": 0 }, "buildings": [] }"#;
        let err = ConfigurationManager::from_json_str(json).err().unwrap();
        assert!(err.to_string().contains("update_interval_ms"));

        let json = r#"{ "session": { "recording_limit_ms": 0 }, "buildings": [] }"#;
        let err = ConfigurationManager::from_json_str(json).err().unwrap();
        assert!(err.to_string().contains("recording_limit_ms"));

        let mut manager = ConfigurationManager::new();
        assert!(manager.set_initial_position(GeoPoint::new(95.0, 0.0)).is_err());
        assert!(manager.set_initial_position(GeoPoint::new(0.0, -181.0)).is_err());
        assert!(manager.set_initial_position(GeoPoint::new(55.9230, -3.1740)).is_ok());
        assert_eq!(manager.session().initial_position, Some(GeoPoint::new(55.9230, -3.1740)));
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "session": { "auto_elevation": true, "initial_position": { "lat": 55.923, "lng": -3.174 } },
            "buildings": [{
                "name": "hall",
                "footprint": [
                    { "lat": 55.9228, "lng": -3.1745 }, { "lat": 55.9232, "lng": -3.1745 },
                    { "lat": 55.9232, "lng": -3.1735 }, { "lat": 55.9228, "lng": -3.1735 },
                    { "lat": 55.9228, "lng": -3.1745 }
                ],
                "floors": [
                    { "id": "hall_gf", "south_west": { "lat": 55.9228, "lng": -3.1745 },
                      "north_east": { "lat": 55.9232, "lng": -3.1735 }, "elevation": 0.0, "image": "hall_gf.png" },
                    { "id": "hall_1f", "south_west": { "lat": 55.9228, "lng": -3.1745 },
                      "north_east": { "lat": 55.9232, "lng": -3.1735 }, "elevation": 4.2, "image": "hall_1f.png" }
                ]
            }]
        }"#;

        let manager = ConfigurationManager::from_json_str(json).unwrap();
        assert!(manager.session().auto_elevation);
        assert!(manager.session().recording_limit_ms.is_none());
        assert_eq!(manager.session().update_interval_ms, 500);

        let catalog = manager.load_catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[1].image().as_str(), "hall_1f.png");
        assert_eq!(catalog[0].footprint().vertices().len(), 4);
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = ConfigurationManager::from_json_str("{ buildings: ").err().unwrap();
        assert!(matches!(err, NavigationError::Serialization { .. }));
    }

    #[test]
    fn test_config_file_round_trip() {
        let mut manager = ConfigurationManager::new();
        manager.add_building(sample_building("nucleus", 2)).unwrap();
        manager.set_auto_elevation(true);

        let path = temp_path("round_trip");
        manager.save_to_file(&path).unwrap();
        assert!(!manager.is_modified());

        let loaded = ConfigurationManager::from_file(&path).unwrap();
        assert!(loaded.session().auto_elevation);
        assert_eq!(loaded.buildings(), manager.buildings());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_missing_file_and_unset_save_path() {
        let err = ConfigurationManager::from_file(temp_path("does_not_exist")).err().unwrap();
        assert!(matches!(err, NavigationError::Io { .. }));

        let mut manager = ConfigurationManager::new();
        assert!(manager.save().is_err());
    }
}
