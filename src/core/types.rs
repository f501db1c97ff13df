//! Core geographic data types for the navigation engine

use serde::{Deserialize, Serialize};

/// Geographic point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Rectangular bounding box used to place an overlay image on the map.
///
/// Corners are expected to satisfy `south_west <= north_east` on both axes,
/// but this is not enforced here; configuration validation reports it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south_west: GeoPoint,
    pub north_east: GeoPoint,
}

impl GeoBounds {
    pub fn new(south_west: GeoPoint, north_east: GeoPoint) -> Self {
        Self { south_west, north_east }
    }

    /// Whether the corners are ordered southwest to northeast
    pub fn is_well_formed(&self) -> bool {
        self.south_west.lat <= self.north_east.lat && self.south_west.lng <= self.north_east.lng
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Bounds grown by `margin` degrees on every side
    pub fn padded(&self, margin: f64) -> GeoBounds {
        GeoBounds {
            south_west: GeoPoint::new(self.south_west.lat - margin, self.south_west.lng - margin),
            north_east: GeoPoint::new(self.north_east.lat + margin, self.north_east.lng + margin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_contains_edges() {
        let bounds = GeoBounds::new(GeoPoint::new(55.922, -3.175), GeoPoint::new(55.923, -3.174));

        assert!(bounds.contains(&GeoPoint::new(55.9225, -3.1745)));
        assert!(bounds.contains(&GeoPoint::new(55.922, -3.175)));
        assert!(!bounds.contains(&GeoPoint::new(55.924, -3.1745)));
    }

    #[test]
    fn test_bounds_padding_and_ordering() {
        let bounds = GeoBounds::new(GeoPoint::new(10.0, 20.0), GeoPoint::new(12.0, 24.0));
        assert!(bounds.is_well_formed());
        assert!(!bounds.contains(&GeoPoint::new(12.5, 22.0)));

        let padded = bounds.padded(0.5);
        assert_eq!(padded.south_west, GeoPoint::new(9.5, 19.5));
        assert_eq!(padded.north_east, GeoPoint::new(12.5, 24.5));
        assert!(padded.contains(&GeoPoint::new(12.5, 22.0)));

        let inverted = GeoBounds::new(GeoPoint::new(12.0, 20.0), GeoPoint::new(10.0, 24.0));
        assert!(!inverted.is_well_formed());
    }

    #[test]
    fn test_geo_point_json_shape() {
        let json = serde_json::to_string(&GeoPoint::new(1.5, -2.25)).unwrap();
        assert_eq!(json, r#"{"lat":1.5,"lng":-2.25}"#);
    }
}
