//! Indoor views: one floor plan of one building

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::algorithms::polygon::Polygon;
use crate::core::{GeoBounds, GeoPoint};

/// Opaque handle to a floor-plan raster, passed through to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A single floor of a building that can be overlaid on the map
#[derive(Debug, Clone)]
pub struct IndoorView {
    id: String,
    bounds: GeoBounds,
    /// Detection area, shared by every floor of the building
    footprint: Arc<Polygon>,
    /// Approximate floor height (m)
    elevation: Option<f64>,
    image: ImageRef,
}

impl IndoorView {
    pub fn new(
        id: impl Into<String>,
        bounds: GeoBounds,
        footprint: Arc<Polygon>,
        elevation: Option<f64>,
        image: ImageRef,
    ) -> Self {
        Self {
            id: id.into(),
            bounds,
            footprint,
            elevation,
            image,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    pub fn footprint(&self) -> &Polygon {
        &self.footprint
    }

    pub(crate) fn footprint_handle(&self) -> &Arc<Polygon> {
        &self.footprint
    }

    /// Whether this view shares its footprint with `other` (same building)
    pub fn same_building(&self, other: &IndoorView) -> bool {
        Arc::ptr_eq(&self.footprint, &other.footprint)
    }

    pub fn elevation(&self) -> Option<f64> {
        self.elevation
    }

    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    /// Whether `location` falls inside the footprint (edges included)
    pub fn is_location_in_view(&self, location: &GeoPoint) -> bool {
        self.footprint.contains(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn footprint() -> Arc<Polygon> {
        Arc::new(
            Polygon::new(vec![
                GeoPoint::new(55.9228, -3.1745),
                GeoPoint::new(55.9232, -3.1745),
                GeoPoint::new(55.9232, -3.1735),
                GeoPoint::new(55.9228, -3.1735),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_view_location_membership() {
        let bounds = GeoBounds::new(GeoPoint::new(55.9228, -3.1745), GeoPoint::new(55.9232, -3.1735));
        let view = IndoorView::new("library_gf", bounds, footprint(), Some(0.0), ImageRef::new("library_gf.png"));

        assert_eq!(view.id(), "library_gf");
        assert_eq!(view.image().as_str(), "library_gf.png");
        assert!(view.is_location_in_view(&GeoPoint::new(55.9230, -3.1740)));
        assert!(!view.is_location_in_view(&GeoPoint::new(55.9240, -3.1740)));
    }

    #[test]
    fn test_same_building_detection() {
        let bounds = GeoBounds::new(GeoPoint::new(55.9228, -3.1745), GeoPoint::new(55.9232, -3.1735));
        let shared = footprint();
        let ground = IndoorView::new("a_gf", bounds, shared.clone(), Some(0.0), ImageRef::new("a_gf"));
        let first = IndoorView::new("a_1f", bounds, shared, Some(4.0), ImageRef::new("a_1f"));
        let other = IndoorView::new("b_gf", bounds, footprint(), Some(0.0), ImageRef::new("b_gf"));

        assert!(ground.same_building(&first));
        assert!(!ground.same_building(&other));
    }
}
