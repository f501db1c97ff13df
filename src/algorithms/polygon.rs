//! Footprint polygons and boundary-inclusive point membership
//!
//! Vertices are treated as planar (lng = x, lat = y). Building footprints
//! span a few hundred meters at most, where the planar and geodesic edge
//! tests agree well below sensor accuracy.

use nalgebra::Vector2;

use crate::core::{GeoBounds, GeoPoint, MIN_POLYGON_POINTS};
use crate::validation::error::{NavResult, NavigationError};

/// Distance (degrees) within which a point counts as lying on an edge (~0.1 mm)
pub const BOUNDARY_TOLERANCE_DEG: f64 = 1e-9;

/// Smallest enclosed area (square degrees) accepted for a footprint
const MIN_AREA_SQ_DEG: f64 = BOUNDARY_TOLERANCE_DEG * BOUNDARY_TOLERANCE_DEG;

/// Closed polygon used for interior-point tests
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<GeoPoint>,
    envelope: GeoBounds,
}

impl Polygon {
    /// Build a polygon, rejecting fewer than three distinct vertices or a
    /// footprint that encloses no area.
    ///
    /// A closing vertex equal to the first one is dropped.
    pub fn new(points: Vec<GeoPoint>) -> NavResult<Self> {
        let mut vertices = points;
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        let mut distinct: Vec<GeoPoint> = Vec::with_capacity(vertices.len());
        for point in &vertices {
            if !point.lat.is_finite() || !point.lng.is_finite() {
                return Err(NavigationError::configuration(format!(
                    "polygon vertex ({}, {}) is not finite",
                    point.lat, point.lng
                )));
            }
            if !distinct.contains(point) {
                distinct.push(*point);
            }
        }

        if distinct.len() < MIN_POLYGON_POINTS {
            return Err(NavigationError::configuration(format!(
                "polygon needs at least {} distinct points, got {}",
                MIN_POLYGON_POINTS,
                distinct.len()
            )));
        }

        if signed_area(&vertices).abs() <= MIN_AREA_SQ_DEG {
            return Err(NavigationError::configuration(format!(
                "polygon of {} points encloses no area (vertices are collinear)",
                distinct.len()
            )));
        }

        let envelope = envelope_of(&vertices);
        Ok(Self { vertices, envelope })
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    /// Axis-aligned box enclosing every vertex
    pub fn envelope(&self) -> &GeoBounds {
        &self.envelope
    }

    /// Ray-casting membership test; points on an edge or vertex are inside.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        if !self.envelope.padded(BOUNDARY_TOLERANCE_DEG).contains(point) {
            return false;
        }

        let n = self.vertices.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = &self.vertices[j];
            let b = &self.vertices[i];

            if distance_to_segment(point, a, b) <= BOUNDARY_TOLERANCE_DEG {
                return true;
            }

            if (b.lat > point.lat) != (a.lat > point.lat)
                && point.lng < (a.lng - b.lng) * (point.lat - b.lat) / (a.lat - b.lat) + b.lng
            {
                inside = !inside;
            }
            j = i;
        }

        inside
    }
}

fn envelope_of(points: &[GeoPoint]) -> GeoBounds {
    let mut south_west = points[0];
    let mut north_east = points[0];
    for p in &points[1..] {
        south_west.lat = south_west.lat.min(p.lat);
        south_west.lng = south_west.lng.min(p.lng);
        north_east.lat = north_east.lat.max(p.lat);
        north_east.lng = north_east.lng.max(p.lng);
    }
    GeoBounds::new(south_west, north_east)
}

/// Shoelace area in square degrees, taken relative to the first vertex so
/// products stay small at real coordinates
fn signed_area(points: &[GeoPoint]) -> f64 {
    let origin = Vector2::new(points[0].lng, points[0].lat);
    let relative: Vec<Vector2<f64>> = points
        .iter()
        .map(|p| Vector2::new(p.lng, p.lat) - origin)
        .collect();

    let mut twice_area = 0.0;
    for (i, a) in relative.iter().enumerate() {
        let b = &relative[(i + 1) % relative.len()];
        twice_area += a.x * b.y - b.x * a.y;
    }
    twice_area / 2.0
}

/// Planar distance in degrees from `p` to the segment `a`-`b`
fn distance_to_segment(p: &GeoPoint, a: &GeoPoint, b: &GeoPoint) -> f64 {
    let p = Vector2::new(p.lng, p.lat);
    let a = Vector2::new(a.lng, a.lat);
    let b = Vector2::new(b.lng, b.lat);

    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return (p - a).norm();
    }

    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}
