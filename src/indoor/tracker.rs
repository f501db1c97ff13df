//! Viewable indoor view tracking and floor navigation
//!
//! The tracker classifies every catalog view as viewable (the current
//! position lies inside its footprint) or unviewable, and keeps at most one
//! view selected for display. Floor navigation walks the viewable views in
//! catalog order, which lists each building's floors lowest first.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::algorithms::polygon::Polygon;
use crate::core::{GeoBounds, GeoPoint};
use crate::indoor::view::{ImageRef, IndoorView};
use crate::validation::error::{NavResult, NavigationError};

/// Outcome of a single `update_viewable_views` pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewUpdate {
    /// Views that became viewable, in catalog order
    pub entered: Vec<String>,
    /// Views that stopped being viewable, in catalog order
    pub left: Vec<String>,
    /// Whether the selected view changed
    pub current_changed: bool,
}

impl ViewUpdate {
    /// True when neither membership nor selection changed
    pub fn is_unchanged(&self) -> bool {
        self.entered.is_empty() && self.left.is_empty() && !self.current_changed
    }
}

/// Tracks which indoor views contain the user and which one is displayed
#[derive(Debug, Clone)]
pub struct IndoorViewTracker {
    /// Views in configuration order
    catalog: Vec<IndoorView>,
    /// Membership tag per catalog index; `false` means unviewable
    viewable: Vec<bool>,
    /// Catalog index of the displayed view
    current: Option<usize>,
}

impl IndoorViewTracker {
    /// Create a tracker with every view unviewable and nothing selected
    pub fn new(catalog: Vec<IndoorView>) -> NavResult<Self> {
        if catalog.is_empty() {
            return Err(NavigationError::configuration("indoor view catalog is empty"));
        }

        let mut seen = HashSet::new();
        for view in &catalog {
            if !seen.insert(view.id()) {
                return Err(NavigationError::configuration(format!(
                    "duplicate indoor view id '{}'",
                    view.id()
                )));
            }
        }

        let viewable = vec![false; catalog.len()];
        Ok(Self {
            catalog,
            viewable,
            current: None,
        })
    }

    /// All views in catalog order
    pub fn catalog(&self) -> &[IndoorView] {
        &self.catalog
    }

    /// Views whose footprint contains the last position, in catalog order
    pub fn viewable(&self) -> impl Iterator<Item = &IndoorView> + '_ {
        self.catalog
            .iter()
            .zip(&self.viewable)
            .filter(|&(_, &inside)| inside)
            .map(|(view, _)| view)
    }

    /// Views whose footprint does not contain the last position, in catalog order
    pub fn unviewable(&self) -> impl Iterator<Item = &IndoorView> + '_ {
        self.catalog
            .iter()
            .zip(&self.viewable)
            .filter(|&(_, &inside)| !inside)
            .map(|(view, _)| view)
    }

    /// Reclassify every view against `position` and refresh the selection.
    ///
    /// With `auto_elevation` set, the viewable floor closest to
    /// `current_elevation` is selected (first in catalog order on ties).
    /// Otherwise the selection only moves when the selected view stops being
    /// viewable or nothing is selected yet. When nothing is viewable the
    /// previous selection is kept; gate rendering on `is_viewable`.
    pub fn update_viewable_views(
        &mut self,
        position: &GeoPoint,
        auto_elevation: bool,
        current_elevation: f64,
    ) -> ViewUpdate {
        let snapshot = self.viewable.clone();
        let inside = self.footprint_hits(position);

        let mut update = ViewUpdate::default();
        for (idx, (&was_viewable, &is_inside)) in snapshot.iter().zip(&inside).enumerate() {
            if !was_viewable && is_inside {
                self.viewable[idx] = true;
                update.entered.push(self.catalog[idx].id().to_string());
            } else if was_viewable && !is_inside {
                self.viewable[idx] = false;
                update.left.push(self.catalog[idx].id().to_string());
            }
        }

        let previous = self.current;
        if self.is_viewable() {
            let nearest = if auto_elevation {
                self.nearest_elevation(current_elevation)
            } else {
                None
            };

            match nearest {
                Some(idx) if self.current != Some(idx) => self.current = Some(idx),
                Some(_) => {}
                None => {
                    if !self.current.is_some_and(|idx| self.viewable[idx]) {
                        self.current = self.first_viewable();
                    }
                }
            }
        }
        update.current_changed = previous != self.current;

        if !update.entered.is_empty() || !update.left.is_empty() {
            debug!(
                lat = position.lat,
                lng = position.lng,
                entered = ?update.entered,
                left = ?update.left,
                "indoor view membership changed"
            );
        }
        if update.current_changed {
            info!(view = self.current_id().unwrap_or("none"), "displayed indoor view changed");
        }

        update
    }

    /// Select the next viewable view in catalog order, if any
    pub fn show_next(&mut self) -> NavResult<&IndoorView> {
        let current = self.current.ok_or(NavigationError::NoActiveView)?;
        if let Some(next) = self.successor(current) {
            self.current = Some(next);
            debug!(view = self.catalog[next].id(), "moved to next floor");
        }
        self.current_view()
    }

    /// Select the previous viewable view in catalog order, if any
    pub fn show_prev(&mut self) -> NavResult<&IndoorView> {
        let current = self.current.ok_or(NavigationError::NoActiveView)?;
        if let Some(prev) = self.predecessor(current) {
            self.current = Some(prev);
            debug!(view = self.catalog[prev].id(), "moved to previous floor");
        }
        self.current_view()
    }

    /// Whether `show_next` would move; false when nothing is selected
    pub fn has_next(&self) -> bool {
        self.current.and_then(|idx| self.successor(idx)).is_some()
    }

    /// Whether `show_prev` would move; false when nothing is selected
    pub fn has_prev(&self) -> bool {
        self.current.and_then(|idx| self.predecessor(idx)).is_some()
    }

    /// Whether any view contains the last position
    pub fn is_viewable(&self) -> bool {
        self.viewable.iter().any(|&inside| inside)
    }

    pub fn current_view(&self) -> NavResult<&IndoorView> {
        self.current
            .map(|idx| &self.catalog[idx])
            .ok_or(NavigationError::NoActiveView)
    }

    pub fn current_id(&self) -> NavResult<&str> {
        self.current_view().map(IndoorView::id)
    }

    pub fn current_bounds(&self) -> NavResult<&GeoBounds> {
        self.current_view().map(IndoorView::bounds)
    }

    pub fn current_image(&self) -> NavResult<&ImageRef> {
        self.current_view().map(IndoorView::image)
    }

    /// Footprint membership per catalog index; shared footprints are tested once
    fn footprint_hits(&self, position: &GeoPoint) -> Vec<bool> {
        let mut tested: Vec<(*const Polygon, bool)> = Vec::new();
        self.catalog
            .iter()
            .map(|view| {
                let key = Arc::as_ptr(view.footprint_handle());
                match tested.iter().find(|(footprint, _)| *footprint == key) {
                    Some(&(_, hit)) => hit,
                    None => {
                        let hit = view.is_location_in_view(position);
                        tested.push((key, hit));
                        hit
                    }
                }
            })
            .collect()
    }

    fn first_viewable(&self) -> Option<usize> {
        self.viewable.iter().position(|&inside| inside)
    }

    fn nearest_elevation(&self, elevation: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, view) in self.catalog.iter().enumerate() {
            if !self.viewable[idx] {
                continue;
            }
            let Some(floor) = view.elevation() else {
                continue;
            };
            let distance = (floor - elevation).abs();
            if best.map_or(true, |(_, closest)| distance < closest) {
                best = Some((idx, distance));
            }
        }
        best.map(|(idx, _)| idx)
    }

    fn successor(&self, idx: usize) -> Option<usize> {
        (idx + 1..self.catalog.len()).find(|&i| self.viewable[i])
    }

    fn predecessor(&self, idx: usize) -> Option<usize> {
        (0..idx).rev().find(|&i| self.viewable[i])
    }
}
