//! Recording session: composes PDR integration, position estimation and
//! indoor view tracking into a single per-tick update.
//!
//! The host UI drives `tick` from its refresh timer and renders the returned
//! snapshot: marker position and rotation, path polyline, indoor overlay,
//! building outlines and floor up/down controls.
//!
//! With a recording limit configured the session runs on the timed refresh
//! interval, reports the time remaining and stops taking samples once the
//! limit is reached.

use serde::Serialize;
use tracing::{debug, info};

use crate::algorithms::dead_reckoning::PositionEstimator;
use crate::core::{GeoBounds, GeoPoint};
use crate::indoor::tracker::IndoorViewTracker;
use crate::indoor::view::{ImageRef, IndoorView};
use crate::processing::pdr::{PdrIntegrator, PdrSample};
use crate::utils::config::{ConfigurationManager, SessionConfig};
use crate::validation::error::{NavResult, NavigationError};

/// Indoor overlay state for the renderer and floor controls
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndoorDisplay {
    /// At least one indoor view contains the position
    pub available: bool,
    /// The overlay is switched on
    pub enabled: bool,
    pub view_id: Option<String>,
    pub bounds: Option<GeoBounds>,
    pub image: Option<ImageRef>,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Building outline layer; footprints are listed only while it is shown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlineDisplay {
    pub enabled: bool,
    /// One footprint per building, catalog order
    pub footprints: Vec<Vec<GeoPoint>>,
}

/// Everything the UI needs after one update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub tick: u64,
    pub elapsed_ms: u64,
    /// Time left before the recording stops, when a limit is set
    pub remaining_ms: Option<u64>,
    /// The recording limit has been reached; further samples are ignored
    pub expired: bool,
    pub position: GeoPoint,
    /// Marker rotation (degrees)
    pub heading_deg: f64,
    pub distance_travelled_m: f64,
    pub elevation_m: f64,
    pub indoor: IndoorDisplay,
    pub outlines: OutlineDisplay,
}

/// A single recording session from an initial fix
pub struct NavigationSession {
    config: SessionConfig,
    estimator: PositionEstimator,
    integrator: PdrIntegrator,
    tracker: IndoorViewTracker,
    footprints: Vec<Vec<GeoPoint>>,
    indoor_enabled: bool,
    outlines_enabled: bool,
    elevation: f64,
}

impl NavigationSession {
    /// Start a session at `start` over the given catalog
    pub fn new(config: SessionConfig, catalog: Vec<IndoorView>, start: GeoPoint) -> NavResult<Self> {
        let tracker = IndoorViewTracker::new(catalog)?;
        info!(
            lat = start.lat,
            lng = start.lng,
            views = tracker.catalog().len(),
            auto_elevation = config.auto_elevation,
            recording_limit_ms = config.recording_limit_ms,
            "navigation session started"
        );

        let footprints = building_footprints(tracker.catalog());
        let mut session = Self {
            config,
            estimator: PositionEstimator::new(start.lat, start.lng),
            integrator: PdrIntegrator::new(),
            tracker,
            footprints,
            indoor_enabled: false,
            outlines_enabled: false,
            elevation: 0.0,
        };
        session.refresh_views();
        Ok(session)
    }

    /// Start a session from a loaded configuration.
    ///
    /// `start` is the GNSS fix; the configured initial position is used when absent.
    pub fn from_config(manager: &ConfigurationManager, start: Option<GeoPoint>) -> NavResult<Self> {
        let start = start
            .or(manager.session().initial_position)
            .ok_or_else(|| NavigationError::configuration("no start position: supply a fix or set initial_position"))?;
        Self::new(manager.session().clone(), manager.load_catalog()?, start)
    }

    /// Run every sample through a fresh tick, collecting the snapshots
    pub fn replay(&mut self, samples: &[PdrSample]) -> Vec<SessionSnapshot> {
        samples.iter().map(|sample| self.tick(sample)).collect()
    }

    /// Process one sensor sample and return the resulting state.
    ///
    /// Once the recording limit is reached the sample is dropped and the
    /// final state is returned unchanged.
    pub fn tick(&mut self, sample: &PdrSample) -> SessionSnapshot {
        if self.is_expired() {
            debug!("recording limit reached, sample ignored");
            return self.snapshot();
        }

        let step = self.integrator.push(sample);
        self.elevation = sample.elevation;

        let position = self
            .estimator
            .update(step.north_m, step.east_m, sample.heading.to_degrees());
        debug!(
            tick = self.integrator.sample_count(),
            lat = position.lat,
            lng = position.lng,
            step_m = step.distance_m,
            "position updated"
        );

        self.refresh_views();
        if self.is_expired() {
            info!(elapsed_ms = self.elapsed_ms(), "recording limit reached");
        }
        self.snapshot()
    }

    /// Switch the indoor overlay on or off; it only turns on while a view is available.
    ///
    /// Returns whether the overlay is now enabled.
    pub fn toggle_indoor_view(&mut self) -> bool {
        self.indoor_enabled = !self.indoor_enabled && self.tracker.is_viewable();
        self.indoor_enabled
    }

    /// Show or hide the building outlines. Returns whether they are now shown.
    pub fn toggle_building_outlines(&mut self) -> bool {
        self.outlines_enabled = !self.outlines_enabled;
        self.outlines_enabled
    }

    pub fn show_next_floor(&mut self) -> NavResult<&IndoorView> {
        self.tracker.show_next()
    }

    pub fn show_prev_floor(&mut self) -> NavResult<&IndoorView> {
        self.tracker.show_prev()
    }

    pub fn set_auto_elevation(&mut self, enabled: bool) {
        self.config.auto_elevation = enabled;
    }

    /// Refresh period in use: the timed interval when a recording limit is set
    pub fn tick_interval_ms(&self) -> u64 {
        match self.config.recording_limit_ms {
            Some(_) => u64::from(self.config.timed_update_interval_ms),
            None => u64::from(self.config.update_interval_ms),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.integrator.sample_count() * self.tick_interval_ms()
    }

    pub fn remaining_ms(&self) -> Option<u64> {
        self.config
            .recording_limit_ms
            .map(|limit| limit.saturating_sub(self.elapsed_ms()))
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_ms() == Some(0)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn estimator(&self) -> &PositionEstimator {
        &self.estimator
    }

    pub fn tracker(&self) -> &IndoorViewTracker {
        &self.tracker
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let available = self.tracker.is_viewable();
        let current = if available { self.tracker.current_view().ok() } else { None };

        let remaining_ms = self.remaining_ms();

        SessionSnapshot {
            tick: self.integrator.sample_count(),
            elapsed_ms: self.elapsed_ms(),
            remaining_ms,
            expired: remaining_ms == Some(0),
            position: self.estimator.position(),
            heading_deg: self.estimator.heading(),
            distance_travelled_m: self.integrator.distance_travelled(),
            elevation_m: self.elevation,
            indoor: IndoorDisplay {
                available,
                enabled: self.indoor_enabled,
                view_id: current.map(|view| view.id().to_string()),
                bounds: current.map(|view| *view.bounds()),
                image: current.map(|view| view.image().clone()),
                has_next: available && self.tracker.has_next(),
                has_prev: available && self.tracker.has_prev(),
            },
            outlines: OutlineDisplay {
                enabled: self.outlines_enabled,
                footprints: if self.outlines_enabled { self.footprints.clone() } else { Vec::new() },
            },
        }
    }

    fn refresh_views(&mut self) {
        let position = self.estimator.position();
        self.tracker
            .update_viewable_views(&position, self.config.auto_elevation, self.elevation);

        if !self.tracker.is_viewable() && self.indoor_enabled {
            self.indoor_enabled = false;
            debug!("left all indoor views, overlay hidden");
        }
    }
}

/// First footprint of each building, skipping floors that share one
fn building_footprints(catalog: &[IndoorView]) -> Vec<Vec<GeoPoint>> {
    let mut buildings: Vec<&IndoorView> = Vec::new();
    for view in catalog {
        if !buildings.iter().any(|seen| seen.same_building(view)) {
            buildings.push(view);
        }
    }
    buildings
        .into_iter()
        .map(|view| view.footprint().vertices().to_vec())
        .collect()
}
