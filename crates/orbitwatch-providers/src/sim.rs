//! Deterministic orbit simulation.
//!
//! Propagates a great-circle ground track at a fixed speed, one step per
//! fetch. Demos run on it when no live feed is wanted, and integration tests
//! use it because the same configuration always produces the same track.

use orbitwatch_core::geo::{self, GeoPoint};
use tracing::debug;

use crate::{PositionFix, PositionProvider, ProviderError};

/// Configuration for an [`OrbitSimulator`].
#[derive(Debug, Clone)]
pub struct OrbitSimulatorConfig {
    /// Track start point.
    pub start: GeoPoint,
    /// Initial forward azimuth in degrees.
    pub bearing_deg: f64,
    /// Ground-track speed, km/h.
    pub ground_speed_kmh: f64,
    /// Simulated time between fetches, milliseconds.
    pub step_ms: u64,
    /// Orbital velocity reported in fixes, if any.
    pub reported_velocity_kmh: Option<f64>,
}

impl Default for OrbitSimulatorConfig {
    fn default() -> Self {
        Self {
            start: GeoPoint::new(0.0, -30.0),
            bearing_deg: 51.6, // roughly the ISS inclination
            ground_speed_kmh: 27_600.0 * 0.85,
            step_ms: 5_000,
            reported_velocity_kmh: Some(27_600.0),
        }
    }
}

/// Great-circle ground-track propagator.
///
/// Each fetch returns the current point, then advances it one step along
/// the track, carrying the bearing forward via the back-azimuth so the
/// path follows the great circle instead of a rhumb line.
#[derive(Debug, Clone)]
pub struct OrbitSimulator {
    config: OrbitSimulatorConfig,
    point: GeoPoint,
    bearing_deg: f64,
}

impl OrbitSimulator {
    pub fn new(config: OrbitSimulatorConfig) -> Self {
        let point = config.start;
        let bearing_deg = config.bearing_deg;
        Self {
            config,
            point,
            bearing_deg,
        }
    }

    /// The point the next fetch will return.
    pub fn current_point(&self) -> GeoPoint {
        self.point
    }

    fn advance(&mut self) {
        let step_km = self.config.ground_speed_kmh * self.config.step_ms as f64 / 3_600_000.0;
        let next = geo::destination_point(self.point, step_km, self.bearing_deg);
        // Forward bearing at the new point is the reciprocal of the
        // back-azimuth, which keeps the track on the great circle.
        let back = geo::initial_bearing_deg(next, self.point);
        self.bearing_deg = (back + 180.0).rem_euclid(360.0);
        self.point = next;
    }
}

impl Default for OrbitSimulator {
    fn default() -> Self {
        Self::new(OrbitSimulatorConfig::default())
    }
}

impl PositionProvider for OrbitSimulator {
    fn fetch(&mut self) -> Result<PositionFix, ProviderError> {
        let fix = PositionFix {
            latitude: self.point.latitude,
            longitude: self.point.longitude,
            velocity_kmh: self.config.reported_velocity_kmh,
            timestamp_ms: None,
        };
        debug!(
            lat = fix.latitude,
            lon = fix.longitude,
            bearing = self.bearing_deg,
            "simulated fix"
        );
        self.advance();
        Ok(fix)
    }

    fn name(&self) -> &str {
        "orbit-sim"
    }
}
