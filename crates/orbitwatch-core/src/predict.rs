//! Short-horizon ground-track forecasting.
//!
//! The forecast is a handful of waypoints projected along the current
//! bearing at fixed future offsets. It is always recomputed whole, never
//! patched incrementally, and goes stale after a freshness window so
//! consumers never render a forecast anchored to an old fix.

use crate::geo::{self, GeoPoint};
use crate::sample::PositionSample;
use crate::telemetry::MIN_ELAPSED_MS;

/// Fraction of raw orbital speed projected onto the ground track.
///
/// A heuristic carried over from the original deployment; no derivation is
/// claimed for the coefficient.
pub const GROUND_TRACK_FACTOR: f64 = 0.85;

/// Orbital speed assumed when no velocity information is available, km/h.
pub const DEFAULT_ORBITAL_SPEED_KMH: f64 = 27_500.0;

/// Spacing between forecast waypoints, minutes.
pub const WAYPOINT_STEP_MIN: u32 = 10;

/// Forecast horizon, minutes.
pub const HORIZON_MIN: u32 = 60;

/// Age beyond which a forecast must be recomputed before display.
pub const FRESH_FOR_MS: u64 = 60_000;

/// Projects the future ground track from the latest bearing and speed.
#[derive(Debug, Clone, Default)]
pub struct PredictionEngine {
    waypoints: Vec<GeoPoint>,
    computed_at_ms: Option<u64>,
}

impl PredictionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the forecast must be recomputed before display: never
    /// computed, outlived its freshness window, or empty. An empty path
    /// means "no prediction available", and a recompute is cheap, so it is
    /// retried on demand rather than waiting out the window.
    pub fn is_stale(&self, now_ms: u64) -> bool {
        if self.waypoints.is_empty() {
            return true;
        }
        match self.computed_at_ms {
            Some(at) => now_ms.saturating_sub(at) > FRESH_FOR_MS,
            None => true,
        }
    }

    /// Rebuild the forecast from scratch.
    ///
    /// Both samples are required for a bearing; with fewer the path comes
    /// out empty, which consumers must treat as "no prediction available".
    pub fn recompute(
        &mut self,
        now_ms: u64,
        previous: Option<PositionSample>,
        current: Option<PositionSample>,
        raw_velocity_kmh: Option<f64>,
    ) {
        self.computed_at_ms = Some(now_ms);
        self.waypoints.clear();

        let (Some(prev), Some(curr)) = (previous, current) else {
            return;
        };

        let bearing = geo::initial_bearing_deg(prev.point, curr.point);
        let ground_speed = ground_speed_kmh(prev, curr, raw_velocity_kmh);

        for minutes in (WAYPOINT_STEP_MIN..=HORIZON_MIN).step_by(WAYPOINT_STEP_MIN as usize) {
            let distance = ground_speed * f64::from(minutes) / 60.0;
            self.waypoints
                .push(geo::destination_point(curr.point, distance, bearing));
        }
    }

    /// Recompute only if the forecast is stale.
    pub fn refresh_if_stale(
        &mut self,
        now_ms: u64,
        previous: Option<PositionSample>,
        current: Option<PositionSample>,
        raw_velocity_kmh: Option<f64>,
    ) {
        if self.is_stale(now_ms) {
            self.recompute(now_ms, previous, current, raw_velocity_kmh);
        }
    }

    /// The forecast waypoints, oldest offset first. Empty means no
    /// prediction is available.
    pub fn waypoints(&self) -> &[GeoPoint] {
        &self.waypoints
    }
}

/// Ground speed estimate for projection, in priority order: derived from the
/// sample pair when the elapsed time supports a rate, otherwise the reported
/// orbital velocity scaled to the ground track, otherwise the scaled default.
fn ground_speed_kmh(
    prev: PositionSample,
    curr: PositionSample,
    raw_velocity_kmh: Option<f64>,
) -> f64 {
    let elapsed_ms = curr.at_ms.saturating_sub(prev.at_ms);
    if elapsed_ms >= MIN_ELAPSED_MS {
        let distance = geo::distance_km(prev.point, curr.point);
        return distance / (elapsed_ms as f64 / 3_600_000.0);
    }
    raw_velocity_kmh.unwrap_or(DEFAULT_ORBITAL_SPEED_KMH) * GROUND_TRACK_FACTOR
}
