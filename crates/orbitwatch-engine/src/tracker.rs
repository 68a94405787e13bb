//! The tracker control loop.
//!
//! One `Tracker` owns all mutable telemetry state and is driven by a
//! fixed-rate tick from a single thread. Each tick runs fetch-ingest,
//! prediction refresh, and the alert tick, in that order. There is no
//! queuing or backpressure: one fetch attempt per due boundary, and a slow
//! fetch simply delays the tick.

use tracing::{debug, warn};

use orbitwatch_core::alert::AlertController;
use orbitwatch_core::config::TrackerSettings;
use orbitwatch_core::geo::{self, GeoPoint};
use orbitwatch_core::predict::PredictionEngine;
use orbitwatch_core::sample::PositionSample;
use orbitwatch_core::telemetry::TelemetrySampler;
use orbitwatch_providers::PositionProvider;

use crate::history::{SampleRecord, SampleSink};
use crate::snapshot::TrackerSnapshot;

/// Owns the telemetry core and sequences its updates.
///
/// Samples are stamped with the monotonic receipt time (`now_ms` of the tick
/// that fetched them), not the source's own timestamp, so elapsed-time math
/// is always against one clock. Source timestamps are preserved in the
/// sample history only.
pub struct Tracker {
    settings: TrackerSettings,
    sampler: TelemetrySampler,
    prediction: PredictionEngine,
    alert: AlertController,
    next_fetch_ms: Option<u64>,
    last_fix_velocity_kmh: Option<f64>,
}

impl Tracker {
    pub fn new(settings: TrackerSettings) -> Self {
        let alert = AlertController::new(settings.alert.clone());
        Self {
            settings,
            sampler: TelemetrySampler::new(),
            prediction: PredictionEngine::new(),
            alert,
            next_fetch_ms: None,
            last_fix_velocity_kmh: None,
        }
    }

    /// Replace the home point. Takes effect at the next tick.
    pub fn set_home(&mut self, home: GeoPoint) {
        self.settings.home = home;
    }

    pub fn home(&self) -> GeoPoint {
        self.settings.home
    }

    /// Set or clear global tone suppression.
    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.settings.muted
    }

    /// Run one loop iteration: fetch-ingest if due, refresh the forecast if
    /// stale, then advance the alert state machine.
    pub fn tick(
        &mut self,
        now_ms: u64,
        provider: &mut dyn PositionProvider,
        sink: &mut dyn SampleSink,
    ) {
        if self.fetch_due(now_ms) {
            self.next_fetch_ms = Some(now_ms + self.settings.fetch_interval_ms);
            match provider.fetch() {
                Ok(fix) => {
                    let record = SampleRecord::new(now_ms, &fix);
                    if let Err(e) = sink.append(&record) {
                        warn!(error = %e, "sample sink rejected record");
                    }

                    self.last_fix_velocity_kmh = fix.velocity_kmh;
                    self.sampler
                        .ingest(PositionSample::new(now_ms, fix.latitude, fix.longitude));
                    debug!(
                        provider = provider.name(),
                        lat = fix.latitude,
                        lon = fix.longitude,
                        "ingested fix"
                    );
                }
                Err(e) => {
                    // Prior telemetry stays as-is and is re-reported until a
                    // fetch succeeds.
                    warn!(provider = provider.name(), error = %e, "position fetch failed");
                }
            }
        }

        self.prediction.refresh_if_stale(
            now_ms,
            self.sampler.previous(),
            self.sampler.current(),
            self.last_fix_velocity_kmh,
        );

        self.alert
            .tick(now_ms, self.distance_to_home_km(), self.settings.muted);
    }

    fn fetch_due(&self, now_ms: u64) -> bool {
        self.next_fetch_ms.map_or(true, |due| now_ms >= due)
    }

    /// Distance from the latest fix to home; `None` before the first fix.
    pub fn distance_to_home_km(&self) -> Option<f64> {
        self.sampler
            .current()
            .map(|sample| geo::distance_km(sample.point, self.settings.home))
    }

    /// Capture a read-only snapshot of the full derived state.
    pub fn snapshot(&self, now_ms: u64) -> TrackerSnapshot {
        TrackerSnapshot {
            time: TrackerSnapshot::timestamp_now(),
            position: self.sampler.current().map(|sample| sample.point),
            instantaneous_speed_kmh: self.sampler.instantaneous_speed_kmh(),
            smoothed_speed_kmh: self.sampler.smoothed_speed_kmh(),
            speed_valid: self.sampler.is_valid(),
            direction: self.sampler.direction().map(|d| d.label().to_string()),
            distance_to_home_km: self.distance_to_home_km(),
            prediction: self.prediction.waypoints().to_vec(),
            in_close_zone: self.alert.is_in_close_zone(),
            visual_lit: self.alert.visual_lit(now_ms),
            tone_active: self.alert.tone_active(now_ms),
        }
    }
}
