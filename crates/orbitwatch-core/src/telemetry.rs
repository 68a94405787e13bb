//! Telemetry derivation from successive position fixes.
//!
//! The sampler keeps the last two fixes and derives an instantaneous ground
//! speed, an exponentially smoothed speed, and a compass direction from
//! them. A plausibility band rejects readings far outside satellite
//! ground-track speeds so one bad fix cannot poison the smoothed trend; the
//! sample history still advances on rejection, keeping the bearing reference
//! current for the next delta.

use crate::geo::{self, CompassPoint};
use crate::sample::PositionSample;

/// Smoothing weight for the speed EMA.
pub const EMA_ALPHA: f64 = 0.25;

/// Lower bound (exclusive) of plausible ground-track speed, km/h.
pub const MIN_PLAUSIBLE_SPEED_KMH: f64 = 15_000.0;

/// Upper bound (exclusive) of plausible ground-track speed, km/h.
pub const MAX_PLAUSIBLE_SPEED_KMH: f64 = 40_000.0;

/// Minimum elapsed time between two fixes for a usable rate estimate.
///
/// Below this the quotient is dominated by fix jitter. The nominal fetch
/// cadence is 5000 ms, so this is a safety margin, not a normal path.
pub const MIN_ELAPSED_MS: u64 = 1_000;

/// Derives speed and direction from a stream of position fixes.
///
/// Owns the previous/current sample pair exclusively; older samples are the
/// sample sink's business, not ours.
#[derive(Debug, Clone, Default)]
pub struct TelemetrySampler {
    previous: Option<PositionSample>,
    current: Option<PositionSample>,
    instantaneous_kmh: Option<f64>,
    smoothed_kmh: f64,
    direction: Option<CompassPoint>,
    valid: bool,
}

impl TelemetrySampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one fetched sample into the sampler.
    ///
    /// The sample history always advances, whatever the filters decide:
    /// a rejected reading must not leave the bearing reference stale.
    pub fn ingest(&mut self, sample: PositionSample) {
        let Some(current) = self.current else {
            self.current = Some(sample);
            return;
        };

        let elapsed_ms = sample.at_ms.saturating_sub(current.at_ms);
        if elapsed_ms < MIN_ELAPSED_MS {
            // Too close in time for a reliable rate estimate.
            self.instantaneous_kmh = None;
        } else {
            let distance = geo::distance_km(current.point, sample.point);
            let elapsed_hours = elapsed_ms as f64 / 3_600_000.0;
            let speed = distance / elapsed_hours;
            self.instantaneous_kmh = Some(speed);

            if speed > MIN_PLAUSIBLE_SPEED_KMH && speed < MAX_PLAUSIBLE_SPEED_KMH {
                self.smoothed_kmh = if self.valid {
                    EMA_ALPHA * speed + (1.0 - EMA_ALPHA) * self.smoothed_kmh
                } else {
                    // First accepted value seeds the average directly.
                    speed
                };
                self.direction =
                    Some(geo::compass_point(geo::initial_bearing_deg(current.point, sample.point)));
                self.valid = true;
            }
        }

        self.previous = Some(current);
        self.current = Some(sample);
    }

    /// Speed over the last sample pair, if one could be computed.
    pub fn instantaneous_speed_kmh(&self) -> Option<f64> {
        self.instantaneous_kmh
    }

    /// Smoothed speed; defined once the first plausible reading was accepted.
    pub fn smoothed_speed_kmh(&self) -> Option<f64> {
        self.valid.then_some(self.smoothed_kmh)
    }

    /// Compass direction of travel from the last accepted pair.
    pub fn direction(&self) -> Option<CompassPoint> {
        self.direction
    }

    /// True once any plausible reading has been accepted. Never resets, so
    /// smoothed state survives transient fetch failures.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The most recent sample, if any has been ingested.
    pub fn current(&self) -> Option<PositionSample> {
        self.current
    }

    /// The sample before the current one, if two have been ingested.
    pub fn previous(&self) -> Option<PositionSample> {
        self.previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Two fixes 5 s apart on a realistic ISS ground track (~0.35 degrees
    /// of latitude, roughly 38.5 km).
    fn plausible_pair() -> (PositionSample, PositionSample) {
        (
            PositionSample::new(0, 10.0, 20.0),
            PositionSample::new(5_000, 10.3463, 20.0),
        )
    }

    #[test]
    fn test_first_sample_leaves_speed_undefined() {
        let mut sampler = TelemetrySampler::new();
        sampler.ingest(PositionSample::new(0, 10.0, 20.0));

        assert_eq!(sampler.instantaneous_speed_kmh(), None);
        assert_eq!(sampler.smoothed_speed_kmh(), None);
        assert_eq!(sampler.direction(), None);
        assert!(!sampler.is_valid());
        assert!(sampler.current().is_some());
        assert!(sampler.previous().is_none());
    }

    #[test]
    fn test_plausible_reading_accepted_and_seeds_ema() {
        let (a, b) = plausible_pair();
        let expected =
            geo::distance_km(a.point, b.point) / (5_000.0 / 3_600_000.0);
        assert!(expected > MIN_PLAUSIBLE_SPEED_KMH && expected < MAX_PLAUSIBLE_SPEED_KMH);

        let mut sampler = TelemetrySampler::new();
        sampler.ingest(a);
        sampler.ingest(b);

        assert!(sampler.is_valid());
        let smoothed = sampler.smoothed_speed_kmh().unwrap();
        assert!((smoothed - expected).abs() < 1e-6);
        assert_eq!(sampler.direction(), Some(CompassPoint::N));
    }

    #[test]
    fn test_implausible_reading_rejected_but_history_advances() {
        let mut sampler = TelemetrySampler::new();
        sampler.ingest(PositionSample::new(0, 10.0, 20.0));
        // 1 km in 5 s is ~720 km/h: far below any satellite ground track.
        sampler.ingest(PositionSample::new(5_000, 10.009, 20.0));

        assert!(!sampler.is_valid());
        assert_eq!(sampler.smoothed_speed_kmh(), None);
        assert_eq!(sampler.direction(), None);
        // Instantaneous was computed, then filtered out of the trend.
        let inst = sampler.instantaneous_speed_kmh().unwrap();
        assert!(inst < MIN_PLAUSIBLE_SPEED_KMH);
        // History advanced: both slots are occupied.
        assert_eq!(sampler.previous().unwrap().at_ms, 0);
        assert_eq!(sampler.current().unwrap().at_ms, 5_000);
    }

    #[test]
    fn test_implausible_reading_preserves_prior_smoothed_state() {
        let (a, b) = plausible_pair();
        let mut sampler = TelemetrySampler::new();
        sampler.ingest(a);
        sampler.ingest(b);
        let before = sampler.smoothed_speed_kmh().unwrap();

        // A glitch fix that jumps halfway around the planet in 5 s.
        sampler.ingest(PositionSample::new(10_000, -60.0, -140.0));

        assert!(sampler.is_valid());
        assert_eq!(sampler.smoothed_speed_kmh().unwrap(), before);
        assert_eq!(sampler.direction(), Some(CompassPoint::N));
        assert_eq!(sampler.current().unwrap().at_ms, 10_000);
    }

    #[test]
    fn test_ema_blends_second_accepted_reading() {
        let mut sampler = TelemetrySampler::new();
        sampler.ingest(PositionSample::new(0, 0.0, 0.0));
        sampler.ingest(PositionSample::new(5_000, 0.3463, 0.0));
        let first = sampler.smoothed_speed_kmh().unwrap();

        let third = PositionSample::new(10_000, 0.7100, 0.0);
        let second_inst = geo::distance_km(
            sampler.current().unwrap().point,
            third.point,
        ) / (5_000.0 / 3_600_000.0);
        sampler.ingest(third);

        let expected = EMA_ALPHA * second_inst + (1.0 - EMA_ALPHA) * first;
        assert!((sampler.smoothed_speed_kmh().unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_too_small_elapsed_skips_update_but_keeps_sample() {
        let (a, b) = plausible_pair();
        let mut sampler = TelemetrySampler::new();
        sampler.ingest(a);
        sampler.ingest(b);
        let before = sampler.smoothed_speed_kmh().unwrap();

        // 500 ms after the last fix: rate estimate skipped entirely.
        sampler.ingest(PositionSample::new(5_500, 10.5, 20.0));

        assert_eq!(sampler.instantaneous_speed_kmh(), None);
        assert_eq!(sampler.smoothed_speed_kmh().unwrap(), before);
        // The close-in-time sample was still kept for future deltas.
        assert_eq!(sampler.current().unwrap().at_ms, 5_500);
        assert_eq!(sampler.previous().unwrap().at_ms, 5_000);
    }
}
