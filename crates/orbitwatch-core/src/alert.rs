//! Proximity alarm with hysteresis and distance-proportional cadence.
//!
//! The controller latches between FAR and CLOSE at two distinct thresholds.
//! While CLOSE it runs an alarm cycle whose period shrinks as the target
//! approaches home. Tone and visual indicator are two phase predicates over
//! one shared cycle-start/period pair, so the flash can never drift relative
//! to the tone: the tone occupies the first `tone_on_ms` of a cycle, the
//! visual the first half.

use serde::{Deserialize, Serialize};

/// Thresholds and cadence bounds for the proximity alarm.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertConfig {
    /// Entering distance: at or inside this, the alarm latches CLOSE.
    pub radius_km: f64,
    /// Exit margin: CLOSE releases only at `radius_km + hysteresis_km`.
    pub hysteresis_km: f64,
    /// Cycle period at distance zero.
    pub min_period_ms: u64,
    /// Cycle period at `radius_km` (and beyond; the clamp holds either way).
    pub max_period_ms: u64,
    /// Tone duration at the start of each cycle.
    pub tone_on_ms: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            radius_km: 800.0,
            hysteresis_km: 200.0,
            min_period_ms: 220,
            max_period_ms: 2800,
            tone_on_ms: 120,
        }
    }
}

impl AlertConfig {
    /// Alarm cycle period for a given distance, linearly interpolated over
    /// [0, radius] and clamped to [min, max] for any input.
    pub fn period_for_distance_ms(&self, distance_km: f64) -> u64 {
        let span = self.max_period_ms.saturating_sub(self.min_period_ms) as f64;
        let fraction = (distance_km / self.radius_km).clamp(0.0, 1.0);
        self.min_period_ms + (fraction * span).round() as u64
    }
}

/// Hysteresis-gated alarm state machine.
///
/// All mutation happens in [`AlertController::tick`]; the predicate methods
/// are read-only and safe to call from presentation paths.
#[derive(Debug, Clone)]
pub struct AlertController {
    config: AlertConfig,
    in_close_zone: bool,
    /// Start of the running alarm cycle; `None` whenever FAR.
    cycle_start_ms: Option<u64>,
    /// Period fixed at cycle start so both phase predicates see one value.
    cycle_period_ms: u64,
    /// Whether the tone actually started this cycle (mute latches at start).
    tone_armed: bool,
}

impl AlertController {
    pub fn new(config: AlertConfig) -> Self {
        Self {
            config,
            in_close_zone: false,
            cycle_start_ms: None,
            cycle_period_ms: 0,
            tone_armed: false,
        }
    }

    pub fn config(&self) -> &AlertConfig {
        &self.config
    }

    /// Advance the state machine.
    ///
    /// `distance_km` is the current distance to home, or `None` when no fix
    /// exists yet; without a distance the controller is forced FAR and fully
    /// silenced regardless of its latch. `muted` suppresses tone starts only;
    /// the timing state machine and the visual cadence run regardless.
    pub fn tick(&mut self, now_ms: u64, distance_km: Option<f64>, muted: bool) {
        let Some(distance) = distance_km else {
            self.in_close_zone = false;
            self.cycle_start_ms = None;
            return;
        };

        if !self.in_close_zone {
            if distance <= self.config.radius_km {
                self.in_close_zone = true;
                // Entry forces an immediate first cycle.
                self.start_cycle(now_ms, distance, muted);
            }
            return;
        }

        if distance >= self.config.radius_km + self.config.hysteresis_km {
            self.in_close_zone = false;
            self.cycle_start_ms = None;
            return;
        }

        match self.cycle_start_ms {
            Some(start) if now_ms >= start + self.cycle_period_ms => {
                self.start_cycle(now_ms, distance, muted);
            }
            Some(_) => {}
            // CLOSE without a cycle only happens after a distance dropout
            // that didn't reach the exit threshold; restart immediately.
            None => self.start_cycle(now_ms, distance, muted),
        }
    }

    fn start_cycle(&mut self, now_ms: u64, distance_km: f64, muted: bool) {
        self.cycle_start_ms = Some(now_ms);
        self.cycle_period_ms = self.config.period_for_distance_ms(distance_km);
        self.tone_armed = !muted;
    }

    /// Whether the CLOSE latch is set.
    pub fn is_in_close_zone(&self) -> bool {
        self.in_close_zone
    }

    /// Whether the audible tone should currently be sounding.
    pub fn tone_active(&self, now_ms: u64) -> bool {
        if !self.in_close_zone || !self.tone_armed {
            return false;
        }
        match self.cycle_start_ms {
            Some(start) => now_ms.saturating_sub(start) < self.config.tone_on_ms,
            None => false,
        }
    }

    /// Whether the visual indicator should currently be lit.
    ///
    /// On for the first half of each cycle, independent of mute, so the
    /// flash cadence stays informative with the sound off.
    pub fn visual_lit(&self, now_ms: u64) -> bool {
        if !self.in_close_zone {
            return false;
        }
        match self.cycle_start_ms {
            Some(start) => now_ms.saturating_sub(start) < self.cycle_period_ms / 2,
            None => false,
        }
    }
}

impl Default for AlertController {
    fn default() -> Self {
        Self::new(AlertConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_period_interpolation_endpoints_and_clamp() {
        let config = AlertConfig::default();
        assert_eq!(config.period_for_distance_ms(0.0), 220);
        assert_eq!(config.period_for_distance_ms(800.0), 2800);
        assert_eq!(config.period_for_distance_ms(400.0), 1510);
        // Values beyond the radius clamp instead of overflowing.
        assert_eq!(config.period_for_distance_ms(5_000.0), 2800);
        assert_eq!(config.period_for_distance_ms(-10.0), 220);
    }

    #[test]
    fn test_hysteresis_entry_and_exit() {
        let mut alert = AlertController::default();

        alert.tick(0, Some(799.0), false);
        assert!(alert.is_in_close_zone());

        // Rising back above the radius does not release the latch...
        alert.tick(5_000, Some(850.0), false);
        assert!(alert.is_in_close_zone());
        alert.tick(10_000, Some(999.0), false);
        assert!(alert.is_in_close_zone());

        // ...only crossing radius + hysteresis does, silencing immediately.
        alert.tick(15_000, Some(1_001.0), false);
        assert!(!alert.is_in_close_zone());
        assert!(!alert.tone_active(15_000));
        assert!(!alert.visual_lit(15_000));
    }

    #[test]
    fn test_entry_fires_cycle_immediately() {
        let mut alert = AlertController::default();
        alert.tick(1_000, Some(100.0), false);

        assert!(alert.tone_active(1_000));
        assert!(alert.visual_lit(1_000));
    }

    #[test]
    fn test_tone_and_visual_phases_share_one_cycle() {
        let mut alert = AlertController::default();
        // Distance 0: period is min_period_ms = 220, half-period 110.
        alert.tick(0, Some(0.0), false);

        assert!(alert.tone_active(119));
        assert!(!alert.tone_active(120));
        assert!(alert.visual_lit(109));
        assert!(!alert.visual_lit(110));

        // Next cycle fires at 220 and both phases restart together.
        alert.tick(220, Some(0.0), false);
        assert!(alert.tone_active(220));
        assert!(alert.visual_lit(220));
    }

    #[test]
    fn test_mute_suppresses_tone_but_not_visual_cadence() {
        let mut alert = AlertController::default();
        alert.tick(0, Some(0.0), true);

        assert!(alert.is_in_close_zone());
        assert!(!alert.tone_active(0));
        assert!(alert.visual_lit(0));
        assert!(!alert.visual_lit(115));

        // The cycle keeps running while muted.
        alert.tick(220, Some(0.0), true);
        assert!(!alert.tone_active(220));
        assert!(alert.visual_lit(220));
    }

    #[test]
    fn test_unmuting_takes_effect_at_next_cycle() {
        let mut alert = AlertController::default();
        alert.tick(0, Some(0.0), true);
        assert!(!alert.tone_active(0));

        alert.tick(220, Some(0.0), false);
        assert!(alert.tone_active(220));
    }

    #[test]
    fn test_missing_distance_forces_far_and_silence() {
        let mut alert = AlertController::default();
        alert.tick(0, Some(100.0), false);
        assert!(alert.is_in_close_zone());

        alert.tick(1_000, None, false);
        assert!(!alert.is_in_close_zone());
        assert!(!alert.tone_active(1_000));
        assert!(!alert.visual_lit(1_000));
    }

    #[test]
    fn test_cadence_tracks_distance_at_cycle_boundaries() {
        let mut alert = AlertController::default();
        alert.tick(0, Some(800.0), false);
        // Entered at the radius: slowest cadence, next fire at 2800.
        alert.tick(2_799, Some(400.0), false);
        assert!(!alert.tone_active(2_799));

        alert.tick(2_800, Some(400.0), false);
        assert!(alert.tone_active(2_800));
        // The new cycle picked up the shorter mid-range period.
        assert!(alert.visual_lit(2_800 + 754));
        assert!(!alert.visual_lit(2_800 + 755));
    }
}
