//! Read-only state snapshots.
//!
//! A snapshot is plain owned data: presentation layers (display renderer,
//! JSON reporters) take one per refresh and never touch engine state. Field
//! semantics follow the telemetry core; the wire shape here is camelCase
//! JSON.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use orbitwatch_core::geo::GeoPoint;

/// Everything a presentation layer needs, captured at one tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSnapshot {
    /// Wall-clock time the snapshot was taken, RFC 3339.
    pub time: String,

    /// Latest fix position; absent until the first successful fetch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<GeoPoint>,

    /// Speed over the last sample pair, km/h.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instantaneous_speed_kmh: Option<f64>,

    /// Smoothed speed, km/h; absent until the first plausible reading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoothed_speed_kmh: Option<f64>,

    /// True once the smoothed speed has ever been seeded.
    pub speed_valid: bool,

    /// Eight-way compass label of the current direction of travel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,

    /// Great-circle distance to the home point, km.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_to_home_km: Option<f64>,

    /// Forecast waypoints, nearest offset first; empty when unavailable.
    pub prediction: Vec<GeoPoint>,

    /// Whether the proximity latch is CLOSE.
    pub in_close_zone: bool,

    /// Whether the visual indicator should currently be lit.
    pub visual_lit: bool,

    /// Whether the alarm tone should currently be sounding.
    pub tone_active: bool,
}

impl TrackerSnapshot {
    /// RFC 3339 stamp for a snapshot taken now.
    pub(crate) fn timestamp_now() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let snapshot = TrackerSnapshot {
            time: "2026-08-06T12:00:00.000Z".to_string(),
            position: Some(GeoPoint::new(10.0, 20.0)),
            instantaneous_speed_kmh: Some(27_700.0),
            smoothed_speed_kmh: Some(27_650.0),
            speed_valid: true,
            direction: Some("NE".to_string()),
            distance_to_home_km: Some(1234.5),
            prediction: vec![GeoPoint::new(11.0, 21.0)],
            in_close_zone: false,
            visual_lit: false,
            tone_active: false,
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"smoothedSpeedKmh\":27650.0"));
        assert!(json.contains("\"distanceToHomeKm\":1234.5"));
        assert!(json.contains("\"inCloseZone\":false"));
        assert!(json.contains("\"speedValid\":true"));
    }

    #[test]
    fn test_snapshot_omits_absent_fields() {
        let snapshot = TrackerSnapshot {
            time: "2026-08-06T12:00:00.000Z".to_string(),
            position: None,
            instantaneous_speed_kmh: None,
            smoothed_speed_kmh: None,
            speed_valid: false,
            direction: None,
            distance_to_home_km: None,
            prediction: Vec::new(),
            in_close_zone: false,
            visual_lit: false,
            tone_active: false,
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(!json.contains("position"));
        assert!(!json.contains("smoothedSpeedKmh"));
        assert!(json.contains("\"prediction\":[]"));
        assert_eq!(json.contains("direction"), false);
    }
}
