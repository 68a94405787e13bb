//! Decoding of the public geolocation API response shapes.
//!
//! Two payload forms are in the wild for ISS position feeds:
//! - a telemetry form with numeric fields and an orbital velocity, e.g.
//!   `{"latitude": 50.11, "longitude": -118.3, "velocity": 27635.9,
//!   "timestamp": 1695218359}`;
//! - a position-only form with stringified coordinates nested under
//!   `iss_position`, e.g. `{"iss_position": {"latitude": "50.11",
//!   "longitude": "-118.30"}, "timestamp": 1695218359}`.
//!
//! Both decode into a [`PositionFix`]. Latitude is validated against
//! [-90, 90]; longitude is passed through un-normalized (the engine wraps it
//! when the fix becomes a sample).

use serde::Deserialize;

use crate::{PositionFix, ProviderError};

/// Telemetry-form payload: flat numeric fields, velocity in km/h,
/// timestamp in epoch seconds.
#[derive(Debug, Deserialize)]
struct TelemetryPayload {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    velocity: Option<f64>,
    #[serde(default)]
    timestamp: Option<u64>,
}

/// Position-only payload: stringified coordinates under `iss_position`.
#[derive(Debug, Deserialize)]
struct PositionOnlyPayload {
    iss_position: StringCoordinates,
    #[serde(default)]
    timestamp: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct StringCoordinates {
    latitude: String,
    longitude: String,
}

/// Decode a telemetry-form response body.
pub fn decode_telemetry_payload(body: &str) -> Result<PositionFix, ProviderError> {
    let payload: TelemetryPayload = serde_json::from_str(body)?;
    validate_latitude(payload.latitude)?;
    Ok(PositionFix {
        latitude: payload.latitude,
        longitude: payload.longitude,
        velocity_kmh: payload.velocity,
        timestamp_ms: payload.timestamp.map(|secs| secs * 1_000),
    })
}

/// Decode a position-only response body.
pub fn decode_position_payload(body: &str) -> Result<PositionFix, ProviderError> {
    let payload: PositionOnlyPayload = serde_json::from_str(body)?;
    let latitude = parse_coordinate(&payload.iss_position.latitude)?;
    let longitude = parse_coordinate(&payload.iss_position.longitude)?;
    validate_latitude(latitude)?;
    Ok(PositionFix {
        latitude,
        longitude,
        velocity_kmh: None,
        timestamp_ms: payload.timestamp.map(|secs| secs * 1_000),
    })
}

fn parse_coordinate(raw: &str) -> Result<f64, ProviderError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ProviderError::InvalidCoordinate(raw.to_string()))
}

fn validate_latitude(latitude: f64) -> Result<(), ProviderError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ProviderError::InvalidCoordinate(format!(
            "latitude {latitude} outside [-90, 90]"
        )));
    }
    Ok(())
}
