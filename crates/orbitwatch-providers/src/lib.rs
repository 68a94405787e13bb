//! # orbitwatch-providers
//!
//! Position-fix sources for the tracker.
//!
//! This crate provides:
//! - The [`PositionProvider`] trait the engine polls
//! - Decoders for the public geolocation API payload shapes
//! - A deterministic orbit simulator for demos and integration tests
//! - A replay provider for scripting fixes and failures in tests
//!
//! Providers are synchronous and bounded: the engine invokes `fetch` at its
//! own cadence from the single control loop, and a provider either returns a
//! fix or an error before the next tick resumes. Transport (HTTP client,
//! serial link) lives with the platform glue; what arrives here is the
//! response body.

pub mod payload;
pub mod sim;

use std::collections::VecDeque;

use thiserror::Error;

pub use payload::{decode_position_payload, decode_telemetry_payload};
pub use sim::{OrbitSimulator, OrbitSimulatorConfig};

/// A raw position fix as delivered by a provider.
///
/// Latitude/longitude are in degrees; longitude may arrive un-normalized and
/// is wrapped by the engine when the fix becomes a sample. `velocity_kmh` is
/// the source-reported orbital speed, when the source has one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Source-reported orbital velocity, km/h.
    pub velocity_kmh: Option<f64>,
    /// Source-reported capture time, epoch milliseconds.
    pub timestamp_ms: Option<u64>,
}

/// Errors a provider can return from a fetch attempt.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The fetch itself failed (network, timeout, non-success status).
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// The response body was not a decodable payload.
    #[error("failed to decode position payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// The payload decoded but carried an unusable coordinate.
    #[error("invalid coordinate in payload: {0}")]
    InvalidCoordinate(String),

    /// A replay script ran out of entries.
    #[error("replay script exhausted")]
    Exhausted,
}

/// A bounded, synchronous position source.
///
/// The caller controls cadence; implementations must not block past their
/// own transport timeout and must not retry internally. Failures are
/// expected and non-fatal: the engine logs them and retries at the next
/// fetch boundary.
pub trait PositionProvider {
    /// Attempt one fetch.
    fn fetch(&mut self) -> Result<PositionFix, ProviderError>;

    /// Short name for log lines.
    fn name(&self) -> &str;
}

/// One scripted fetch outcome for a [`ReplayProvider`].
#[derive(Debug, Clone)]
pub enum ScriptedFetch {
    Fix(PositionFix),
    Fail(String),
}

/// Plays back a prerecorded sequence of fetch outcomes.
///
/// Used by tests to script exact fix sequences and failure injections.
/// Returns [`ProviderError::Exhausted`] once the script runs out.
#[derive(Debug, Default)]
pub struct ReplayProvider {
    script: VecDeque<ScriptedFetch>,
}

impl ReplayProvider {
    pub fn new(script: impl IntoIterator<Item = ScriptedFetch>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Convenience constructor for an all-success script.
    pub fn from_fixes(fixes: impl IntoIterator<Item = PositionFix>) -> Self {
        Self::new(fixes.into_iter().map(ScriptedFetch::Fix))
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl PositionProvider for ReplayProvider {
    fn fetch(&mut self) -> Result<PositionFix, ProviderError> {
        match self.script.pop_front() {
            Some(ScriptedFetch::Fix(fix)) => Ok(fix),
            Some(ScriptedFetch::Fail(reason)) => Err(ProviderError::Fetch(reason)),
            None => Err(ProviderError::Exhausted),
        }
    }

    fn name(&self) -> &str {
        "replay"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fix(lat: f64, lon: f64) -> PositionFix {
        PositionFix {
            latitude: lat,
            longitude: lon,
            velocity_kmh: None,
            timestamp_ms: None,
        }
    }

    #[test]
    fn test_replay_plays_script_in_order() {
        let mut provider = ReplayProvider::new([
            ScriptedFetch::Fix(fix(10.0, 20.0)),
            ScriptedFetch::Fail("connection reset".to_string()),
            ScriptedFetch::Fix(fix(10.5, 20.5)),
        ]);

        assert_eq!(provider.fetch().unwrap(), fix(10.0, 20.0));
        assert!(matches!(provider.fetch(), Err(ProviderError::Fetch(_))));
        assert_eq!(provider.fetch().unwrap(), fix(10.5, 20.5));
        assert!(matches!(provider.fetch(), Err(ProviderError::Exhausted)));
    }

    #[test]
    fn test_replay_from_fixes() {
        let mut provider = ReplayProvider::from_fixes([fix(0.0, 0.0), fix(1.0, 1.0)]);
        assert_eq!(provider.remaining(), 2);
        provider.fetch().unwrap();
        provider.fetch().unwrap();
        assert!(provider.fetch().is_err());
    }
}
