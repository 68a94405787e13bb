//! Position samples as delivered by the fetch collaborator.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// A single timestamped position fix.
///
/// `at_ms` is a monotonic millisecond reading taken when the fix was
/// captured, not wall-clock time; the core only ever compares sample times
/// against each other and against the current tick. Samples are immutable
/// once captured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    /// Monotonic capture time in milliseconds.
    pub at_ms: u64,
    /// The fix location, longitude already normalized.
    pub point: GeoPoint,
}

impl PositionSample {
    /// Create a sample, wrapping the longitude into [-180, 180].
    pub fn new(at_ms: u64, latitude: f64, longitude: f64) -> Self {
        Self {
            at_ms,
            point: GeoPoint::new(latitude, longitude),
        }
    }
}
