//! Append-only sample history.
//!
//! The engine keeps only two samples in memory; everything older goes
//! through this seam. Implementations decide the medium (file, flash,
//! nothing); the engine decides only the record shape. Sink failures are
//! logged by the caller and never affect telemetry.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use orbitwatch_providers::PositionFix;

/// Errors that can occur while persisting samples.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The sink could not accept the record.
    #[error("failed to append sample: {0}")]
    Append(String),
}

/// One persisted sample: the fix plus when this process received it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleRecord {
    /// Monotonic receipt time, milliseconds.
    pub at_ms: u64,
    /// Wall-clock receipt time, RFC 3339.
    pub time: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity_kmh: Option<f64>,
    /// The source's own capture time, epoch milliseconds, when it sent one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_timestamp_ms: Option<u64>,
}

impl SampleRecord {
    /// Build a record for a fix received at `at_ms`, stamping the current
    /// wall-clock time.
    pub fn new(at_ms: u64, fix: &PositionFix) -> Self {
        Self {
            at_ms,
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            latitude: fix.latitude,
            longitude: fix.longitude,
            velocity_kmh: fix.velocity_kmh,
            source_timestamp_ms: fix.timestamp_ms,
        }
    }
}

/// Append-only destination for sample records.
pub trait SampleSink {
    fn append(&mut self, record: &SampleRecord) -> Result<(), HistoryError>;
}

/// Discards every record.
#[derive(Debug, Default)]
pub struct NullSink;

impl SampleSink for NullSink {
    fn append(&mut self, _record: &SampleRecord) -> Result<(), HistoryError> {
        Ok(())
    }
}

/// Keeps records in memory; used by tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<SampleRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[SampleRecord] {
        &self.records
    }
}

impl SampleSink for MemorySink {
    fn append(&mut self, record: &SampleRecord) -> Result<(), HistoryError> {
        self.records.push(record.clone());
        Ok(())
    }
}
