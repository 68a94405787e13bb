//! # orbitwatch-engine
//!
//! The single-threaded control loop around the telemetry core.
//!
//! This crate provides:
//! - [`Tracker`]: owns the sampler, prediction engine, and alert
//!   controller, and sequences fetch-ingest, prediction refresh, and the
//!   alert tick
//! - [`TrackerSnapshot`]: the read-only state snapshot presentation layers
//!   serialize
//! - The append-only sample history seam ([`SampleSink`])
//!
//! All state is mutated only from [`Tracker::tick`], driven by the caller at
//! a fixed rate. Presentation and reporting paths read snapshots; they never
//! reach into the engine.

pub mod history;
pub mod snapshot;
pub mod tracker;

pub use history::{HistoryError, MemorySink, NullSink, SampleRecord, SampleSink};
pub use snapshot::TrackerSnapshot;
pub use tracker::Tracker;
