//! # orbitwatch-core
//!
//! Telemetry derivation and proximity alerting for a satellite tracker.
//!
//! This crate provides:
//! - Great-circle geodesy (distance, bearing, point projection)
//! - The telemetry sampler (velocity smoothing, compass direction)
//! - The short-horizon prediction engine
//! - The hysteresis-gated proximity alert controller
//! - Settings types and the storage abstraction
//!
//! This crate is intentionally runtime-agnostic and contains no async code
//! or I/O: time enters as monotonic millisecond readings supplied by the
//! caller, and position fixes enter as plain samples. That keeps it usable
//! on both Linux (tokio) and embedded (esp-idf) targets, and testable
//! without a device or network stack.

pub mod alert;
pub mod config;
pub mod geo;
pub mod predict;
pub mod sample;
pub mod telemetry;

pub use alert::{AlertConfig, AlertController};
pub use config::{ConfigError, MemorySettingsStore, SettingsStore, TrackerSettings};
pub use geo::{CompassPoint, GeoPoint};
pub use predict::PredictionEngine;
pub use sample::PositionSample;
pub use telemetry::TelemetrySampler;
