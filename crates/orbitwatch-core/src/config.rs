//! Tracker settings and the storage abstraction behind them.
//!
//! Settings are pushed from outside (a companion app, a console) and must
//! survive restarts; platforms differ in how:
//! - Linux: file-based storage
//! - ESP32: NVS (Non-Volatile Storage)
//!
//! The core only ever reads settings; writers go through a [`SettingsStore`].
//! All methods are synchronous to support embedded platforms.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::alert::AlertConfig;
use crate::geo::GeoPoint;

/// Errors that can occur during settings operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The requested setting was not found.
    #[error("setting not found: {0}")]
    NotFound(String),

    /// Failed to read settings.
    #[error("read error: {0}")]
    Read(String),

    /// Failed to write settings.
    #[error("write error: {0}")]
    Write(String),

    /// Settings data is invalid.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// Externally settable tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSettings {
    /// The point distances are measured against.
    pub home: GeoPoint,

    /// Position fetch cadence in milliseconds.
    pub fetch_interval_ms: u64,

    /// Global tone suppression. The visual alarm cadence ignores this.
    pub muted: bool,

    /// Proximity alarm thresholds and cadence bounds.
    pub alert: AlertConfig,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            // Compile-time default until a home point is pushed.
            home: GeoPoint::new(33.7501, -84.3885),
            fetch_interval_ms: 5_000,
            muted: false,
            alert: AlertConfig::default(),
        }
    }
}

/// Abstract settings storage.
///
/// Implementations provide platform-specific persistence; the generic
/// key-value API exists so new settings don't need new trait methods.
pub trait SettingsStore: Send + Sync {
    /// Load the tracker settings.
    fn load_settings(&self) -> Result<TrackerSettings, ConfigError>;

    /// Save the tracker settings.
    fn save_settings(&self, settings: &TrackerSettings) -> Result<(), ConfigError>;

    /// Load a value by key.
    fn load_value<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError>;

    /// Save a value by key.
    fn save_value<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ConfigError>;

    /// Check if a key exists.
    fn has_key(&self, key: &str) -> bool;
}

const SETTINGS_KEY: &str = "tracker";

/// In-memory settings store for tests and defaults-only operation.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load_settings(&self) -> Result<TrackerSettings, ConfigError> {
        self.load_value(SETTINGS_KEY)
    }

    fn save_settings(&self, settings: &TrackerSettings) -> Result<(), ConfigError> {
        self.save_value(SETTINGS_KEY, settings)
    }

    fn load_value<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError> {
        let values = self
            .values
            .lock()
            .map_err(|_| ConfigError::Read("settings lock poisoned".to_string()))?;
        let value = values
            .get(key)
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))?;
        serde_json::from_value(value.clone()).map_err(|e| ConfigError::InvalidData(e.to_string()))
    }

    fn save_value<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        let encoded =
            serde_json::to_value(value).map_err(|e| ConfigError::InvalidData(e.to_string()))?;
        let mut values = self
            .values
            .lock()
            .map_err(|_| ConfigError::Write("settings lock poisoned".to_string()))?;
        values.insert(key.to_string(), encoded);
        Ok(())
    }

    fn has_key(&self, key: &str) -> bool {
        self.values
            .lock()
            .map(|values| values.contains_key(key))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_settings() {
        let settings = TrackerSettings::default();
        assert_eq!(settings.fetch_interval_ms, 5_000);
        assert!(!settings.muted);
        assert!((settings.home.latitude - 33.7501).abs() < 1e-9);
        assert!((settings.home.longitude - -84.3885).abs() < 1e-9);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemorySettingsStore::new();
        assert!(matches!(
            store.load_settings(),
            Err(ConfigError::NotFound(_))
        ));

        let mut settings = TrackerSettings::default();
        settings.home = GeoPoint::new(48.8566, 2.3522);
        settings.muted = true;
        store.save_settings(&settings).unwrap();

        let loaded = store.load_settings().unwrap();
        assert!((loaded.home.latitude - 48.8566).abs() < 1e-9);
        assert!(loaded.muted);
        assert!(store.has_key("tracker"));
    }

    #[test]
    fn test_generic_key_value() {
        let store = MemorySettingsStore::new();
        store.save_value("brightness", &42u32).unwrap();
        let loaded: u32 = store.load_value("brightness").unwrap();
        assert_eq!(loaded, 42);
        assert!(!store.has_key("contrast"));
    }

    #[test]
    fn test_settings_serialize_camel_case() {
        let json = serde_json::to_string(&TrackerSettings::default()).unwrap();
        assert!(json.contains("\"fetchIntervalMs\":5000"));
        assert!(json.contains("\"radiusKm\":800.0"));
    }
}
