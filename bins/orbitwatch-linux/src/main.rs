use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use orbitwatch_core::config::{ConfigError, SettingsStore, TrackerSettings};
use orbitwatch_engine::{HistoryError, SampleRecord, SampleSink, Tracker};
use orbitwatch_providers::OrbitSimulator;
use serde::{de::DeserializeOwned, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,orbitwatch_engine=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Orbitwatch starting...");

    let data_dir = data_dir();
    let store = FileSettingsStore::new(data_dir.join("settings.json"));
    let settings = match store.load_settings() {
        Ok(settings) => settings,
        Err(ConfigError::NotFound(_)) => {
            let settings = TrackerSettings::default();
            store.save_settings(&settings)?;
            tracing::info!("No saved settings; wrote defaults");
            settings
        }
        Err(e) => return Err(e.into()),
    };

    let fetch_interval_ms = settings.fetch_interval_ms;
    let mut tracker = Tracker::new(settings);
    let mut provider = OrbitSimulator::default();
    let mut sink = JsonlSampleSink::open(data_dir.join("samples.jsonl"))?;

    tracing::info!("🛰️  Orbitwatch ready!");
    tracing::info!(
        "   Home point:  {:.4}, {:.4}",
        tracker.home().latitude,
        tracker.home().longitude
    );
    tracing::info!("   Fetch cadence: {} ms (simulated orbit)", fetch_interval_ms);
    tracing::info!("   Sample log:  {}", data_dir.join("samples.jsonl").display());
    tracing::info!("   Snapshots stream to stdout, one JSON line per second");

    let started = Instant::now();
    let mut interval = tokio::time::interval(Duration::from_millis(10));
    let mut last_report_ms = 0u64;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now_ms = started.elapsed().as_millis() as u64;
                tracker.tick(now_ms, &mut provider, &mut sink);

                if now_ms.saturating_sub(last_report_ms) >= 1_000 {
                    last_report_ms = now_ms;
                    let snapshot = tracker.snapshot(now_ms);
                    println!("{}", serde_json::to_string(&snapshot)?);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

fn data_dir() -> PathBuf {
    std::env::var("ORBITWATCH_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".orbitwatch"))
}

/// File-based settings storage: one JSON object per file, one key per
/// top-level member.
struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_map(&self) -> Result<serde_json::Map<String, serde_json::Value>, ConfigError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                serde_json::from_str(&text).map_err(|e| ConfigError::InvalidData(e.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(serde_json::Map::new()),
            Err(e) => Err(ConfigError::Read(e.to_string())),
        }
    }

    fn write_map(
        &self,
        map: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Write(e.to_string()))?;
        }
        let text = serde_json::to_string_pretty(map)
            .map_err(|e| ConfigError::InvalidData(e.to_string()))?;
        fs::write(&self.path, text).map_err(|e| ConfigError::Write(e.to_string()))
    }
}

impl SettingsStore for FileSettingsStore {
    fn load_settings(&self) -> Result<TrackerSettings, ConfigError> {
        self.load_value("tracker")
    }

    fn save_settings(&self, settings: &TrackerSettings) -> Result<(), ConfigError> {
        self.save_value("tracker", settings)
    }

    fn load_value<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError> {
        let map = self.read_map()?;
        let value = map
            .get(key)
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))?;
        serde_json::from_value(value.clone()).map_err(|e| ConfigError::InvalidData(e.to_string()))
    }

    fn save_value<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        let mut map = self.read_map()?;
        let encoded =
            serde_json::to_value(value).map_err(|e| ConfigError::InvalidData(e.to_string()))?;
        map.insert(key.to_string(), encoded);
        self.write_map(&map)
    }

    fn has_key(&self, key: &str) -> bool {
        self.read_map()
            .map(|map| map.contains_key(key))
            .unwrap_or(false)
    }
}

/// Append-only sample log: one JSON record per line.
struct JsonlSampleSink {
    file: fs::File,
}

impl JsonlSampleSink {
    fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self { file })
    }
}

impl SampleSink for JsonlSampleSink {
    fn append(&mut self, record: &SampleRecord) -> Result<(), HistoryError> {
        let line =
            serde_json::to_string(record).map_err(|e| HistoryError::Append(e.to_string()))?;
        writeln!(self.file, "{line}").map_err(|e| HistoryError::Append(e.to_string()))
    }
}
