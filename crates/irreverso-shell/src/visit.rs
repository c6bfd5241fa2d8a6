//! Last-visit gate
//!
//! The boot sequence only plays for first visits and for visitors gone
//! longer than the window. A recent visitor skips straight to the
//! temporal-access screen, and that skip refreshes the stored timestamp.
//! Timestamps are Unix epoch milliseconds.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use irreverso_core::IrreversoError;
use parking_lot::Mutex;
use thiserror::Error;

/// Storage key of the last-visit timestamp
pub const LAST_SEEN_KEY: &str = "irreverso:lastSeen";

/// Visits closer together than this skip the boot sequence
pub const VISIT_WINDOW: Duration = Duration::from_secs(30 * 24 * 60 * 60);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl From<StoreError> for IrreversoError {
    fn from(err: StoreError) -> Self {
        IrreversoError::Store(err.to_string())
    }
}

/// Where the last-visit timestamp lives
pub trait TimestampStore {
    /// Stored timestamp; `None` when never written
    fn load(&self) -> Result<Option<i64>, StoreError>;
    fn save(&self, millis: i64) -> Result<(), StoreError>;
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    value: Mutex<Option<i64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(millis: i64) -> Self {
        MemoryStore {
            value: Mutex::new(Some(millis)),
        }
    }
}

impl TimestampStore for MemoryStore {
    fn load(&self) -> Result<Option<i64>, StoreError> {
        Ok(*self.value.lock())
    }

    fn save(&self, millis: i64) -> Result<(), StoreError> {
        *self.value.lock() = Some(millis);
        Ok(())
    }
}

/// JSON object on disk, `{"irreverso:lastSeen": <ms>}`. Other keys in the
/// file are preserved.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, serde_json::Value>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl TimestampStore for JsonFileStore {
    fn load(&self) -> Result<Option<i64>, StoreError> {
        Ok(self.read_map()?.get(LAST_SEEN_KEY).and_then(serde_json::Value::as_i64))
    }

    fn save(&self, millis: i64) -> Result<(), StoreError> {
        let mut map = self.read_map()?;
        map.insert(LAST_SEEN_KEY.to_string(), serde_json::Value::from(millis));
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&map)?)?;
        Ok(())
    }
}

/// Where a visit lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    /// Play the boot sequence, then record the visit
    Boot,
    /// Recent visitor: straight to the temporal-access screen
    Skip,
}

pub struct VisitGate<S> {
    store: S,
    window: Duration,
}

impl<S: TimestampStore> VisitGate<S> {
    pub fn new(store: S) -> Self {
        VisitGate {
            store,
            window: VISIT_WINDOW,
        }
    }

    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Decide the landing for a visit at `now_ms`. A skip refreshes the
    /// stored timestamp. An unreadable store counts as a first visit.
    pub fn decide(&self, now_ms: i64) -> Landing {
        let last_seen = match self.store.load() {
            Ok(value) => value.unwrap_or(0),
            Err(e) => {
                tracing::warn!(error = %e, "last-visit store unreadable, playing boot");
                0
            }
        };

        let window_ms = i64::try_from(self.window.as_millis()).unwrap_or(i64::MAX);
        let recent = last_seen > 0 && now_ms.saturating_sub(last_seen) < window_ms;
        if !recent {
            tracing::debug!(last_seen, "no recent visit");
            return Landing::Boot;
        }

        if let Err(e) = self.store.save(now_ms) {
            tracing::warn!(error = %e, "failed to refresh last-visit timestamp");
        }
        tracing::debug!(last_seen, "recent visit, skipping boot");
        Landing::Skip
    }

    /// Record a finished boot at `now_ms`
    pub fn complete(&self, now_ms: i64) -> Result<(), StoreError> {
        self.store.save(now_ms)
    }
}

/// Wall clock as Unix epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("irreverso-visit-{}-{name}", std::process::id()))
            .join("state.json")
    }

    #[test]
    fn test_first_visit_boots() {
        let gate = VisitGate::new(MemoryStore::new());
        assert_eq!(gate.decide(1_000), Landing::Boot);
        assert_eq!(gate.store().load().unwrap(), None);
    }

    #[test]
    fn test_recent_visit_skips_and_refreshes() {
        let now = 100 * DAY_MS;
        let gate = VisitGate::new(MemoryStore::with_value(now - 29 * DAY_MS));
        assert_eq!(gate.decide(now), Landing::Skip);
        assert_eq!(gate.store().load().unwrap(), Some(now));
    }

    #[test]
    fn test_stale_visit_boots() {
        let now = 100 * DAY_MS;
        let last = now - 30 * DAY_MS;
        let gate = VisitGate::new(MemoryStore::with_value(last));
        assert_eq!(gate.decide(now), Landing::Boot);
        assert_eq!(gate.store().load().unwrap(), Some(last));
    }

    #[test]
    fn test_complete_records() {
        let gate = VisitGate::new(MemoryStore::new());
        gate.complete(5 * DAY_MS).unwrap();
        assert_eq!(gate.decide(6 * DAY_MS), Landing::Skip);
    }

    #[test]
    fn test_json_file_store() {
        let path = temp_path("roundtrip");
        let _ = fs::remove_file(&path);
        let store = JsonFileStore::new(&path);
        assert_eq!(store.load().unwrap(), None);

        store.save(1_234).unwrap();
        assert_eq!(store.load().unwrap(), Some(1_234));

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[LAST_SEEN_KEY], 1_234);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_malformed_file_boots() {
        let path = temp_path("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Malformed(_))));
        assert_eq!(VisitGate::new(store).decide(DAY_MS), Landing::Boot);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
