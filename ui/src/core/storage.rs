//! Local persistence for settings and session history.
//!
//! Everything goes through a small key-value JSON-string boundary:
//! localStorage on the web, flat files under the platform data directory on
//! native. Records that fail to decode are treated as absent rather than
//! failing the whole load, so one bad entry can't wipe the history view.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SETTINGS_KEY: &str = "vantage.settings.v1";
pub const SESSIONS_KEY: &str = "vantage.sessions.v1";

/// Summary of one completed timed session. Appended on timeout, never on a
/// manual stop, and the collection is never pruned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    pub id: String,
    /// Display date, e.g. `2026-08-30 · 14:05`.
    pub date: String,
    /// Unix timestamp in milliseconds.
    pub timestamp_ms: i64,
    pub score: i64,
    /// Whole-session accuracy in percent.
    pub accuracy: f64,
    /// n-back level as it was during play (before any end-of-session
    /// adjustment).
    pub nback: u32,
}

#[derive(Debug)]
pub enum StorageError {
    /// The backing store itself is unreachable (no window, denied storage,
    /// unwritable data directory, ...).
    Backend(String),
    Encode(serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Backend(detail) => write!(f, "storage backend unavailable: {detail}"),
            StorageError::Encode(err) => write!(f, "failed to encode record: {err}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Encode(err)
    }
}

/// Reads a key and parses it as JSON. Missing *or malformed* payloads come
/// back as `None`; only backend failures surface as errors.
pub fn read_value(key: &str) -> Result<Option<Value>, StorageError> {
    Ok(read_key(key)?.and_then(|raw| serde_json::from_str(&raw).ok()))
}

pub fn write_json<T: Serialize>(key: &str, value: &T) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    write_key(key, &raw)
}

pub fn load_sessions() -> Result<Vec<SessionRecord>, StorageError> {
    Ok(read_value(SESSIONS_KEY)?
        .map(records_from_value)
        .unwrap_or_default())
}

pub fn append_session(record: &SessionRecord) -> Result<(), StorageError> {
    let mut records = load_sessions()?;
    records.push(record.clone());
    write_json(SESSIONS_KEY, &records)
}

/// Decodes the stored array entry-by-entry, skipping anything malformed.
fn records_from_value(value: Value) -> Vec<SessionRecord> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .ok_or_else(|| StorageError::Backend("no window".into()))?
        .local_storage()
        .map_err(|_| StorageError::Backend("localStorage denied".into()))?
        .ok_or_else(|| StorageError::Backend("localStorage missing".into()))
}

#[cfg(target_arch = "wasm32")]
fn read_key(key: &str) -> Result<Option<String>, StorageError> {
    local_storage()?
        .get_item(key)
        .map_err(|_| StorageError::Backend(format!("failed to read `{key}`")))
}

#[cfg(target_arch = "wasm32")]
fn write_key(key: &str, raw: &str) -> Result<(), StorageError> {
    local_storage()?
        .set_item(key, raw)
        .map_err(|_| StorageError::Backend(format!("failed to write `{key}`")))
}

#[cfg(not(target_arch = "wasm32"))]
fn key_path(key: &str) -> Result<std::path::PathBuf, StorageError> {
    let dirs = directories::ProjectDirs::from("org", "vantage", "vantage")
        .ok_or_else(|| StorageError::Backend("no home directory".into()))?;
    Ok(dirs.data_dir().join(format!("{key}.json")))
}

#[cfg(not(target_arch = "wasm32"))]
fn read_key(key: &str) -> Result<Option<String>, StorageError> {
    let path = key_path(key)?;
    match std::fs::read_to_string(&path) {
        Ok(raw) => Ok(Some(raw)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(StorageError::Backend(format!(
            "failed to read {}: {err}",
            path.display()
        ))),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_key(key: &str, raw: &str) -> Result<(), StorageError> {
    let path = key_path(key)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|err| StorageError::Backend(format!("failed to create data dir: {err}")))?;
    }
    std::fs::write(&path, raw).map_err(|err| {
        StorageError::Backend(format!("failed to write {}: {err}", path.display()))
    })
}
