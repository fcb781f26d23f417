//! Key-value stores for session tokens.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dashmap::DashMap;
use tempfile::NamedTempFile;

/// String key-value store with the semantics of browser local storage:
/// synchronous, infallible from the caller's point of view.
pub trait TokenStore: Send + Sync {
    /// Returns the value for `key`, or `None` if it is not set.
    fn get(&self, key: &str) -> Option<String>;
    /// Inserts or overwrites the value for `key`.
    fn set(&self, key: &str, value: &str);
    /// Removes `key`. Removing a missing key is a no-op.
    fn remove(&self, key: &str);
    /// Removes every key.
    fn clear(&self);
}

/// Thread-safe in-memory store backed by `DashMap`. Lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    store: DashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl TokenStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.store.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: &str) {
        self.store.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.store.remove(key);
    }

    fn clear(&self) {
        self.store.clear();
    }
}

/// Store persisted as a JSON object in a single file, so values survive restarts.
///
/// Every mutation atomically replaces the whole file, readable by the
/// owner only. I/O and parse failures are logged and otherwise ignored;
/// an unreadable file starts out empty.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Opens the store at `path`, loading any existing entries.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable token store {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read token store {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let Ok(mut entries) = self.entries.lock() else {
            tracing::error!("Token store lock poisoned: {}", self.path.display());
            return;
        };
        f(&mut entries);
        self.persist(&entries);
    }

    fn persist(&self, entries: &BTreeMap<String, String>) {
        let json = match serde_json::to_string_pretty(entries) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize token store: {}", e);
                return;
            }
        };
        if let Err(e) = write_private(&self.path, json.as_bytes()) {
            tracing::warn!("Failed to write token store {}: {}", self.path.display(), e);
        }
    }
}

/// Writes `contents` to a sibling temp file and renames it over `path`.
/// The temp file is created owner-only (0600 on unix) and keeps that mode.
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl TokenStore for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        });
    }

    fn remove(&self, key: &str) {
        self.update(|entries| {
            entries.remove(key);
        });
    }

    fn clear(&self) {
        self.update(|entries| entries.clear());
    }
}
