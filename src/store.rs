//! Snapshot persistence.
//!
//! Each entity collection is stored whole under a fixed key as a JSON value.
//! [`MemoryStore`] keeps snapshots in a map; [`JsonDirStore`] writes one
//! `<key>.json` file per collection.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{AuditError, Result};

/// Key of the registered users snapshot.
pub const USERS: &str = "users";
/// Key of the audits snapshot.
pub const AUDITS: &str = "audits";
/// Key of the audit items snapshot.
pub const ITEMS: &str = "items";
/// Key of the remediation plans snapshot.
pub const PLANS: &str = "plans";
/// Key of the standards catalog snapshot.
pub const STANDARDS: &str = "standards";

/// Every key a session reads and writes.
pub const ALL_KEYS: [&str; 5] = [USERS, AUDITS, ITEMS, PLANS, STANDARDS];

/// Opaque key-value storage for collection snapshots.
pub trait PersistenceGateway: Send {
    /// Read the snapshot under `key`, or `None` when nothing was stored.
    ///
    /// # Errors
    ///
    /// [`AuditError::Storage`] when the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Replace the snapshot under `key`.
    ///
    /// # Errors
    ///
    /// [`AuditError::Storage`] when the backing store cannot be written.
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
}

/// Load and decode the snapshot under `key`.
///
/// A missing snapshot yields `default`. A snapshot that does not decode as
/// `T` is logged and also yields `default`.
///
/// # Errors
///
/// Only gateway read failures are returned.
pub fn load_or<T: DeserializeOwned>(
    gateway: &dyn PersistenceGateway,
    key: &str,
    default: T,
) -> Result<T> {
    let Some(value) = gateway.get(key)? else {
        return Ok(default);
    };
    match serde_json::from_value(value) {
        Ok(decoded) => Ok(decoded),
        Err(e) => {
            warn!(key, error = %e, "corrupt snapshot, using default");
            Ok(default)
        }
    }
}

/// Encode `value` and store it under `key`.
///
/// # Errors
///
/// [`AuditError::Storage`] on serialization or gateway failure.
pub fn save<T: Serialize + ?Sized>(
    gateway: &mut dyn PersistenceGateway,
    key: &str,
    value: &T,
) -> Result<()> {
    let encoded = serde_json::to_value(value).map_err(|e| storage(key, &e))?;
    gateway.set(key, encoded)
}

fn storage(key: &str, err: &dyn std::fmt::Display) -> AuditError {
    AuditError::Storage {
        key: key.to_owned(),
        reason: err.to_string(),
    }
}

/// In-memory gateway. Contents are lost when dropped.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    snapshots: HashMap<String, Value>,
    writes: usize,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl PersistenceGateway for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.snapshots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.snapshots.insert(key.to_owned(), value);
        self.writes = self.writes.saturating_add(1);
        Ok(())
    }
}

/// Gateway storing each snapshot as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    /// Open (and create if needed) a snapshot directory.
    ///
    /// # Errors
    ///
    /// [`AuditError::Storage`] when the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| storage(&dir.display().to_string(), &e))?;
        debug!(dir = %dir.display(), "snapshot directory ready");
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl PersistenceGateway for JsonDirStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage(key, &e)),
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                // Unparseable files behave like an absent snapshot.
                warn!(key, path = %path.display(), error = %e, "unreadable snapshot file");
                Ok(None)
            }
        }
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let json = serde_json::to_string_pretty(&value).map_err(|e| storage(key, &e))?;
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json.as_bytes()).map_err(|e| storage(key, &e))?;
        std::fs::rename(&tmp_path, &path).map_err(|e| storage(key, &e))?;
        debug!(key, path = %path.display(), "snapshot written");
        Ok(())
    }
}
