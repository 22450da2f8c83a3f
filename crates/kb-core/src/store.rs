//! Durable storage for the KPI collection
//!
//! The whole collection lives under one key: a JSON array of KPI records.
//! It is read once at start-up and overwritten after every mutation.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

use crate::kpi::Kpi;

/// Errors raised by a KPI store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed KPI data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Storage collaborator for the registry
pub trait KpiStore: Send {
    /// Read the persisted collection. A store that was never written
    /// returns an empty collection.
    fn load(&self) -> Result<Vec<Kpi>, StoreError>;

    /// Overwrite the persisted collection
    fn save(&mut self, kpis: &[Kpi]) -> Result<(), StoreError>;

    /// Human readable location, for logs
    fn describe(&self) -> String;
}

/// In-memory store; clones share the same buffer
#[derive(Clone, Default)]
pub struct MemoryStore {
    buffer: Arc<Mutex<Option<String>>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw serialized text (may be invalid)
    pub fn with_contents(contents: impl Into<String>) -> Self {
        let store = Self::default();
        *store.buffer.lock() = Some(contents.into());
        store
    }

    /// Raw serialized text currently held
    pub fn contents(&self) -> Option<String> {
        self.buffer.lock().clone()
    }

    /// Make subsequent writes fail
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock() = fail;
    }
}

impl KpiStore for MemoryStore {
    fn load(&self) -> Result<Vec<Kpi>, StoreError> {
        match &*self.buffer.lock() {
            Some(text) => Ok(serde_json::from_str(text)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, kpis: &[Kpi]) -> Result<(), StoreError> {
        if *self.fail_writes.lock() {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        *self.buffer.lock() = Some(serde_json::to_string(kpis)?);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// JSON file store
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "kpis.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl KpiStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Kpi>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    fn save(&mut self, kpis: &[Kpi]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(kpis)?;
        let tmp = self.temp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        debug!("Persisted {} KPI(s) to {:?}", kpis.len(), self.path);
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
