//! Key-value configuration backend and the routing configuration stored in it.
//!
//! Three string-valued entries make up the persisted state: the designated
//! field index, the source table identifier, and the processed-identity set
//! (owned by [`crate::tracker`]). The backend itself is abstract so tests and
//! embedders can substitute an in-memory implementation.

use crate::core::{Configuration, Result, RouterError, TableId};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const KEY_FIELD_INDEX: &str = "designated_field_index";
pub const KEY_SOURCE_TABLE: &str = "source_table_id";
pub const KEY_PROCESSED: &str = "processed_rows";

/// Pluggable key-value backend. Every method returns `Result` so an
/// unavailable backend is reported as such, never mistaken for empty.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn delete_all(&mut self) -> Result<()>;
}

/// Loads the recorded configuration, if any.
///
/// Returns `Ok(None)` when no setup has been run; this is a distinct state,
/// not an error. A backend failure or a corrupt entry is an error.
pub fn load_configuration(kv: &dyn KvStore) -> Result<Option<Configuration>> {
    let table = match kv.get(KEY_SOURCE_TABLE)? {
        Some(raw) => raw.parse::<TableId>()?,
        None => return Ok(None),
    };
    let index = match kv.get(KEY_FIELD_INDEX)? {
        Some(raw) => raw.parse::<usize>().map_err(|e| {
            RouterError::Serialization(format!("Invalid field index '{}': {}", raw, e))
        })?,
        None => return Ok(None),
    };
    Ok(Some(Configuration::new(table, index)))
}

pub fn save_configuration(kv: &mut dyn KvStore, config: &Configuration) -> Result<()> {
    kv.set(KEY_SOURCE_TABLE, &config.source_table.to_string())?;
    kv.set(KEY_FIELD_INDEX, &config.field_index.to_string())?;
    Ok(())
}

// ============================================================================
// In-memory backend
// ============================================================================

#[derive(Debug, Default)]
pub struct InMemoryKv {
    entries: HashMap<String, String>,
}

impl InMemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for InMemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete_all(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }
}

// ============================================================================
// File-backed backend
// ============================================================================

/// JSON-file backend. The whole map is rewritten on every mutation through a
/// temp file plus rename, so readers never observe a half-written store.
pub struct FileKv {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileKv {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let data = fs::read_to_string(&path)
                .map_err(|e| RouterError::StoreUnavailable(format!("Failed to read {}: {}", path.display(), e)))?;
            serde_json::from_str(&data)
                .map_err(|e| RouterError::StoreUnavailable(format!("Corrupt store {}: {}", path.display(), e)))?
        } else {
            HashMap::new()
        };
        Ok(Self { path, entries })
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| RouterError::StoreUnavailable(format!("Failed to create store directory: {}", e)))?;
        }
        let temp_path = self.path.with_extension("tmp");
        let temp_file = File::create(&temp_path)
            .map_err(|e| RouterError::StoreUnavailable(format!("Failed to create temp file: {}", e)))?;
        let mut writer = BufWriter::new(temp_file);
        let serialized = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| RouterError::Serialization(e.to_string()))?;
        writer
            .write_all(serialized.as_bytes())
            .map_err(|e| RouterError::StoreUnavailable(format!("Failed to write store: {}", e)))?;
        writer
            .flush()
            .map_err(|e| RouterError::StoreUnavailable(format!("Failed to flush store: {}", e)))?;
        writer
            .get_mut()
            .sync_all()
            .map_err(|e| RouterError::StoreUnavailable(format!("Failed to sync store: {}", e)))?;
        fs::rename(&temp_path, &self.path)
            .map_err(|e| RouterError::StoreUnavailable(format!("Failed to replace store: {}", e)))?;
        Ok(())
    }
}

impl KvStore for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn delete_all(&mut self) -> Result<()> {
        self.entries.clear();
        self.flush()
    }
}
