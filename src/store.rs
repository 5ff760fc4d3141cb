// Persistent key-value store
//
// A single JSON document on disk holding the top-level `buttons` and
// `settings` records. Reads never fail: a missing or unreadable file falls
// back to the declared defaults. Writes persist the whole document through
// a temp file + atomic rename so readers never observe a partial write.

use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};

use crate::constants::{BUTTONS_KEY, DEFAULT_METRICS_REFRESH_MS, DEFAULT_THEME, SETTINGS_KEY};
use crate::error::Result;

pub struct PersistentStore {
    path: PathBuf,
    data: Map<String, Value>,
}

/// Default document materialized when the store file is absent or unreadable.
fn default_document() -> Map<String, Value> {
    let mut data = Map::new();
    data.insert(BUTTONS_KEY.to_string(), json!({}));
    data.insert(
        SETTINGS_KEY.to_string(),
        json!({
            "theme": DEFAULT_THEME,
            "metricsRefreshInterval": DEFAULT_METRICS_REFRESH_MS,
        }),
    );
    data
}

/// Fallback config root for contexts where no Tauri path resolver is
/// available (tests, CLI probing).
pub fn default_config_root() -> PathBuf {
    directories::ProjectDirs::from("com", "superpanel", "super-panel")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("super-panel"))
}

impl PersistentStore {
    /// Open the store at `path`, reading the existing document if present.
    /// Never fails: read or parse errors are logged and the defaults win.
    pub fn open(path: &Path) -> Self {
        let data = match std::fs::read_to_string(path) {
            Ok(content) if !content.trim().is_empty() => {
                match serde_json::from_str::<Value>(&content) {
                    Ok(Value::Object(map)) => map,
                    Ok(_) => {
                        log::warn!(
                            "store file {} is not a JSON object, starting from defaults",
                            path.display()
                        );
                        default_document()
                    }
                    Err(e) => {
                        log::warn!(
                            "store file {} is unreadable ({}), starting from defaults",
                            path.display(),
                            e
                        );
                        default_document()
                    }
                }
            }
            _ => default_document(),
        };

        Self {
            path: path.to_path_buf(),
            data,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the value stored under `key`. Absent keys fall back to the
    /// declared defaults, so `buttons` and `settings` always resolve.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Cloned value under `key`, or `default` when absent.
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.data.get(key).cloned().unwrap_or(default)
    }

    /// Overwrite the entire value at `key` and persist the document before
    /// returning. The on-disk file is replaced atomically.
    pub fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.data.insert(key.to_string(), value);
        self.flush()
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&Value::Object(self.data.clone()))?;

        // Temp file in the same directory so the rename stays on one filesystem
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)?;
        if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        Ok(())
    }
}
