// Settings registry
//
// The application-wide settings singleton: one mutable record under the
// `settings` store key, merge-on-write. The raw stored record keeps any
// fields this build does not know about; the typed view layered over it is
// what crosses the boundary.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::constants::{
    DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS, DEFAULT_METRICS_REFRESH_MS, DEFAULT_THEME, GRID_MAX,
    GRID_MIN, SETTINGS_KEY,
};
use crate::error::{PanelError, Result};
use crate::registry::now_millis;
use crate::store::PersistentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridDimensions {
    #[serde(default = "default_rows")]
    pub rows: u32,
    #[serde(default = "default_columns")]
    pub columns: u32,
}

fn default_rows() -> u32 {
    DEFAULT_GRID_ROWS
}

fn default_columns() -> u32 {
    DEFAULT_GRID_COLUMNS
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self {
            rows: DEFAULT_GRID_ROWS,
            columns: DEFAULT_GRID_COLUMNS,
        }
    }
}

impl GridDimensions {
    fn clamped(self) -> Self {
        Self {
            rows: self.rows.clamp(GRID_MIN, GRID_MAX),
            columns: self.columns.clamp(GRID_MIN, GRID_MAX),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSettings {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_refresh")]
    pub metrics_refresh_interval: u64,
    #[serde(default)]
    pub grid_dimensions: GridDimensions,
    #[serde(default)]
    pub updated_at: i64,
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

fn default_refresh() -> u64 {
    DEFAULT_METRICS_REFRESH_MS
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            metrics_refresh_interval: default_refresh(),
            grid_dimensions: GridDimensions::default(),
            updated_at: 0,
        }
    }
}

/// Typed view over the raw record; grid dimensions are clamped to their
/// bounds here so the UI never sees an out-of-range grid. Decode failures
/// degrade to defaults rather than failing a read.
fn decode(raw: Value) -> PanelSettings {
    match serde_json::from_value::<PanelSettings>(raw) {
        Ok(mut settings) => {
            settings.grid_dimensions = settings.grid_dimensions.clamped();
            settings
        }
        Err(e) => {
            log::warn!("stored settings are undecodable ({}), using defaults", e);
            PanelSettings::default()
        }
    }
}

pub struct SettingsRegistry<'a> {
    store: &'a mut PersistentStore,
}

impl<'a> SettingsRegistry<'a> {
    pub fn new(store: &'a mut PersistentStore) -> Self {
        Self { store }
    }

    /// Current settings merged over defaults. Never fails.
    pub fn get(&self) -> PanelSettings {
        decode(self.store.get_or(SETTINGS_KEY, json!({})))
    }

    /// Shallow-merge `partial` over the stored record, stamp `updatedAt`,
    /// persist, and return the merged typed view. Fields absent from the
    /// update are preserved, including ones this build does not model.
    pub fn save(&mut self, partial: Value) -> Result<PanelSettings> {
        let patch = match partial {
            Value::Object(map) => map,
            _ => return Err(PanelError::InvalidSettings),
        };

        let mut merged = match self.store.get_or(SETTINGS_KEY, json!({})) {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in patch {
            if key == "updatedAt" {
                continue;
            }
            merged.insert(key, value);
        }
        merged.insert("updatedAt".to_string(), json!(now_millis()));

        self.store
            .set(SETTINGS_KEY, Value::Object(merged.clone()))?;
        Ok(decode(Value::Object(merged)))
    }
}
