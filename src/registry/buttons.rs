// Button registry
//
// CRUD over the `buttons` record of the persistent store, keyed by grid
// cell id (`button-<index>`). Loads run the legacy icon migration exactly
// once: bare-string icons become `{type: "emoji", value: s}` and the
// normalized map is persisted only when it structurally differs from what
// was stored, so re-loading already-migrated data never rewrites the file.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::constants::{
    BUTTONS_KEY, DEFAULT_BUTTON_COLOR, DEFAULT_BUTTON_EMOJI, DEFAULT_BUTTON_LABEL,
};
use crate::error::{PanelError, Result};
use crate::icons::{is_safe_segment, parse_data_uri, IconLibrary};
use crate::registry::now_millis;
use crate::store::PersistentStore;

/// Button icon, wire form `{type, value}`. `Image` holds a filename inside
/// the icon library, never a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum IconSpec {
    Emoji(String),
    Fontawesome(String),
    Image(String),
}

/// System verbs a button can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SystemAction {
    #[default]
    Lock,
    Sleep,
    Restart,
    Shutdown,
    VolumeUp,
    VolumeDown,
    VolumeMute,
}

/// What pressing the button does. Wire form is the `actionType` /
/// `actionData` pair. Payload fields all default so sparse configs written
/// by older frontends still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "actionType", content = "actionData", rename_all = "kebab-case")]
pub enum ButtonAction {
    LaunchApp {
        #[serde(default)]
        path: String,
        #[serde(default)]
        args: Vec<String>,
    },
    RunCommand {
        #[serde(default)]
        command: String,
    },
    OpenUrl {
        #[serde(default)]
        url: String,
    },
    SystemControl {
        #[serde(default)]
        action: SystemAction,
    },
}

/// One grid cell's persisted configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonConfig {
    #[serde(default)]
    pub id: String,
    pub label: String,
    pub icon: IconSpec,
    pub color: String,
    #[serde(flatten)]
    pub action: ButtonAction,
    #[serde(default)]
    pub updated_at: i64,
}

/// Result of a successful icon upload. The caller still has to save the
/// button with the new icon value; upload alone touches no config.
#[derive(Debug, Clone)]
pub struct StoredIcon {
    pub filename: String,
    pub path: PathBuf,
}

/// The fixed template a partial config is merged over.
fn default_template() -> Map<String, Value> {
    let Value::Object(map) = json!({
        "label": DEFAULT_BUTTON_LABEL,
        "icon": { "type": "emoji", "value": DEFAULT_BUTTON_EMOJI },
        "color": DEFAULT_BUTTON_COLOR,
        "actionType": "launch-app",
        "actionData": {},
    }) else {
        unreachable!()
    };
    map
}

/// Normalize a stored icon value to object form. Bare strings are legacy
/// emoji icons; anything unrecognizable falls back to the default emoji.
fn migrate_icon(value: Option<&Value>) -> Value {
    match value {
        Some(Value::String(s)) => json!({ "type": "emoji", "value": s }),
        Some(v @ Value::Object(o)) if o.get("type").is_some_and(Value::is_string) => v.clone(),
        _ => json!({ "type": "emoji", "value": DEFAULT_BUTTON_EMOJI }),
    }
}

/// Run the icon migration over every record. Returns true when any record
/// actually changed (structural comparison, so already-object icons are
/// left alone).
fn migrate_buttons(buttons: &mut Map<String, Value>) -> bool {
    let mut changed = false;
    for record in buttons.values_mut() {
        if let Value::Object(fields) = record {
            let migrated = migrate_icon(fields.get("icon"));
            if fields.get("icon") != Some(&migrated) {
                fields.insert("icon".to_string(), migrated);
                changed = true;
            }
        }
    }
    changed
}

fn validate_id(id: &str) -> Result<()> {
    // Ids end up in generated icon filenames, so they get the same
    // single-segment check as filenames.
    if id.is_empty() || !is_safe_segment(id) {
        return Err(PanelError::InvalidId);
    }
    Ok(())
}

pub struct ButtonRegistry<'a> {
    store: &'a mut PersistentStore,
    icons: &'a IconLibrary,
}

impl<'a> ButtonRegistry<'a> {
    pub fn new(store: &'a mut PersistentStore, icons: &'a IconLibrary) -> Self {
        Self { store, icons }
    }

    /// Raw button map with the icon migration applied. Persists the
    /// normalized form only when migration changed something.
    fn load_raw(&mut self) -> Result<Map<String, Value>> {
        let mut map = match self.store.get_or(BUTTONS_KEY, json!({})) {
            Value::Object(m) => m,
            _ => Map::new(),
        };
        if migrate_buttons(&mut map) {
            log::info!("migrated legacy button icons to object form");
            self.store.set(BUTTONS_KEY, Value::Object(map.clone()))?;
        }
        Ok(map)
    }

    /// Full mapping id -> config. Records that no longer decode are skipped
    /// with a warning rather than failing the whole read.
    pub fn list(&mut self) -> Result<BTreeMap<String, ButtonConfig>> {
        let raw = self.load_raw()?;
        let mut out = BTreeMap::new();
        for (id, value) in raw {
            match serde_json::from_value::<ButtonConfig>(value) {
                Ok(mut config) => {
                    config.id = id.clone();
                    out.insert(id, config);
                }
                Err(e) => log::warn!("skipping undecodable button {}: {}", id, e),
            }
        }
        Ok(out)
    }

    /// Merge `partial` over the default template and persist the result
    /// under `id`, overwriting any existing record. `updatedAt` is always
    /// set here, never taken from the caller.
    pub fn save(&mut self, id: &str, partial: Value) -> Result<ButtonConfig> {
        validate_id(id)?;
        let patch = match partial {
            Value::Object(map) => map,
            _ => {
                return Err(PanelError::InvalidButton(
                    "button config must be an object".to_string(),
                ))
            }
        };

        let mut merged = default_template();
        for (key, value) in patch {
            if key == "updatedAt" || key == "id" {
                continue;
            }
            merged.insert(key, value);
        }
        // Tolerate a legacy bare-string icon in the incoming payload too
        let icon = migrate_icon(merged.get("icon"));
        merged.insert("icon".to_string(), icon);
        merged.insert("updatedAt".to_string(), json!(now_millis()));

        let mut config: ButtonConfig = serde_json::from_value(Value::Object(merged))
            .map_err(|e| PanelError::InvalidButton(e.to_string()))?;
        config.id = id.to_string();

        let mut buttons = self.load_raw()?;
        buttons.insert(id.to_string(), serde_json::to_value(&config)?);
        self.store.set(BUTTONS_KEY, Value::Object(buttons))?;
        Ok(config)
    }

    /// Remove the record under `id`. Deleting a missing id is a silent
    /// success and performs no write. An image-type icon gets its backing
    /// file deleted best-effort; a cleanup failure comes back as a warning
    /// alongside the successful delete.
    pub fn delete(&mut self, id: &str) -> Result<Option<String>> {
        validate_id(id)?;
        let mut buttons = self.load_raw()?;
        let Some(removed) = buttons.remove(id) else {
            return Ok(None);
        };

        // Cleanup reads the raw record: a record that no longer decodes
        // (say, an action type from another build) still gets its file
        // removed instead of orphaning it.
        let image_file = removed.get("icon").and_then(|icon| {
            match (
                icon.get("type").and_then(Value::as_str),
                icon.get("value").and_then(Value::as_str),
            ) {
                (Some("image"), Some(filename)) => Some(filename.to_string()),
                _ => None,
            }
        });

        let mut warning = None;
        if let Some(filename) = image_file {
            warning = self.icons.remove(&filename);
            if let Some(w) = &warning {
                log::warn!("button {} deleted, icon cleanup failed: {}", id, w);
            }
        }

        self.store.set(BUTTONS_KEY, Value::Object(buttons))?;
        Ok(warning)
    }

    /// Decode and validate an icon upload, then write it to the icon
    /// library as `<buttonId>-<nowMillis>.<ext>`. The button config is NOT
    /// updated here; the frontend follows up with a `save` carrying the
    /// returned filename.
    pub fn upload_icon(
        &mut self,
        button_id: &str,
        data_uri: &str,
        original_filename: &str,
    ) -> Result<StoredIcon> {
        validate_id(button_id)?;
        let payload = parse_data_uri(data_uri)?;
        let filename = format!("{}-{}.{}", button_id, now_millis(), payload.extension);
        log::debug!(
            "storing icon upload {:?} for {} as {}",
            original_filename,
            button_id,
            filename
        );
        let path = self.icons.write(&filename, &payload.bytes)?;
        Ok(StoredIcon { filename, path })
    }

    /// Absolute path of a stored icon file, or `NotFound`.
    pub fn icon_path(&self, filename: &str) -> Result<PathBuf> {
        self.icons.resolve(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Panel;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;
    use regex::Regex;
    use tempfile::TempDir;

    fn open_panel(tmp: &TempDir) -> Panel {
        Panel::open(tmp.path(), tmp.path())
    }

    fn store_file(tmp: &TempDir) -> std::path::PathBuf {
        tmp.path().join(crate::constants::STORE_FILENAME)
    }

    // -------------------------------------------------------------
    // Legacy icon migration
    // -------------------------------------------------------------

    #[test]
    fn legacy_string_icon_migrates_to_emoji_object() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            store_file(&tmp),
            r##"{"buttons": {"button-0": {
                "label": "Lights",
                "icon": "💡",
                "color": "#fff",
                "actionType": "system-control",
                "actionData": {"action": "lock"},
                "updatedAt": 1000
            }}}"##,
        )
        .unwrap();

        let mut panel = open_panel(&tmp);
        let buttons = panel.buttons().list().unwrap();
        let cfg = &buttons["button-0"];
        assert_eq!(cfg.icon, IconSpec::Emoji("💡".to_string()));
        // Migration does not touch updatedAt
        assert_eq!(cfg.updated_at, 1000);

        // The normalized form was persisted: the raw file now stores the
        // object, so a fresh load decodes without another migration.
        let raw: Value =
            serde_json::from_str(&std::fs::read_to_string(store_file(&tmp)).unwrap()).unwrap();
        assert_eq!(
            raw["buttons"]["button-0"]["icon"],
            json!({"type": "emoji", "value": "💡"})
        );
    }

    #[test]
    fn migration_is_idempotent_and_skips_rewrites() {
        let tmp = TempDir::new().unwrap();
        let mut panel = open_panel(&tmp);
        panel
            .buttons()
            .save("button-0", json!({"icon": "🔥"}))
            .unwrap();

        // First list after save: icon is already object form, so no write
        // should happen. Compare file contents around the read.
        let before = std::fs::read_to_string(store_file(&tmp)).unwrap();
        panel.buttons().list().unwrap();
        let after = std::fs::read_to_string(store_file(&tmp)).unwrap();
        assert_eq!(before, after, "no-op migration must not rewrite the store");
    }

    #[test]
    fn unrecognizable_icon_falls_back_to_default_emoji() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            store_file(&tmp),
            r##"{"buttons": {"button-2": {"label": "X", "icon": 7, "color": "#000",
                "actionType": "launch-app", "actionData": {}}}}"##,
        )
        .unwrap();

        let mut panel = open_panel(&tmp);
        let buttons = panel.buttons().list().unwrap();
        assert_eq!(
            buttons["button-2"].icon,
            IconSpec::Emoji(DEFAULT_BUTTON_EMOJI.to_string())
        );
    }

    // -------------------------------------------------------------
    // Save semantics
    // -------------------------------------------------------------

    #[test]
    fn save_merges_partial_over_defaults() {
        let tmp = TempDir::new().unwrap();
        let mut panel = open_panel(&tmp);

        let cfg = panel
            .buttons()
            .save("button-1", json!({"label": "Browser"}))
            .unwrap();

        assert_eq!(cfg.id, "button-1");
        assert_eq!(cfg.label, "Browser");
        assert_eq!(cfg.icon, IconSpec::Emoji(DEFAULT_BUTTON_EMOJI.to_string()));
        assert_eq!(cfg.color, DEFAULT_BUTTON_COLOR);
        assert_eq!(
            cfg.action,
            ButtonAction::LaunchApp {
                path: String::new(),
                args: Vec::new()
            }
        );
        assert!(cfg.updated_at > 0);
    }

    #[test]
    fn save_never_trusts_caller_updated_at() {
        let tmp = TempDir::new().unwrap();
        let mut panel = open_panel(&tmp);

        let cfg = panel
            .buttons()
            .save("button-0", json!({"updatedAt": 1}))
            .unwrap();
        assert!(cfg.updated_at > 1);
    }

    #[test]
    fn updated_at_is_monotonic_across_saves() {
        let tmp = TempDir::new().unwrap();
        let mut panel = open_panel(&tmp);

        let first = panel.buttons().save("button-0", json!({})).unwrap();
        let second = panel
            .buttons()
            .save("button-0", json!({"label": "Again"}))
            .unwrap();
        assert!(second.updated_at >= first.updated_at);
    }

    #[test]
    fn save_rejects_empty_and_unsafe_ids() {
        let tmp = TempDir::new().unwrap();
        let mut panel = open_panel(&tmp);

        for id in ["", "../button-0", "a/b"] {
            assert!(
                matches!(
                    panel.buttons().save(id, json!({})),
                    Err(PanelError::InvalidId)
                ),
                "id {:?} should be rejected",
                id
            );
        }
    }

    #[test]
    fn save_rejects_non_object_partial() {
        let tmp = TempDir::new().unwrap();
        let mut panel = open_panel(&tmp);
        assert!(matches!(
            panel.buttons().save("button-0", json!("nope")),
            Err(PanelError::InvalidButton(_))
        ));
    }

    #[test]
    fn save_round_trips_full_action_config() {
        let tmp = TempDir::new().unwrap();
        let mut panel = open_panel(&tmp);

        panel
            .buttons()
            .save(
                "button-0",
                json!({
                    "label": "Lights",
                    "icon": {"type": "emoji", "value": "💡"},
                    "actionType": "system-control",
                    "actionData": {"action": "lock"},
                }),
            )
            .unwrap();

        let buttons = panel.buttons().list().unwrap();
        assert_eq!(buttons.len(), 1);
        let cfg = &buttons["button-0"];
        assert_eq!(cfg.label, "Lights");
        assert_eq!(cfg.icon, IconSpec::Emoji("💡".to_string()));
        assert_eq!(
            cfg.action,
            ButtonAction::SystemControl {
                action: SystemAction::Lock
            }
        );
        // Unsupplied fields came from the template
        assert_eq!(cfg.color, DEFAULT_BUTTON_COLOR);

        panel.buttons().delete("button-0").unwrap();
        assert!(panel.buttons().list().unwrap().is_empty());
    }

    // -------------------------------------------------------------
    // Delete semantics
    // -------------------------------------------------------------

    #[test]
    fn delete_missing_id_is_silent_success() {
        let tmp = TempDir::new().unwrap();
        let mut panel = open_panel(&tmp);
        panel.buttons().save("button-0", json!({})).unwrap();

        let before = std::fs::read_to_string(store_file(&tmp)).unwrap();
        assert_eq!(panel.buttons().delete("button-99").unwrap(), None);
        let after = std::fs::read_to_string(store_file(&tmp)).unwrap();
        assert_eq!(before, after, "deleting a missing id must not write");
        assert_eq!(panel.buttons().list().unwrap().len(), 1);
    }

    #[test]
    fn delete_removes_backing_image_file() {
        let tmp = TempDir::new().unwrap();
        let mut panel = open_panel(&tmp);

        let uri = format!("data:image/png;base64,{}", BASE64.encode(b"tiny png"));
        let stored = panel
            .buttons()
            .upload_icon("button-3", &uri, "logo.png")
            .unwrap();
        assert!(stored.path.exists());

        panel
            .buttons()
            .save(
                "button-3",
                json!({"icon": {"type": "image", "value": stored.filename}}),
            )
            .unwrap();

        let warning = panel.buttons().delete("button-3").unwrap();
        assert_eq!(warning, None);
        assert!(!stored.path.exists());
        assert!(matches!(
            panel.buttons().icon_path(&stored.filename),
            Err(PanelError::NotFound(_))
        ));
    }

    #[test]
    fn delete_cleans_icon_even_when_record_no_longer_decodes() {
        let tmp = TempDir::new().unwrap();
        let mut panel = open_panel(&tmp);

        let uri = format!("data:image/png;base64,{}", BASE64.encode(b"x"));
        let stored = panel
            .buttons()
            .upload_icon("button-4", &uri, "x.png")
            .unwrap();
        assert!(stored.path.exists());

        // A record left behind by a build with an action type this one
        // does not know: undecodable as ButtonConfig, icon still valid
        std::fs::write(
            store_file(&tmp),
            format!(
                r##"{{"buttons": {{"button-4": {{"label": "Old", "color": "#000",
                    "icon": {{"type": "image", "value": "{}"}},
                    "actionType": "macro-chain", "actionData": {{}}}}}}}}"##,
                stored.filename
            ),
        )
        .unwrap();

        let mut panel = open_panel(&tmp);
        assert_eq!(panel.buttons().delete("button-4").unwrap(), None);
        assert!(!stored.path.exists(), "orphaned icon file was not removed");
        assert!(panel.buttons().list().unwrap().is_empty());
    }

    #[test]
    fn delete_with_already_missing_icon_still_succeeds() {
        let tmp = TempDir::new().unwrap();
        let mut panel = open_panel(&tmp);

        panel
            .buttons()
            .save(
                "button-5",
                json!({"icon": {"type": "image", "value": "button-5-1.png"}}),
            )
            .unwrap();

        // File never existed: cleanup is a no-op, delete still succeeds
        let warning = panel.buttons().delete("button-5").unwrap();
        assert_eq!(warning, None);
        assert!(panel.buttons().list().unwrap().is_empty());
    }

    // -------------------------------------------------------------
    // Icon upload
    // -------------------------------------------------------------

    #[test]
    fn upload_names_file_after_button_and_timestamp() {
        let tmp = TempDir::new().unwrap();
        let mut panel = open_panel(&tmp);

        let uri = format!("data:image/png;base64,{}", BASE64.encode(b"0123456789"));
        let stored = panel
            .buttons()
            .upload_icon("button-3", &uri, "anything.png")
            .unwrap();

        let pattern = Regex::new(r"^button-3-\d+\.png$").unwrap();
        assert!(
            pattern.is_match(&stored.filename),
            "unexpected filename {}",
            stored.filename
        );
        let resolved = panel.buttons().icon_path(&stored.filename).unwrap();
        assert_eq!(resolved, stored.path);
        assert_eq!(std::fs::read(&resolved).unwrap(), b"0123456789");
    }

    #[test]
    fn upload_maps_jpeg_variants_to_jpg() {
        let tmp = TempDir::new().unwrap();
        let mut panel = open_panel(&tmp);

        for mime in ["image/jpeg", "image/jpg"] {
            let uri = format!("data:{};base64,{}", mime, BASE64.encode(b"j"));
            let stored = panel.buttons().upload_icon("button-0", &uri, "p.jpg").unwrap();
            assert!(stored.filename.ends_with(".jpg"), "{}", stored.filename);
        }
    }

    #[test]
    fn upload_rejects_bad_uri_and_validates_id_first() {
        let tmp = TempDir::new().unwrap();
        let mut panel = open_panel(&tmp);

        assert!(matches!(
            panel.buttons().upload_icon("button-0", "garbage", "x.png"),
            Err(PanelError::InvalidImageFormat)
        ));
        assert!(matches!(
            panel.buttons().upload_icon("", "garbage", "x.png"),
            Err(PanelError::InvalidId)
        ));
    }

    #[test]
    fn upload_does_not_touch_button_config() {
        let tmp = TempDir::new().unwrap();
        let mut panel = open_panel(&tmp);

        let uri = format!("data:image/png;base64,{}", BASE64.encode(b"x"));
        panel.buttons().upload_icon("button-7", &uri, "x.png").unwrap();
        assert!(panel.buttons().list().unwrap().is_empty());
    }
}
