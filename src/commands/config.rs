// Super Panel - Config Commands
// Boundary over the button and settings registries. Every response uses
// the uniform `{success, ...}` envelope; no command rejects. Reads degrade
// to empty/default payloads with a logged error, matching what the
// frontend has always assumed.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tauri::State;

use crate::registry::{ButtonConfig, PanelSettings};

use super::PanelState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveButtonResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<ButtonConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteButtonResponse {
    pub success: bool,
    /// Set when the delete succeeded but the icon file could not be
    /// removed. The delete itself is still a success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSettingsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<PanelSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadIconResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconPathResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Get all button configurations, icons normalized to object form.
#[tauri::command]
pub fn get_buttons(state: State<'_, PanelState>) -> BTreeMap<String, ButtonConfig> {
    let mut panel = state.lock();
    match panel.buttons().list() {
        Ok(buttons) => buttons,
        Err(e) => {
            log::error!("error getting buttons config: {}", e);
            BTreeMap::new()
        }
    }
}

/// Save a button configuration (partial merged over the defaults).
#[tauri::command]
pub fn save_button(
    state: State<'_, PanelState>,
    button_id: String,
    config: Value,
) -> SaveButtonResponse {
    let mut panel = state.lock();
    match panel.buttons().save(&button_id, config) {
        Ok(button) => SaveButtonResponse {
            success: true,
            button: Some(button),
            error: None,
        },
        Err(e) => {
            log::error!("error saving button config: {}", e);
            SaveButtonResponse {
                success: false,
                button: None,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Delete a button configuration and its icon file, if any.
#[tauri::command]
pub fn delete_button(state: State<'_, PanelState>, button_id: String) -> DeleteButtonResponse {
    let mut panel = state.lock();
    match panel.buttons().delete(&button_id) {
        Ok(warning) => DeleteButtonResponse {
            success: true,
            warning,
            error: None,
        },
        Err(e) => {
            log::error!("error deleting button config: {}", e);
            DeleteButtonResponse {
                success: false,
                warning: None,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Get application settings merged over defaults.
#[tauri::command]
pub fn get_settings(state: State<'_, PanelState>) -> PanelSettings {
    let mut panel = state.lock();
    panel.settings().get()
}

/// Save application settings (shallow merge over the current record).
#[tauri::command]
pub fn save_settings(state: State<'_, PanelState>, settings: Value) -> SaveSettingsResponse {
    let mut panel = state.lock();
    match panel.settings().save(settings) {
        Ok(merged) => SaveSettingsResponse {
            success: true,
            settings: Some(merged),
            error: None,
        },
        Err(e) => {
            log::error!("error saving settings: {}", e);
            SaveSettingsResponse {
                success: false,
                settings: None,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Store an uploaded icon for a button. The config is updated by a
/// follow-up save_button carrying the returned filename.
#[tauri::command]
pub fn upload_icon(
    state: State<'_, PanelState>,
    button_id: String,
    data_uri: String,
    original_filename: String,
) -> UploadIconResponse {
    let mut panel = state.lock();
    match panel
        .buttons()
        .upload_icon(&button_id, &data_uri, &original_filename)
    {
        Ok(stored) => UploadIconResponse {
            success: true,
            filename: Some(stored.filename),
            filepath: Some(stored.path.to_string_lossy().into_owned()),
            error: None,
        },
        Err(e) => {
            log::error!("error uploading icon: {}", e);
            UploadIconResponse {
                success: false,
                filename: None,
                filepath: None,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Resolve a stored icon filename to an absolute path.
#[tauri::command]
pub fn get_icon_path(state: State<'_, PanelState>, filename: String) -> IconPathResponse {
    let panel = state.lock();
    match panel.icons().resolve(&filename) {
        Ok(path) => IconPathResponse {
            success: true,
            filepath: Some(path.to_string_lossy().into_owned()),
            error: None,
        },
        Err(e) => IconPathResponse {
            success: false,
            filepath: None,
            error: Some(e.to_string()),
        },
    }
}
