// Super Panel - Tauri Library Entry Point

pub mod actions;
pub mod commands;
pub mod constants;
pub mod error;
pub mod icons;
pub mod metrics;
pub mod registry;
pub mod store;

use std::sync::Mutex;

use tauri::Manager;

use commands::{MetricsState, PanelState};
use metrics::MetricsSource;
use registry::Panel;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(
            tauri_plugin_log::Builder::new()
                .level(log::LevelFilter::Info)
                .build(),
        )
        .setup(|app| {
            let config_dir = app
                .path()
                .app_config_dir()
                .unwrap_or_else(|_| store::default_config_root());
            let data_dir = app
                .path()
                .app_data_dir()
                .unwrap_or_else(|_| store::default_config_root());

            log::info!("opening panel store under {}", config_dir.display());
            app.manage(PanelState(Mutex::new(Panel::open(&config_dir, &data_dir))));
            app.manage(MetricsState(Mutex::new(MetricsSource::new())));
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Config registries
            commands::get_buttons,
            commands::save_button,
            commands::delete_button,
            commands::get_settings,
            commands::save_settings,
            commands::upload_icon,
            commands::get_icon_path,
            // Action dispatch
            commands::action_launch_app,
            commands::action_run_command,
            commands::action_open_url,
            commands::action_system_control,
            // Metrics polling
            commands::metrics_cpu,
            commands::metrics_memory,
            commands::metrics_network,
            commands::metrics_disk,
            commands::metrics_temperature,
            // Window chrome
            commands::window_toggle_fullscreen,
            commands::window_minimize,
            commands::window_maximize,
            commands::window_close,
            commands::window_get_state,
            commands::app_quit,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
