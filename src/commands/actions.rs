// Super Panel - Action Commands
// Boundary over the action dispatcher. Same envelope contract as the
// config commands: failures are reported in-band, never as rejections.

use serde::Serialize;

use crate::actions::{self, LaunchArgs};
use crate::registry::SystemAction;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn err(e: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            error: Some(e.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunCommandResponse {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Launch an application, optionally with arguments.
#[tauri::command]
pub fn action_launch_app(app_path: String, args: Option<LaunchArgs>) -> ActionResponse {
    match actions::launch_app(&app_path, args) {
        Ok(()) => ActionResponse::ok(),
        Err(e) => {
            log::error!("error launching app: {}", e);
            ActionResponse::err(e)
        }
    }
}

/// Run a shell command and capture its output. A nonzero exit reports
/// `success: false` but still carries stdout/stderr.
#[tauri::command]
pub fn action_run_command(command: String) -> RunCommandResponse {
    match actions::run_command(&command) {
        Ok(output) => RunCommandResponse {
            success: output.success,
            error: (!output.success).then(|| "command exited with a failure status".to_string()),
            stdout: output.stdout,
            stderr: output.stderr,
        },
        Err(e) => {
            log::error!("error running command: {}", e);
            RunCommandResponse {
                success: false,
                stdout: String::new(),
                stderr: String::new(),
                error: Some(e.to_string()),
            }
        }
    }
}

/// Open a URL in the default browser or handler application.
#[tauri::command]
pub fn action_open_url(url: String) -> ActionResponse {
    match actions::open_url(&url) {
        Ok(()) => ActionResponse::ok(),
        Err(e) => {
            log::error!("error opening URL: {}", e);
            ActionResponse::err(e)
        }
    }
}

/// Execute a system control verb (lock, sleep, volume, ...).
#[tauri::command]
pub fn action_system_control(action: SystemAction) -> ActionResponse {
    match actions::system_control(action) {
        Ok(()) => ActionResponse::ok(),
        Err(e) => {
            log::error!("error executing system control: {}", e);
            ActionResponse::err(e)
        }
    }
}
