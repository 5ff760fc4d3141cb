// Action dispatcher
//
// Executes what a configured button describes: launch an application, run a
// shell command, open a URL, or trigger a system verb. These are direct OS
// pass-throughs with input validation; they hold no state. Internal helpers
// use anyhow, the command boundary folds failures into the wire envelope.

use std::process::Command;

use anyhow::{anyhow, bail, Result};
use serde::Deserialize;

use crate::registry::SystemAction;

/// Arguments for an app launch. The frontend sends either a proper list or
/// a single user-typed line, which gets shell-style splitting via shlex.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LaunchArgs {
    List(Vec<String>),
    Line(String),
}

impl LaunchArgs {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            LaunchArgs::List(args) => args,
            LaunchArgs::Line(line) => shlex::split(&line).unwrap_or_default(),
        }
    }
}

/// Spawn an application detached from the panel process.
pub fn launch_app(path: &str, args: Option<LaunchArgs>) -> Result<()> {
    if path.trim().is_empty() {
        bail!("Invalid application path");
    }
    let args = args.map(LaunchArgs::into_vec).unwrap_or_default();
    Command::new(path)
        .args(&args)
        .spawn()
        .map_err(|e| anyhow!("failed to launch {}: {}", path, e))?;
    Ok(())
}

pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// Run a command line through the platform shell and capture its output.
pub fn run_command(command: &str) -> Result<CommandOutput> {
    if command.trim().is_empty() {
        bail!("Invalid command");
    }

    let output = shell_command(command)
        .output()
        .map_err(|e| anyhow!("failed to run command: {}", e))?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        success: output.status.success(),
    })
}

#[cfg(target_os = "windows")]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("powershell.exe");
    cmd.args(["-NoProfile", "-Command", command]);
    cmd
}

#[cfg(not(target_os = "windows"))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", command]);
    cmd
}

/// Open a URL (or file/folder) with the system default handler.
pub fn open_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        bail!("Invalid URL");
    }
    tauri_plugin_opener::open_url(url, None::<&str>)
        .map_err(|e| anyhow!("failed to open {}: {}", url, e))
}

/// Execute a system verb through the platform command table.
pub fn system_control(action: SystemAction) -> Result<()> {
    let line = system_command_line(action);
    log::debug!("system control {:?} -> {}", action, line);
    let output = shell_command(line).output()?;
    if !output.status.success() {
        bail!(
            "system action {:?} failed: {}",
            action,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(())
}

#[cfg(target_os = "windows")]
fn system_command_line(action: SystemAction) -> &'static str {
    match action {
        SystemAction::Lock => "rundll32.exe user32.dll,LockWorkStation",
        SystemAction::Sleep => "rundll32.exe powrprof.dll,SetSuspendState 0,1,0",
        SystemAction::Restart => "shutdown /r /t 0",
        SystemAction::Shutdown => "shutdown /s /t 0",
        SystemAction::VolumeUp => "(New-Object -ComObject WScript.Shell).SendKeys([char]175)",
        SystemAction::VolumeDown => "(New-Object -ComObject WScript.Shell).SendKeys([char]174)",
        SystemAction::VolumeMute => "(New-Object -ComObject WScript.Shell).SendKeys([char]173)",
    }
}

#[cfg(target_os = "macos")]
fn system_command_line(action: SystemAction) -> &'static str {
    match action {
        SystemAction::Lock => "pmset displaysleepnow",
        SystemAction::Sleep => "pmset sleepnow",
        SystemAction::Restart => "osascript -e 'tell app \"System Events\" to restart'",
        SystemAction::Shutdown => "osascript -e 'tell app \"System Events\" to shut down'",
        SystemAction::VolumeUp => {
            "osascript -e 'set volume output volume ((output volume of (get volume settings)) + 7)'"
        }
        SystemAction::VolumeDown => {
            "osascript -e 'set volume output volume ((output volume of (get volume settings)) - 7)'"
        }
        SystemAction::VolumeMute => "osascript -e 'set volume output muted true'",
    }
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn system_command_line(action: SystemAction) -> &'static str {
    match action {
        SystemAction::Lock => "loginctl lock-session",
        SystemAction::Sleep => "systemctl suspend",
        SystemAction::Restart => "systemctl reboot",
        SystemAction::Shutdown => "systemctl poweroff",
        SystemAction::VolumeUp => "amixer -q sset Master 5%+",
        SystemAction::VolumeDown => "amixer -q sset Master 5%-",
        SystemAction::VolumeMute => "amixer -q sset Master toggle",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_rejects_empty_path() {
        assert!(launch_app("", None).is_err());
        assert!(launch_app("   ", None).is_err());
    }

    #[test]
    fn run_rejects_empty_command() {
        assert!(run_command("").is_err());
    }

    #[test]
    fn open_rejects_empty_url() {
        assert!(open_url("").is_err());
    }

    #[test]
    fn launch_args_line_is_shell_split() {
        let args = LaunchArgs::Line(r#"--profile "My Profile" --new-window"#.to_string());
        assert_eq!(
            args.into_vec(),
            vec!["--profile", "My Profile", "--new-window"]
        );
    }

    #[test]
    fn launch_args_list_passes_through() {
        let args = LaunchArgs::List(vec!["-a".into(), "b c".into()]);
        assert_eq!(args.into_vec(), vec!["-a", "b c"]);
    }

    #[test]
    fn every_system_action_has_a_command() {
        for action in [
            SystemAction::Lock,
            SystemAction::Sleep,
            SystemAction::Restart,
            SystemAction::Shutdown,
            SystemAction::VolumeUp,
            SystemAction::VolumeDown,
            SystemAction::VolumeMute,
        ] {
            assert!(!system_command_line(action).is_empty());
        }
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn run_command_captures_output() {
        let out = run_command("echo panel").unwrap();
        assert!(out.success);
        assert_eq!(out.stdout.trim(), "panel");
    }
}
