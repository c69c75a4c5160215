//! macOS observation backends, built on `osascript` and `ioreg`.

use std::process::Command;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{IdleProbe, ObserveError, WindowObservation, WindowObserver};

/// Queries app name, pid, and window title in one round trip. The window
/// title line is empty when the process has no readable front window.
const ACTIVE_WINDOW_SCRIPT: &str = r#"
tell application "System Events"
    set frontApp to first application process whose frontmost is true
    set appName to name of frontApp
    set appPid to unix id of frontApp
    set windowTitle to ""
    try
        set windowTitle to name of front window of frontApp
    end try
end tell
return appName & linefeed & appPid & linefeed & windowTitle
"#;

/// Per-browser scripts for the frontmost tab URL. Matched by lowercase
/// substring of the app name; first hit wins.
const BROWSER_URL_SCRIPTS: &[(&str, &str)] = &[
    (
        "chrome",
        r#"tell application "Google Chrome" to return URL of active tab of front window"#,
    ),
    (
        "edge",
        r#"tell application "Microsoft Edge" to return URL of active tab of front window"#,
    ),
    (
        "brave",
        r#"tell application "Brave Browser" to return URL of active tab of front window"#,
    ),
    (
        "arc",
        r#"tell application "Arc" to return URL of active tab of front window"#,
    ),
    (
        "safari",
        r#"tell application "Safari" to return URL of front document"#,
    ),
];

pub struct MacosObserver;

impl MacosObserver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MacosObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowObserver for MacosObserver {
    fn observe(&self) -> Result<WindowObservation, ObserveError> {
        let stdout = run_osascript(ACTIVE_WINDOW_SCRIPT)?;
        let mut lines = stdout.lines();
        let app_name = lines.next().unwrap_or("").trim().to_string();
        let pid_raw = lines.next().unwrap_or("").trim();
        let title = lines.next().unwrap_or("").trim().to_string();

        if app_name.is_empty() {
            return Err(ObserveError::NoForegroundWindow);
        }
        let process_id = pid_raw
            .parse::<i64>()
            .map_err(|_| ObserveError::Backend(format!("unexpected pid '{pid_raw}'")))?;

        let url = browser_url(&app_name);
        Ok(WindowObservation {
            app_name,
            process_id,
            title,
            url,
            captured_at: Utc::now(),
        })
    }
}

/// Best-effort tab URL. Any failure (non-browser app, automation permission
/// not granted, window closed mid-query) collapses to `None`.
fn browser_url(app_name: &str) -> Option<String> {
    let app_lower = app_name.to_lowercase();
    let script = BROWSER_URL_SCRIPTS
        .iter()
        .find(|(keyword, _)| app_lower.contains(keyword))
        .map(|(_, script)| *script)?;

    let output = Command::new("osascript").args(["-e", script]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if url.is_empty() {
        None
    } else {
        Some(url)
    }
}

fn run_osascript(script: &str) -> Result<String, ObserveError> {
    let output = Command::new("osascript")
        .args(["-e", script])
        .output()
        .map_err(|err| ObserveError::Backend(format!("failed to run osascript: {err}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let lower = stderr.to_lowercase();
        if lower.contains("not allowed assistive access") || lower.contains("not authorized") {
            return Err(ObserveError::PermissionDenied(stderr));
        }
        return Err(ObserveError::Backend(stderr));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

pub struct MacosIdleProbe;

impl MacosIdleProbe {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MacosIdleProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl IdleProbe for MacosIdleProbe {
    fn poll_idle_seconds(&self) -> Result<u64, ObserveError> {
        let output = Command::new("ioreg")
            .args(["-c", "IOHIDSystem"])
            .output()
            .map_err(|err| ObserveError::Backend(format!("failed to run ioreg: {err}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ObserveError::Backend(stderr));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        // HIDIdleTime is reported in nanoseconds; absent counts as not idle.
        Ok(parse_hid_idle_ns(&stdout).unwrap_or(0) / 1_000_000_000)
    }
}

fn parse_hid_idle_ns(ioreg_output: &str) -> Option<u64> {
    static HID_IDLE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#""HIDIdleTime"\s*=\s*(\d+)"#).unwrap());
    HID_IDLE_RE
        .captures(ioreg_output)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_idle_time_from_ioreg_output() {
        let sample = r#"
    | |   "HIDParameters" = {...}
    | |   "HIDIdleTime" = 5000000000
    | |   "HIDDefaultParameters" = Yes
"#;
        assert_eq!(parse_hid_idle_ns(sample), Some(5_000_000_000));
    }

    #[test]
    fn missing_idle_time_parses_as_none() {
        assert_eq!(parse_hid_idle_ns("no match here"), None);
    }

    #[test]
    fn url_scripts_cover_common_browsers() {
        for app in ["Google Chrome", "Safari", "Brave Browser", "Arc"] {
            let lower = app.to_lowercase();
            assert!(
                BROWSER_URL_SCRIPTS
                    .iter()
                    .any(|(keyword, _)| lower.contains(keyword)),
                "no URL script for {app}"
            );
        }
    }
}
