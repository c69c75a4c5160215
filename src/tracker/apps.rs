//! App-name classification tables. Matching is case-insensitive substring
//! matching, so "Google Chrome" and "Chrome Canary" both count as chrome.

/// Apps whose sessions are segmented by site rather than window title.
pub const BROWSER_APPS: &[&str] = &["chrome", "safari", "firefox", "edge", "brave", "arc"];

/// Apps where the title churns too fast to be an identity signal (every new
/// message rewrites it), so sessions stick to the app alone.
pub const COMMUNICATION_APPS: &[&str] = &["discord", "slack", "messages", "mail", "outlook"];

/// Terminal emulators, used to recognize the tracker's own activity.
pub const TERMINAL_APPS: &[&str] = &["terminal", "iterm", "warp", "alacritty", "kitty", "hyper"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCategory {
    Browser,
    Communication,
    Default,
}

pub fn categorize(app_name: &str) -> AppCategory {
    if is_browser(app_name) {
        AppCategory::Browser
    } else if is_communication_app(app_name) {
        AppCategory::Communication
    } else {
        AppCategory::Default
    }
}

pub fn is_browser(app_name: &str) -> bool {
    matches_any(app_name, BROWSER_APPS)
}

pub fn is_communication_app(app_name: &str) -> bool {
    matches_any(app_name, COMMUNICATION_APPS)
}

pub fn is_terminal(app_name: &str) -> bool {
    matches_any(app_name, TERMINAL_APPS)
}

fn matches_any(app_name: &str, names: &[&str]) -> bool {
    let app_lower = app_name.to_lowercase();
    names.iter().any(|name| app_lower.contains(name))
}
