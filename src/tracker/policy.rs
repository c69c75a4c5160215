//! Decides whether a new observation continues the open session or starts a
//! new one. Identity depends on the app category: browsers match on site,
//! communication apps on the app alone, everything else on exact title.

use super::apps::{self, AppCategory};
use super::domain;
use super::session::ActiveSession;

/// `title` must already be privacy-redacted when the open session's title
/// was; both sides of every comparison go through the same sanitization.
pub fn continues(current: &ActiveSession, app_name: &str, process_id: i64, title: &str) -> bool {
    let same_process = current.app_name == app_name && current.process_id == process_id;

    match apps::categorize(app_name) {
        AppCategory::Browser => {
            let current_site = domain::extract_from_title(&current.window_title);
            let new_site = domain::extract_from_title(title);
            match (current_site, new_site) {
                (Some(current_site), Some(new_site)) => same_process && current_site == new_site,
                (None, None) => same_process && current.window_title == title,
                // one side resolves to a site and the other does not;
                // that is a site change even within the same window
                _ => false,
            }
        }
        AppCategory::Communication => same_process,
        AppCategory::Default => same_process && current.window_title == title,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::SessionKind;
    use chrono::Utc;

    fn open_session(app: &str, process_id: i64, title: &str) -> ActiveSession {
        let now = Utc::now();
        ActiveSession {
            record_id: "session-1".to_string(),
            kind: SessionKind::App,
            app_name: app.to_string(),
            process_id,
            window_title: title.to_string(),
            url: None,
            domain: None,
            call_provider: None,
            started_at: now,
            last_seen_at: now,
            privacy_redacted: false,
            persisted: true,
        }
    }

    #[test]
    fn browser_continues_while_site_is_stable() {
        let current = open_session("Google Chrome", 10, "YouTube - Video One");
        assert!(continues(&current, "Google Chrome", 10, "YouTube - Video Two"));
    }

    #[test]
    fn browser_site_change_starts_new_session() {
        let current = open_session("Google Chrome", 10, "YouTube - Video One");
        assert!(!continues(&current, "Google Chrome", 10, "reddit.com: front page"));
    }

    #[test]
    fn browser_with_unresolvable_titles_compares_exactly() {
        let current = open_session("Google Chrome", 10, "New Tab");
        assert!(continues(&current, "Google Chrome", 10, "New Tab"));
        assert!(!continues(&current, "Google Chrome", 10, "Settings"));
    }

    #[test]
    fn browser_losing_its_site_breaks_the_session() {
        let current = open_session("Google Chrome", 10, "YouTube - Video One");
        assert!(!continues(&current, "Google Chrome", 10, "New Tab"));
    }

    #[test]
    fn browser_identity_requires_same_process() {
        let current = open_session("Google Chrome", 10, "YouTube - Video One");
        assert!(!continues(&current, "Google Chrome", 11, "YouTube - Video Two"));
        assert!(!continues(&current, "Safari", 10, "YouTube - Video Two"));
    }

    #[test]
    fn communication_apps_ignore_title_churn() {
        let current = open_session("Slack", 20, "#general - workspace");
        assert!(continues(&current, "Slack", 20, "#random - workspace"));
        assert!(!continues(&current, "Slack", 21, "#general - workspace"));
    }

    #[test]
    fn default_apps_require_exact_title_match() {
        let current = open_session("Visual Studio Code", 30, "main.rs - daylog");
        assert!(continues(&current, "Visual Studio Code", 30, "main.rs - daylog"));
        assert!(!continues(&current, "Visual Studio Code", 30, "lib.rs - daylog"));
    }
}
