//! Call detection. An ordered rule table maps an observation onto a call
//! provider; the first matching rule wins, so rule order is part of the
//! behavior (a Discord window titled "video call" must resolve as Discord,
//! not as a generic meeting).

use crate::db::models::CallProvider;

/// Title fragments that mean a Discord window is in a voice or video
/// state rather than plain text chat.
const DISCORD_CALL_MARKERS: &[&str] = &[
    "voice",
    "call",
    "video",
    "screen share",
    "screenshare",
    "streaming",
    "live",
    "voice channel",
    "stage channel",
    "\u{1F50A}",
    "\u{1F3A4}",
    "\u{1F507}",
    "muted",
    "unmuted",
];

const TEAMS_CALL_MARKERS: &[&str] = &["meeting", "call", "video"];

struct RuleInput {
    app: String,
    title: String,
    domain: String,
}

struct CallRule {
    provider: CallProvider,
    matches: fn(&RuleInput) -> bool,
}

const CALL_RULES: &[CallRule] = &[
    CallRule {
        provider: CallProvider::Meet,
        matches: is_meet,
    },
    CallRule {
        provider: CallProvider::Discord,
        matches: is_discord_call,
    },
    CallRule {
        provider: CallProvider::Zoom,
        matches: is_zoom,
    },
    CallRule {
        provider: CallProvider::Slack,
        matches: is_slack_huddle,
    },
    CallRule {
        provider: CallProvider::Other,
        matches: is_teams_meeting,
    },
    CallRule {
        provider: CallProvider::Other,
        matches: is_facetime,
    },
];

fn is_meet(input: &RuleInput) -> bool {
    input.domain.contains("meet.google.com")
        || (input.title.contains("meet") && input.domain.contains("google"))
}

fn is_discord_call(input: &RuleInput) -> bool {
    input.app.contains("discord") && contains_any(&input.title, DISCORD_CALL_MARKERS)
}

fn is_zoom(input: &RuleInput) -> bool {
    input.app.contains("zoom")
        || input.domain.contains("zoom.us")
        || input.title.contains("zoom meeting")
}

fn is_slack_huddle(input: &RuleInput) -> bool {
    input.app.contains("slack") && input.title.contains("huddle")
}

fn is_teams_meeting(input: &RuleInput) -> bool {
    input.app.contains("teams") && contains_any(&input.title, TEAMS_CALL_MARKERS)
}

fn is_facetime(input: &RuleInput) -> bool {
    input.app.contains("facetime")
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Classifies an observation as a call, or `None` when it is ordinary
/// activity. Matching is case-insensitive across all inputs.
pub fn classify(
    app_name: &str,
    window_title: &str,
    domain: Option<&str>,
    url: Option<&str>,
) -> Option<CallProvider> {
    // no current rule reads the raw url; callers derive `domain` from it
    let _ = url;
    let input = RuleInput {
        app: app_name.to_lowercase(),
        title: window_title.to_lowercase(),
        domain: domain.unwrap_or("").to_lowercase(),
    };
    CALL_RULES
        .iter()
        .find(|rule| (rule.matches)(&input))
        .map(|rule| rule.provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meet_matches_by_domain_alone() {
        assert_eq!(
            classify("Google Chrome", "weekly sync", Some("meet.google.com"), None),
            Some(CallProvider::Meet)
        );
    }

    #[test]
    fn meet_title_keyword_needs_google_domain() {
        assert_eq!(
            classify("Google Chrome", "Meet - standup", Some("google.com"), None),
            Some(CallProvider::Meet)
        );
        assert_eq!(classify("Google Chrome", "Meet - standup", None, None), None);
    }

    #[test]
    fn discord_needs_a_voice_marker_in_the_title() {
        assert_eq!(
            classify("Discord", "#general - Discord", None, None),
            None
        );
        assert_eq!(
            classify("Discord", "Voice Channel - dev hangout", None, None),
            Some(CallProvider::Discord)
        );
        assert_eq!(
            classify("Discord", "\u{1F50A} lounge", None, None),
            Some(CallProvider::Discord)
        );
    }

    #[test]
    fn discord_wins_over_generic_video_rules() {
        // "video call" also matches the Teams markers; rule order decides
        assert_eq!(
            classify("Discord", "video call with sam", None, None),
            Some(CallProvider::Discord)
        );
    }

    #[test]
    fn zoom_matches_by_app_or_domain() {
        assert_eq!(
            classify("zoom.us", "window", None, None),
            Some(CallProvider::Zoom)
        );
        assert_eq!(
            classify("Google Chrome", "join", Some("us02web.zoom.us"), None),
            Some(CallProvider::Zoom)
        );
    }

    #[test]
    fn slack_huddle_is_slack_not_generic() {
        assert_eq!(
            classify("Slack", "Huddle with design", None, None),
            Some(CallProvider::Slack)
        );
        assert_eq!(classify("Slack", "#random", None, None), None);
    }

    #[test]
    fn teams_and_facetime_fall_back_to_other() {
        assert_eq!(
            classify("Microsoft Teams", "Sprint review meeting", None, None),
            Some(CallProvider::Other)
        );
        assert_eq!(classify("Microsoft Teams", "chats", None, None), None);
        assert_eq!(
            classify("FaceTime", "", None, None),
            Some(CallProvider::Other)
        );
    }

    #[test]
    fn ordinary_apps_are_not_calls() {
        assert_eq!(classify("Visual Studio Code", "main.rs", None, None), None);
        assert_eq!(classify("Finder", "Downloads", None, None), None);
    }
}
