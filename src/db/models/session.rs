//! Session data models.
//!
//! A session is one contiguous block of foreground activity: the same app
//! (and for browsers, the same site) observed across consecutive polls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    App,
    Web,
    Call,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::App => "app",
            SessionKind::Web => "web",
            SessionKind::Call => "call",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallProvider {
    Meet,
    Discord,
    Zoom,
    Slack,
    Other,
}

impl CallProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallProvider::Meet => "meet",
            CallProvider::Discord => "discord",
            CallProvider::Zoom => "zoom",
            CallProvider::Slack => "slack",
            CallProvider::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub kind: SessionKind,
    pub app_name: String,
    pub process_id: i64,
    pub window_title: String,
    pub url: Option<String>,
    pub domain: Option<String>,
    pub call_provider: Option<CallProvider>,
    pub start_ts: DateTime<Utc>,
    pub end_ts: DateTime<Utc>,
    /// Derived from the endpoints, never accumulated per poll:
    /// `floor((end_ts - start_ts) / 1000)`.
    pub active_seconds: i64,
    pub privacy_redacted: bool,
}

/// Partial update for an existing session row. `None` fields are left
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub window_title: Option<String>,
    pub end_ts: Option<DateTime<Utc>>,
    pub active_seconds: Option<i64>,
    pub kind: Option<SessionKind>,
    pub call_provider: Option<CallProvider>,
}

pub fn active_seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_seconds().max(0)
}
