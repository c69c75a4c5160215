use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

use crate::db::models::{CallProvider, SessionKind};

/// Timestamps are stored as epoch milliseconds in INTEGER columns.
pub fn to_millis(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

pub fn from_millis(value: i64, field: &str) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value)
        .ok_or_else(|| anyhow!("{field} contains out-of-range timestamp {value}"))
}

pub fn parse_kind(value: &str) -> Result<SessionKind> {
    match value {
        "app" => Ok(SessionKind::App),
        "web" => Ok(SessionKind::Web),
        "call" => Ok(SessionKind::Call),
        other => Err(anyhow!("unknown session kind {other}")),
    }
}

pub fn parse_provider(value: &str) -> Result<CallProvider> {
    match value {
        "meet" => Ok(CallProvider::Meet),
        "discord" => Ok(CallProvider::Discord),
        "zoom" => Ok(CallProvider::Zoom),
        "slack" => Ok(CallProvider::Slack),
        "other" => Ok(CallProvider::Other),
        other => Err(anyhow!("unknown call provider {other}")),
    }
}

pub fn parse_optional_provider(value: Option<String>) -> Result<Option<CallProvider>> {
    match value {
        Some(raw) => parse_provider(&raw).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_round_trip_preserves_instant() {
        let now = from_millis(to_millis(Utc::now()), "now").unwrap();
        assert_eq!(to_millis(now), now.timestamp_millis());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(parse_kind("browser").is_err());
    }

    #[test]
    fn provider_strings_match_storage_format() {
        for provider in ["meet", "discord", "zoom", "slack", "other"] {
            assert_eq!(parse_provider(provider).unwrap().as_str(), provider);
        }
        assert!(parse_optional_provider(None).unwrap().is_none());
    }
}
