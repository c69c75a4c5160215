use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::db::Database;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerConfig {
    #[serde(with = "duration_ms", rename = "pollIntervalMs")]
    pub poll_interval: Duration,
    pub idle_timeout_secs: u64,
    pub privacy_mode: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
            privacy_mode: false,
        }
    }
}

impl TrackerConfig {
    /// Reads the settings table once at startup. Missing or unusable values
    /// fall back to their defaults with a warning; configuration problems
    /// never stop the tracker.
    pub async fn load(db: &Database) -> Self {
        let mut config = Self::default();

        match read_u64(db, "polling_interval_ms").await {
            // tokio's interval panics on a zero period
            Some(0) => warn!("polling_interval_ms is 0; keeping {DEFAULT_POLL_INTERVAL_MS}ms"),
            Some(ms) => config.poll_interval = Duration::from_millis(ms),
            None => {}
        }

        match read_u64(db, "idle_timeout_seconds").await {
            Some(0) => warn!("idle_timeout_seconds is 0; keeping {DEFAULT_IDLE_TIMEOUT_SECS}s"),
            Some(secs) => config.idle_timeout_secs = secs,
            None => {}
        }

        match db.get_setting("privacy_mode").await {
            Ok(Some(raw)) => match raw.as_str() {
                "true" => config.privacy_mode = true,
                "false" => config.privacy_mode = false,
                other => warn!("Setting privacy_mode is not a boolean ({other}); using default"),
            },
            Ok(None) => {}
            Err(err) => warn!("Failed to read setting privacy_mode: {err:?}"),
        }

        config
    }
}

async fn read_u64(db: &Database, key: &str) -> Option<u64> {
    let raw = match db.get_setting(key).await {
        Ok(value) => value?,
        Err(err) => {
            warn!("Failed to read setting {key}: {err:?}");
            return None;
        }
    };
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Setting {key} is not a number ({raw}); using default");
            None
        }
    }
}

mod duration_ms {
    use super::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
