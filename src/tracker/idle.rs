use std::sync::Arc;

use log::warn;

use crate::observer::IdleProbe;

/// Answers "how long since the user last touched an input device". Probe
/// failures degrade to zero so a broken probe can never freeze tracking by
/// pinning the system idle.
pub struct IdleOracle {
    probe: Arc<dyn IdleProbe>,
}

impl IdleOracle {
    pub fn new(probe: Arc<dyn IdleProbe>) -> Self {
        Self { probe }
    }

    pub async fn idle_seconds(&self) -> u64 {
        let probe = Arc::clone(&self.probe);
        match tokio::task::spawn_blocking(move || probe.poll_idle_seconds()).await {
            Ok(Ok(seconds)) => seconds,
            Ok(Err(err)) => {
                warn!("Idle probe failed: {err}");
                0
            }
            Err(err) => {
                warn!("Idle probe worker failed to join: {err}");
                0
            }
        }
    }

    pub async fn is_idle(&self, threshold_seconds: u64) -> bool {
        self.idle_seconds().await >= threshold_seconds
    }
}
