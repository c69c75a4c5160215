use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::TrackerConfig;
use crate::observer::{IdleProbe, WindowObserver};

use super::idle::IdleOracle;
use super::poll_loop::poll_loop;
use super::session::SessionManager;

pub struct TrackerController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl TrackerController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn start(
        &mut self,
        config: TrackerConfig,
        manager: SessionManager,
        observer: Arc<dyn WindowObserver>,
        probe: Arc<dyn IdleProbe>,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("tracker already running");
        }

        info!(
            "Starting tracker: poll every {:?}, idle after {}s",
            config.poll_interval, config.idle_timeout_secs
        );

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let oracle = IdleOracle::new(probe);
        let handle = tokio::spawn(poll_loop(config, manager, observer, oracle, token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("poll loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::observer::{NoopIdleProbe, NoopObserver};
    use tokio::time::Duration;

    fn test_config() -> TrackerConfig {
        TrackerConfig {
            poll_interval: Duration::from_millis(10),
            ..TrackerConfig::default()
        }
    }

    #[tokio::test]
    async fn start_twice_is_rejected() {
        let db = Database::in_memory().unwrap();
        let mut controller = TrackerController::new();

        controller
            .start(
                test_config(),
                SessionManager::new(db.clone(), false),
                Arc::new(NoopObserver::new()),
                Arc::new(NoopIdleProbe::new()),
            )
            .unwrap();
        let second = controller.start(
            test_config(),
            SessionManager::new(db.clone(), false),
            Arc::new(NoopObserver::new()),
            Arc::new(NoopIdleProbe::new()),
        );
        assert!(second.is_err());

        controller.stop().await.unwrap();
    }

    #[tokio::test]
    async fn stop_joins_the_loop_and_is_idempotent() {
        let db = Database::in_memory().unwrap();
        let mut controller = TrackerController::new();

        controller
            .start(
                test_config(),
                SessionManager::new(db, false),
                Arc::new(NoopObserver::new()),
                Arc::new(NoopIdleProbe::new()),
            )
            .unwrap();

        controller.stop().await.unwrap();
        controller.stop().await.unwrap();
    }
}
