use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::TrackerConfig;
use crate::observer::{ObserveError, WindowObservation, WindowObserver};

use super::apps;
use super::domain;
use super::idle::IdleOracle;
use super::session::SessionManager;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

// Import the logging macros (exported at crate root)
use crate::{log_error, log_info, log_warn};

const TICK_TIMEOUT_SECS: u64 = 10;
const FALLBACK_TITLE_MAX_CHARS: usize = 100;

/// Keywords that mark a terminal window as the tracker's own activity
/// (running it, tailing its log, poking at its database). Recording those
/// would turn every session of real work into a tracker session.
const SELF_ACTIVITY_KEYWORDS: &[&str] = &[
    "tracker",
    "daylog",
    "/daylog",
    "cargo run",
    "tracker.log",
    "activity.db",
];

struct PollState {
    is_idle: bool,
    warned_missing_titles: bool,
}

impl PollState {
    fn new() -> Self {
        Self {
            is_idle: false,
            warned_missing_titles: false,
        }
    }
}

pub async fn poll_loop(
    config: TrackerConfig,
    mut manager: SessionManager,
    observer: Arc<dyn WindowObserver>,
    oracle: IdleOracle,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut state = PollState::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let fut = run_tick(&config, &mut manager, &observer, &oracle, &mut state);
                match tokio::time::timeout(Duration::from_secs(TICK_TIMEOUT_SECS), fut).await {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => log_error!("poll tick failed: {err:?}"),
                    Err(_) => log_warn!("poll tick timeout (> {TICK_TIMEOUT_SECS}s)"),
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("poll loop shutting down");
                break;
            }
        }
    }

    // leaving a record open across restarts would make its active_seconds
    // unbounded on the next read
    manager.shutdown(Utc::now()).await;
}

async fn run_tick(
    config: &TrackerConfig,
    manager: &mut SessionManager,
    observer: &Arc<dyn WindowObserver>,
    oracle: &IdleOracle,
    state: &mut PollState,
) -> Result<()> {
    let observed = capture_observation(observer, state).await?;

    // idle transitions run even when the capture produced nothing, so an
    // idle stretch still closes whatever session is open
    let idle_now = oracle.is_idle(config.idle_timeout_secs).await;
    if idle_now && !state.is_idle {
        log_info!("System is now idle");
        state.is_idle = true;
        manager.handle_idle(Utc::now()).await;
        return Ok(());
    }
    if !idle_now && state.is_idle {
        log_info!("System is now active");
        state.is_idle = false;
    }
    if idle_now {
        return Ok(());
    }

    let Some(observation) = observed else {
        return Ok(());
    };

    if is_tracker_activity(&observation.app_name, &observation.title) {
        log_info!("Skipping tracker self-activity in {}", observation.app_name);
        return Ok(());
    }

    if observation.title.is_empty() && apps::is_browser(&observation.app_name) {
        warn_missing_titles_once(state, None);
    }

    manager.handle_observation(&observation).await;
    Ok(())
}

/// One sample from the observer. `Ok(None)` means nothing usable this tick:
/// no foreground window, a logged transient failure, or a permission denial
/// (warned exactly once).
async fn capture_observation(
    observer: &Arc<dyn WindowObserver>,
    state: &mut PollState,
) -> Result<Option<WindowObservation>> {
    let observer = Arc::clone(observer);
    let result = tokio::task::spawn_blocking(move || observer.observe())
        .await
        .context("window observer worker join failed")?;

    match result {
        Ok(mut observation) => {
            synthesize_fallback_title(&mut observation);
            Ok(Some(observation))
        }
        Err(ObserveError::NoForegroundWindow) => {
            log_info!("No active window detected");
            Ok(None)
        }
        Err(ObserveError::PermissionDenied(detail)) => {
            warn_missing_titles_once(state, Some(&detail));
            Ok(None)
        }
        Err(ObserveError::Backend(detail)) => {
            log_warn!("Window query failed: {detail}");
            Ok(None)
        }
    }
}

fn warn_missing_titles_once(state: &mut PollState, detail: Option<&str>) {
    if state.warned_missing_titles {
        return;
    }
    state.warned_missing_titles = true;
    if let Some(detail) = detail {
        log_warn!("Window query not permitted: {detail}");
    }
    log_warn!("Window titles are unavailable; sessions will carry app names only");
    log_warn!(
        "On macOS: System Settings > Privacy & Security > Screen Recording, \
         allow your terminal, then restart daylog"
    );
}

/// Browsers sometimes report an empty title while the tab URL is still
/// readable. Build a "host/path" stand-in so the session keeps a usable
/// identity.
fn synthesize_fallback_title(observation: &mut WindowObservation) {
    if !observation.title.is_empty() {
        return;
    }
    let Some(url) = observation.url.as_deref() else {
        return;
    };
    observation.title = title_from_url(url);
}

fn title_from_url(url: &str) -> String {
    let Some((host, path)) = domain::host_and_path(url) else {
        return url.to_string();
    };
    let mut title = host;
    if !path.is_empty() && path != "/" {
        title.push_str(&path);
    }
    if title.chars().count() > FALLBACK_TITLE_MAX_CHARS {
        let mut truncated: String = title.chars().take(FALLBACK_TITLE_MAX_CHARS).collect();
        truncated.push_str("...");
        truncated
    } else {
        title
    }
}

fn is_tracker_activity(app_name: &str, title: &str) -> bool {
    if !apps::is_terminal(app_name) {
        return false;
    }
    let app_lower = app_name.to_lowercase();
    let title_lower = title.to_lowercase();
    SELF_ACTIVITY_KEYWORDS
        .iter()
        .any(|keyword| title_lower.contains(keyword) || app_lower.contains(keyword))
}
