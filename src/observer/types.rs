use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One sample of the foreground window, taken at a single instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowObservation {
    pub app_name: String,
    pub process_id: i64,
    /// Window title as reported by the OS. Empty when the title is
    /// unavailable (common before the Screen Recording permission is granted).
    pub title: String,
    /// Frontmost tab URL, best-effort and browser-only.
    pub url: Option<String>,
    pub captured_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum ObserveError {
    /// No window currently has focus (desktop, screensaver, login window).
    #[error("no foreground window")]
    NoForegroundWindow,

    /// The OS refused the query. Distinguished from the other variants so
    /// the caller can warn the user exactly once instead of every tick.
    #[error("window query not permitted: {0}")]
    PermissionDenied(String),

    /// The platform query ran but produced something unusable.
    #[error("window query failed: {0}")]
    Backend(String),
}

/// Source of foreground-window samples. Implementations may block; callers
/// run them through `spawn_blocking`.
pub trait WindowObserver: Send + Sync {
    fn observe(&self) -> Result<WindowObservation, ObserveError>;
}

/// Source of the user's input-idle time. Blocking, like `WindowObserver`.
pub trait IdleProbe: Send + Sync {
    fn poll_idle_seconds(&self) -> Result<u64, ObserveError>;
}
