//! Fallback backends for platforms without a window-observation
//! implementation. The tracker runs, records nothing, and never reports
//! the user idle.

use super::types::{IdleProbe, ObserveError, WindowObservation, WindowObserver};

pub struct NoopObserver;

impl NoopObserver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoopObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowObserver for NoopObserver {
    fn observe(&self) -> Result<WindowObservation, ObserveError> {
        Err(ObserveError::NoForegroundWindow)
    }
}

pub struct NoopIdleProbe;

impl NoopIdleProbe {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoopIdleProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl IdleProbe for NoopIdleProbe {
    fn poll_idle_seconds(&self) -> Result<u64, ObserveError> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_observer_reports_no_window() {
        assert!(matches!(
            NoopObserver::new().observe(),
            Err(ObserveError::NoForegroundWindow)
        ));
    }

    #[test]
    fn noop_probe_never_reports_idle() {
        assert_eq!(NoopIdleProbe::new().poll_idle_seconds().unwrap(), 0);
    }
}
