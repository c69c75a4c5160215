pub mod noop;
pub mod types;

#[cfg(target_os = "macos")]
pub mod macos;

pub use noop::{NoopIdleProbe, NoopObserver};
pub use types::{IdleProbe, ObserveError, WindowObservation, WindowObserver};

#[cfg(target_os = "macos")]
pub use macos::{MacosIdleProbe, MacosObserver};

#[cfg(target_os = "macos")]
pub type PlatformObserver = MacosObserver;
#[cfg(target_os = "macos")]
pub type PlatformIdleProbe = MacosIdleProbe;

#[cfg(not(target_os = "macos"))]
pub type PlatformObserver = NoopObserver;
#[cfg(not(target_os = "macos"))]
pub type PlatformIdleProbe = NoopIdleProbe;
