//! Logging macros gated on a module-level `ENABLE_LOGS` flag.
//!
//! Chatty modules (the poll loop, the session manager) define the flag so
//! their per-tick output can be silenced without touching call sites:
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_info, log_warn, log_error};
//!
//! log_info!("logged only while ENABLE_LOGS is true");
//! ```

/// Info-level logging, gated on the `ENABLE_LOGS` const of the calling module.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Warn-level logging, gated on the `ENABLE_LOGS` const of the calling module.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Error-level logging, gated on the `ENABLE_LOGS` const of the calling module.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
