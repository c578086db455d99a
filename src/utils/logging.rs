//! Logging macros gated by a module-level `ENABLE_LOGS` flag.
//!
//! Each module that logs defines the flag next to its imports:
//! ```rust,ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_debug, log_warn};
//!
//! log_debug!("Added an app to the cache: {name}.");
//! ```
//!
//! Flipping the flag silences one noisy module without touching `RUST_LOG`.

/// Debug-level logging, skipped when the calling module's `ENABLE_LOGS` is false.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}
