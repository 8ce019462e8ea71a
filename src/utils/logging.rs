//! Logger setup and conditional logging macros that check a module-level
//! `ENABLE_LOGS` flag.
//!
//! Usage:
//! ```ignore
//! // In your module, define the flag first:
//! const ENABLE_LOGS: bool = true;
//!
//! // Then use the macros (they're exported at the crate root):
//! use crate::{log_info, log_warn, log_error};
//!
//! log_info!("This will log if ENABLE_LOGS is true");
//! ```

use log::LevelFilter;

/// Installs `env_logger`. The screen shares the terminal with stderr, so the
/// default is `warn`; `verbose` raises it to `debug`. `RUST_LOG` wins over both.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

/// Conditional info logging. Each calling module must define `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Conditional warn logging. Each calling module must define `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Conditional error logging. Each calling module must define `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
