//! Diagnostic logging to stderr.
//!
//! `TASKMASTER_LOG` (an `EnvFilter` directive such as `taskmaster_core=debug`)
//! takes precedence over the configured level.

use crate::error::AppError;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "TASKMASTER_LOG";

/// Installs the global subscriber. Later calls, or a subscriber installed by
/// someone else, leave the existing one in place.
pub fn init_logging(level: &str) -> Result<(), AppError> {
    let filter = match EnvFilter::try_from_env(LOG_ENV_VAR) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).map_err(|err| {
            AppError::invalid_input(format!("invalid log level `{level}`: {err}"))
        })?,
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    Ok(())
}
