//! Logging bootstrap for hosts embedding the engine.
//!
//! The engine itself only talks to the `log` facade. Hosts that want the
//! output somewhere call [`init_logging`] once at startup.
//!
//! # Invariants
//! - Initialization is idempotent for the same level.
//! - Initialization never panics.

use flexi_logger::{Logger, LoggerHandle, WriteMode};
use log::info;
use std::sync::OnceLock;

static LOGGER: OnceLock<LoggingState> = OnceLock::new();

struct LoggingState {
    level: String,
    _handle: LoggerHandle,
}

/// Returns the default log level for the current build mode.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) { "debug" } else { "warn" }
}

/// Starts a stderr logger. `RUST_LOG` overrides `level` when set.
///
/// # Errors
/// - Returns an error when `level` cannot be parsed.
/// - Returns an error when logging was already started with another level.
pub fn init_logging(level: &str) -> Result<(), String> {
    let level = level.trim().to_ascii_lowercase();

    if let Some(state) = LOGGER.get() {
        if state.level == level {
            return Ok(());
        }
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            state.level, level
        ));
    }

    let handle = Logger::try_with_env_or_str(&level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_stderr()
        .write_mode(WriteMode::Direct)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    info!(
        "event=logging_start level={} version={}",
        level,
        env!("CARGO_PKG_VERSION")
    );

    let _ = LOGGER.set(LoggingState {
        level,
        _handle: handle,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_is_known() {
        assert!(["debug", "warn"].contains(&default_log_level()));
    }
}
