//! Structured logging setup.
//!
//! Installs a global `tracing-subscriber` formatter driven by [`LoggingConfig`].
//! `RUST_LOG` takes precedence over the configured level when set.

use crate::config::LoggingConfig;
use crate::error::{BundleError, Result};
use once_cell::sync::OnceCell;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Outcome of the first installation attempt
static INIT: OnceCell<std::result::Result<(), String>> = OnceCell::new();

/// Install the global subscriber once; later calls return the first outcome.
///
/// # Errors
/// Returns `BundleError::ConfigError` if another subscriber was already
/// installed outside this crate, on the first and on every later call.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    INIT.get_or_init(|| install(config))
        .clone()
        .map_err(|e| BundleError::ConfigError(format!("Failed to install log subscriber: {e}")))
}

fn install(config: &LoggingConfig) -> std::result::Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string().to_ascii_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| e.to_string())?;

    info!(app = %config.app_name, level = %config.log_level, "Logging initialized");
    Ok(())
}
