//! Logging initialisation for processes embedding the controller.

use tracing_subscriber::EnvFilter;

use crate::config::ControllerConfig;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies
/// to the whole workspace. Safe to call more than once — later calls
/// are no-ops.
pub fn init_tracing(config: &ControllerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_filter()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
