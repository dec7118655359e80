//! Controller configuration and the environment-variable contract.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use statuslight_engine::EngineConfig;
use tracing::warn;

/// Basic-auth credentials, passed through to the HTTP facade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub user: String,
    pub pass: String,
}

/// Logging verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Controller configuration.
///
/// Durations are carried in milliseconds so the struct serialises
/// flat and maps 1:1 onto the environment contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Registry re-enumeration period while events are watched.
    pub poll_interval_ms: u64,
    /// Bound on any single transport write.
    pub write_timeout_ms: u64,
    /// Frame dwell when neither effect nor kind specifies one.
    pub default_dwell_ms: u64,
    /// Credentials for the HTTP facade, when it wants them.
    pub auth: Option<AuthConfig>,
    /// CORS origin allowlist for the HTTP facade.
    pub cors_origins: Option<Vec<String>>,
    pub log_level: LogLevel,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1_000,
            write_timeout_ms: 100,
            default_dwell_ms: 500,
            auth: None,
            cors_origins: None,
            log_level: LogLevel::default(),
        }
    }
}

impl ControllerConfig {
    /// Build a configuration from the process environment:
    /// `POLL_INTERVAL_MS`, `WRITE_TIMEOUT_MS`, `AUTH_USER`/`AUTH_PASS`,
    /// `CORS_ORIGINS_JSON` (a JSON string list), and `DEBUG`.
    /// Unset variables keep their defaults; malformed values are
    /// warned and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(value) = env_parse::<u64>("POLL_INTERVAL_MS") {
            config.poll_interval_ms = value;
        }
        if let Some(value) = env_parse::<u64>("WRITE_TIMEOUT_MS") {
            config.write_timeout_ms = value;
        }
        if let (Ok(user), Ok(pass)) = (std::env::var("AUTH_USER"), std::env::var("AUTH_PASS")) {
            if !user.is_empty() {
                config.auth = Some(AuthConfig { user, pass });
            }
        }
        if let Ok(raw) = std::env::var("CORS_ORIGINS_JSON") {
            match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(origins) => config.cors_origins = Some(origins),
                Err(error) => warn!(%error, "ignoring malformed CORS_ORIGINS_JSON"),
            }
        }
        if let Ok(raw) = std::env::var("DEBUG") {
            if matches!(raw.as_str(), "1" | "true" | "yes") {
                config.log_level = LogLevel::Debug;
            }
        }
        config
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    pub fn default_dwell(&self) -> Duration {
        Duration::from_millis(self.default_dwell_ms)
    }

    /// The engine-level slice of this configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            poll_interval: self.poll_interval(),
            write_timeout: self.write_timeout(),
            default_dwell: self.default_dwell(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(name, raw, "ignoring malformed environment variable");
            None
        }
    }
}
