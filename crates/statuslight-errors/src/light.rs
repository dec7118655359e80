//! Device-level errors visible at the library boundary.

use crate::transport::TransportError;

/// Errors surfaced to library callers.
///
/// Everything recoverable is handled inside the engine; callers see only
/// argument problems and terminal device failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LightError {
    /// A colour or LED index could not be interpreted.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The light went away between selection and use.
    #[error("light unavailable: {0}")]
    Unavailable(String),

    /// The light was marked failed after exhausting write recovery.
    #[error("light {light} failed: {reason}")]
    Failed {
        /// Logical name of the light.
        light: String,
        /// Terminal transport error description.
        reason: String,
    },
}

impl LightError {
    /// Create an invalid-argument error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        LightError::InvalidArgument(msg.into())
    }

    /// Wrap the terminal transport error that killed a light.
    pub fn failed(light: impl Into<String>, err: &TransportError) -> Self {
        LightError::Failed {
            light: light.into(),
            reason: err.to_string(),
        }
    }
}
