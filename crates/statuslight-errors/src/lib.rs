//! Centralized error types for statuslight.
//!
//! The error system is split by domain:
//!
//! - [`transport`]: wire-level failures (open, write, read) and their
//!   transient/persistent classification
//! - [`light`]: device-level failures surfaced to library callers
//!
//! The engine consumes recoverable transport errors internally; only
//! [`LightError::InvalidArgument`] and device-failure notifications are
//! visible at the library boundary. Empty selections and cooperative
//! cancellation are deliberately not errors and have no type here.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod light;
pub mod transport;

pub use light::LightError;
pub use transport::{ErrorSeverity, TransportError};

/// A specialized `Result` for transport operations.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// A specialized `Result` for light-level operations.
pub type LightResult<T> = std::result::Result<T, LightError>;
