//! Wire-level error types shared by the HID and serial transports.

/// How serious an error is for the device that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Logged and skipped; the device may appear on a later cycle.
    Info,
    /// Retryable or cycle-local.
    Warning,
    /// The device is gone or unusable.
    Critical,
}

/// Transport errors, classified per the recovery rules the engine applies.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// No device answered the locator.
    #[error("device not found: {0}")]
    NotFound(String),

    /// The OS refused to open the device.
    #[error("permission denied opening {0}")]
    PermissionDenied(String),

    /// Another process holds the handle.
    #[error("device busy: {0}")]
    Busy(String),

    /// The device vanished mid-operation.
    #[error("device disconnected: {0}")]
    Disconnected(String),

    /// A bounded wait elapsed without the operation completing.
    #[error("operation on {device} timed out after {timeout_ms}ms")]
    Timeout {
        /// Device identifier.
        device: String,
        /// Timeout in milliseconds.
        timeout_ms: u64,
    },

    /// Any other I/O failure without evidence of disconnection.
    #[error("io error: {0}")]
    Io(String),
}

impl TransportError {
    /// Severity used when logging the error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TransportError::NotFound(_) => ErrorSeverity::Info,
            TransportError::PermissionDenied(_) | TransportError::Busy(_) => ErrorSeverity::Warning,
            TransportError::Disconnected(_) => ErrorSeverity::Critical,
            TransportError::Timeout { .. } | TransportError::Io(_) => ErrorSeverity::Warning,
        }
    }

    /// True when a close-reopen-retry cycle may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TransportError::Timeout { .. } | TransportError::Io(_) | TransportError::Busy(_)
        )
    }

    /// True when the device is gone and the light must be dropped.
    pub fn is_disconnection(&self) -> bool {
        matches!(self, TransportError::Disconnected(_))
    }

    /// Create a timeout error.
    pub fn timeout(device: impl Into<String>, timeout_ms: u64) -> Self {
        TransportError::Timeout {
            device: device.into(),
            timeout_ms,
        }
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::NotFound => TransportError::NotFound(err.to_string()),
            ErrorKind::PermissionDenied => TransportError::PermissionDenied(err.to_string()),
            ErrorKind::TimedOut => TransportError::Timeout {
                device: String::new(),
                timeout_ms: 0,
            },
            ErrorKind::BrokenPipe | ErrorKind::ConnectionAborted | ErrorKind::ConnectionReset => {
                TransportError::Disconnected(err.to_string())
            }
            _ => TransportError::Io(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_the_locator() {
        let err = TransportError::NotFound("/dev/hidraw3".into());
        assert_eq!(err.to_string(), "device not found: /dev/hidraw3");
    }

    #[test]
    fn timeout_is_transient_not_disconnection() {
        let err = TransportError::timeout("blynclight", 100);
        assert!(err.is_transient());
        assert!(!err.is_disconnection());
        assert_eq!(err.severity(), ErrorSeverity::Warning);
    }

    #[test]
    fn disconnected_is_critical() {
        let err = TransportError::Disconnected("unplugged".into());
        assert!(err.is_disconnection());
        assert!(!err.is_transient());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn io_error_kinds_map_to_categories() {
        let gone = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        assert!(TransportError::from(gone).is_disconnection());

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(
            TransportError::from(denied),
            TransportError::PermissionDenied(_)
        ));
    }
}
