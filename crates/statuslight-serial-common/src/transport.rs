//! Serial transport traits.

use std::sync::Arc;

use async_trait::async_trait;

use crate::device_info::SerialDeviceInfo;
use statuslight_errors::TransportResult;

/// One open serial port.
#[async_trait]
pub trait SerialTransport: Send + Sync {
    /// Write one complete command frame (including any line terminator
    /// the protocol requires).
    async fn write_frame(&self, data: &[u8]) -> TransportResult<()>;

    /// Close and reopen the port in place.
    async fn reopen(&self) -> TransportResult<()>;

    /// Close the port. Idempotent.
    async fn close(&self);

    /// Identity of the device behind this port.
    fn info(&self) -> &SerialDeviceInfo;
}

/// Enumerates and opens USB-serial devices.
#[async_trait]
pub trait SerialBus: Send + Sync {
    /// List every USB-backed serial port currently visible to the OS.
    async fn enumerate(&self) -> TransportResult<Vec<SerialDeviceInfo>>;

    /// Open the port at `info.path` with the given baud rate.
    async fn open(&self, info: &SerialDeviceInfo, baud: u32)
        -> TransportResult<Arc<dyn SerialTransport>>;
}
