//! HID transport traits.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::device_info::HidDeviceInfo;
use statuslight_errors::TransportResult;

/// One open HID handle.
///
/// Implementations own the platform report-id prefix rule: callers hand
/// over the logical report and the adapter prepends/strips the zero
/// report-id byte where the OS requires it.
#[async_trait]
pub trait HidTransport: Send + Sync {
    /// Write one complete output report.
    async fn write_report(&self, data: &[u8]) -> TransportResult<()>;

    /// Write one complete feature report.
    ///
    /// Feature reports always carry an explicit report-id byte, so the
    /// zero-prefix rule never applies here.
    async fn write_feature_report(&self, data: &[u8]) -> TransportResult<()>;

    /// Read one input report, waiting at most `timeout`.
    ///
    /// Only a minority of devices expose readable state (button
    /// families); most drivers never call this.
    async fn read_report(&self, max_len: usize, timeout: Duration) -> TransportResult<Vec<u8>>;

    /// Close and reopen the underlying handle in place.
    ///
    /// Used by the engine's transient-error recovery; the handle keeps
    /// its identity and pending writers simply retry.
    async fn reopen(&self) -> TransportResult<()>;

    /// Close the handle. Idempotent.
    async fn close(&self);

    /// Identity of the device behind this handle.
    fn info(&self) -> &HidDeviceInfo;
}

/// Enumerates and opens HID devices.
#[async_trait]
pub trait HidBus: Send + Sync {
    /// List every HID device currently visible to the OS.
    async fn enumerate(&self) -> TransportResult<Vec<HidDeviceInfo>>;

    /// Open the device at `info.path` for exclusive use.
    async fn open(&self, info: &HidDeviceInfo) -> TransportResult<Arc<dyn HidTransport>>;
}
