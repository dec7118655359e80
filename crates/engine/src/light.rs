//! A successfully opened physical device and its write path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex as AsyncMutex;
use tracing::warn;

use crate::color::{LedIndex, Rgb};
use crate::driver::{DeviceDriver, DriverIdentity, Frame, ReportMode};
use crate::events::LightDescriptor;
use statuslight_errors::{TransportError, TransportResult};
use statuslight_hid_common::HidTransport;
use statuslight_serial_common::SerialTransport;

/// Registry-scoped identity of one light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LightId(pub u64);

impl std::fmt::Display for LightId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "light-{}", self.0)
    }
}

/// The open handle behind a light, HID or serial.
pub enum LightTransport {
    Hid(Arc<dyn HidTransport>),
    Serial(Arc<dyn SerialTransport>),
}

impl LightTransport {
    async fn write(&self, frame: &[u8], mode: ReportMode) -> TransportResult<()> {
        match self {
            LightTransport::Hid(t) => match mode {
                ReportMode::Output => t.write_report(frame).await,
                ReportMode::Feature => t.write_feature_report(frame).await,
            },
            LightTransport::Serial(t) => t.write_frame(frame).await,
        }
    }

    async fn reopen(&self) -> TransportResult<()> {
        match self {
            LightTransport::Hid(t) => t.reopen().await,
            LightTransport::Serial(t) => t.reopen().await,
        }
    }

    pub async fn close(&self) {
        match self {
            LightTransport::Hid(t) => t.close().await,
            LightTransport::Serial(t) => t.close().await,
        }
    }

    fn path(&self) -> &str {
        match self {
            LightTransport::Hid(t) => &t.info().path,
            LightTransport::Serial(t) => &t.info().path,
        }
    }

    fn serial_number(&self) -> Option<String> {
        match self {
            LightTransport::Hid(t) => t.info().serial_number.clone(),
            LightTransport::Serial(t) => t.info().serial_number.clone(),
        }
    }
}

/// Last commanded state, for `list()` introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandedState {
    Off,
    Solid(Rgb),
    Effect(&'static str),
}

/// One opened device: identity, driver, exclusive handle, and the
/// bookkeeping the keep-alive path needs.
///
/// All writes are serialized through the per-light mutex; the runner
/// and keep-alive tasks are the only callers.
pub struct Light {
    id: LightId,
    driver: Arc<dyn DeviceDriver>,
    transport: LightTransport,
    write_timeout: Duration,
    /// Serializes transport access: at most one writer at a time.
    io: AsyncMutex<()>,
    /// Last commanded colour per LED index (0 = whole device).
    last_colors: parking_lot::Mutex<HashMap<u8, Rgb>>,
    /// The frames that re-assert the current visible state, re-sent by
    /// the keep-alive task on stateful devices.
    renewal: parking_lot::Mutex<Vec<Frame>>,
    state: parking_lot::Mutex<CommandedState>,
    failed: AtomicBool,
}

impl Light {
    pub fn new(
        id: LightId,
        driver: Arc<dyn DeviceDriver>,
        transport: LightTransport,
        write_timeout: Duration,
    ) -> Self {
        Self {
            id,
            driver,
            transport,
            write_timeout,
            io: AsyncMutex::new(()),
            last_colors: parking_lot::Mutex::new(HashMap::new()),
            renewal: parking_lot::Mutex::new(Vec::new()),
            state: parking_lot::Mutex::new(CommandedState::Off),
            failed: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> LightId {
        self.id
    }

    pub fn identity(&self) -> &DriverIdentity {
        self.driver.identity()
    }

    pub fn driver(&self) -> &Arc<dyn DeviceDriver> {
        &self.driver
    }

    /// Human name chosen by the driver.
    pub fn name(&self) -> &str {
        &self.identity().logical_name
    }

    pub fn path(&self) -> &str {
        self.transport.path()
    }

    pub fn descriptor(&self) -> LightDescriptor {
        let identity = self.identity();
        LightDescriptor {
            id: self.id,
            logical_name: identity.logical_name.clone(),
            vendor_id: identity.vendor_id,
            product_id: identity.product_id,
            serial_number: self.transport.serial_number(),
            path: self.path().to_string(),
        }
    }

    pub fn commanded_state(&self) -> CommandedState {
        *self.state.lock()
    }

    pub(crate) fn set_state(&self, state: CommandedState) {
        *self.state.lock() = state;
    }

    /// The most recent non-bookkeeping colour, for `list()`.
    pub fn last_color(&self) -> Option<Rgb> {
        let colors = self.last_colors.lock();
        colors
            .get(&0)
            .copied()
            .or_else(|| colors.values().next().copied())
    }

    pub fn is_failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }

    pub(crate) fn mark_failed(&self) {
        self.failed.store(true, Ordering::SeqCst);
    }

    pub(crate) fn remember_color(&self, led: LedIndex, color: Rgb) {
        self.last_colors.lock().insert(led.0, color);
    }

    pub(crate) fn forget_colors(&self, led: LedIndex) {
        let mut colors = self.last_colors.lock();
        if led.is_all() {
            colors.clear();
        } else {
            colors.remove(&led.0);
        }
    }

    /// Snapshot of the per-LED colour memo.
    pub(crate) fn remembered_colors(&self) -> Vec<(LedIndex, Rgb)> {
        self.last_colors
            .lock()
            .iter()
            .map(|(&led, &color)| (LedIndex(led), color))
            .collect()
    }

    /// Record the frames that re-assert the current visible state.
    pub(crate) fn set_renewal(&self, frames: Vec<Frame>) {
        *self.renewal.lock() = frames;
    }

    pub(crate) fn clear_renewal(&self) {
        self.renewal.lock().clear();
    }

    /// Frames the keep-alive task re-sends to renew the current state.
    pub(crate) fn renewal_frames(&self) -> Vec<Frame> {
        self.renewal.lock().clone()
    }

    /// Write a command's frames in order, applying the transient-error
    /// recovery rule: a timeout or unexplained I/O failure closes and
    /// reopens the handle and retries the frame once. Any error
    /// returned from here is terminal for the light.
    pub async fn write_frames(&self, frames: &[Frame]) -> TransportResult<()> {
        let _guard = self.io.lock().await;
        for frame in frames {
            self.write_one(frame).await?;
        }
        Ok(())
    }

    async fn write_one(&self, frame: &[u8]) -> TransportResult<()> {
        let mode = self.identity().report_mode;
        let first = match tokio::time::timeout(self.write_timeout, self.transport.write(frame, mode))
            .await
        {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(err)) => err,
            Err(_) => TransportError::timeout(self.path(), self.write_timeout.as_millis() as u64),
        };
        if first.is_disconnection() {
            return Err(first);
        }
        if !first.is_transient() {
            return Err(first);
        }

        warn!(light = %self.id, error = %first, "transient write failure, reopening");
        self.transport.reopen().await?;

        match tokio::time::timeout(self.write_timeout, self.transport.write(frame, mode)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(TransportError::timeout(
                self.path(),
                self.write_timeout.as_millis() as u64,
            )),
        }
    }

    pub async fn close(&self) {
        self.transport.close().await;
    }
}
