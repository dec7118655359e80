//! The driver capability surface every device family implements.

use std::time::Duration;

use crate::color::{LedIndex, Rgb};
use crate::speed::Speed;

/// One complete packet handed to the transport for a single write.
///
/// A multi-report command is a `Vec<Frame>`; each frame is one logical
/// write, issued in order.
pub type Frame = Vec<u8>;

/// Which physical wire the family speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Hid,
    Serial,
}

/// Whether the firmware auto-quiesces without periodic refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepAlive {
    /// The last written state holds until the next write.
    Stateless,
    /// The device reverts to dark unless refreshed within `interval`.
    Stateful { interval: Duration },
}

impl KeepAlive {
    pub fn is_stateful(self) -> bool {
        matches!(self, KeepAlive::Stateful { .. })
    }
}

/// Colour resolution the firmware can display.
///
/// The engine quantises colours before encoding for `ThreeBit`
/// devices so drivers stay free of that policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    /// Full 8-bit-per-channel colour.
    TrueColor,
    /// One bit per channel (eight displayable colours).
    ThreeBit,
}

/// How a HID family's frames reach the device.
///
/// Most firmware takes output reports; a few (the Blink(1)) only
/// listen on feature reports. Serial families ignore this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    Output,
    Feature,
}

/// Static identity a driver declares for one opened device.
#[derive(Debug, Clone)]
pub struct DriverIdentity {
    pub vendor_id: u16,
    pub product_id: u16,
    /// Human name chosen by the driver ("Blynclight Mini", …).
    pub logical_name: String,
    /// Number of individually addressable LEDs, >= 1.
    pub led_count: u8,
    pub transport_kind: TransportKind,
    pub keepalive: KeepAlive,
    pub color_depth: ColorDepth,
    pub report_mode: ReportMode,
}

/// Translates semantic commands into a family's exact wire bytes.
///
/// Encoders are pure and infallible; getting the bytes onto the wire
/// (and every failure mode that entails) is the caller's problem.
pub trait DeviceDriver: Send + Sync {
    /// Identity and capabilities of the device this driver was built for.
    fn identity(&self) -> &DriverIdentity;

    /// Frames that display `color` steadily on the targeted LEDs.
    fn encode_solid(&self, color: Rgb, led: LedIndex) -> Vec<Frame>;

    /// Frames that drive the targeted LEDs dark.
    fn encode_off(&self, led: LedIndex) -> Vec<Frame>;

    /// The dedicated watchdog-extension frame, for stateful firmware.
    ///
    /// `None` for every stateless family.
    fn encode_keepalive(&self) -> Option<Frame>;

    /// Hardware blink between `on` and `off`, where the firmware
    /// supports it natively. `None` means the engine synthesises blink
    /// from solid/off writes.
    fn encode_blink_native(&self, on: Rgb, off: Rgb, speed: Speed) -> Option<Vec<Frame>>;
}
