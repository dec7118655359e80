//! Luxafor driver (8-byte HID family).
//!
//! Every Luxafor product shares one VID/PID; the actual hardware —
//! Flag (six LEDs), Mute button, Orb, or the BT dongle — is recovered
//! from the USB product string. All variants speak the same command
//! set; only the LED topology differs.

use statuslight_hid_luxafor_protocol as proto;

use crate::color::{LedIndex, Rgb};
use crate::driver::{
    ColorDepth, DeviceDriver, DriverIdentity, Frame, KeepAlive, ReportMode, TransportKind,
};
use crate::speed::Speed;

/// Luxafor hardware variants behind the shared VID/PID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LuxaforVariant {
    Flag,
    Mute,
    Orb,
    Bluetooth,
}

impl LuxaforVariant {
    /// Recover the variant from the USB product string's last word.
    /// Unrecognised or missing strings default to the Flag, the most
    /// common unit in the wild.
    fn from_product_string(product_string: Option<&str>) -> Self {
        let last = product_string
            .and_then(|s| s.split_whitespace().last())
            .map(str::to_ascii_lowercase);
        match last.as_deref() {
            Some("mute") => LuxaforVariant::Mute,
            Some("orb") => LuxaforVariant::Orb,
            Some("bt") => LuxaforVariant::Bluetooth,
            _ => LuxaforVariant::Flag,
        }
    }

    fn name(self) -> &'static str {
        match self {
            LuxaforVariant::Flag => "Luxafor Flag",
            LuxaforVariant::Mute => "Luxafor Mute",
            LuxaforVariant::Orb => "Luxafor Orb",
            LuxaforVariant::Bluetooth => "Luxafor BT",
        }
    }

    fn led_count(self) -> u8 {
        match self {
            LuxaforVariant::Flag => proto::LED_COUNT,
            _ => 1,
        }
    }
}

pub struct LuxaforDriver {
    identity: DriverIdentity,
}

impl LuxaforDriver {
    pub fn new(vendor_id: u16, product_id: u16, product_string: Option<&str>) -> Self {
        let variant = LuxaforVariant::from_product_string(product_string);
        Self {
            identity: DriverIdentity {
                vendor_id,
                product_id,
                logical_name: variant.name().to_string(),
                led_count: variant.led_count(),
                transport_kind: TransportKind::Hid,
                keepalive: KeepAlive::Stateless,
                color_depth: ColorDepth::TrueColor,
                report_mode: ReportMode::Output,
            },
        }
    }

    fn target(led: LedIndex) -> proto::LedTarget {
        if led.is_all() {
            proto::LedTarget::All
        } else {
            proto::LedTarget::Single(led.0)
        }
    }

    /// Strobe period byte for the firmware, roughly dwell / 10 ms.
    fn strobe_speed(speed: Speed) -> u8 {
        (speed.dwell().as_millis() / 10).max(1) as u8
    }
}

impl DeviceDriver for LuxaforDriver {
    fn identity(&self) -> &DriverIdentity {
        &self.identity
    }

    fn encode_solid(&self, color: Rgb, led: LedIndex) -> Vec<Frame> {
        vec![proto::encode_color(Self::target(led), color.r, color.g, color.b).to_vec()]
    }

    fn encode_off(&self, led: LedIndex) -> Vec<Frame> {
        vec![proto::encode_off(Self::target(led)).to_vec()]
    }

    fn encode_keepalive(&self) -> Option<Frame> {
        None
    }

    fn encode_blink_native(&self, on: Rgb, off: Rgb, speed: Speed) -> Option<Vec<Frame>> {
        if !off.is_dark() {
            return None;
        }
        Some(vec![proto::encode_strobe(
            proto::LedTarget::All,
            on.r,
            on.g,
            on.b,
            Self::strobe_speed(speed),
            0,
        )
        .to_vec()])
    }
}
